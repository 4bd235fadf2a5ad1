// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Root, health and CORS behaviour

use crate::common::{app_with, ScriptedVisionModel, SAFE_VERDICT};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
};
use image_moderation_gateway::api::HealthResponse;
use std::sync::Arc;
use tower::util::ServiceExt;

fn app() -> axum::Router {
    app_with(
        Arc::new(ScriptedVisionModel::new("", SAFE_VERDICT)),
        &["casino", "porn"],
        1024,
    )
}

#[tokio::test]
async fn test_root_greeting() {
    let response = app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"Hello, this is the Image Moderation Backend!");
}

#[tokio::test]
async fn test_health_reports_pipeline() {
    let response = app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let health: HealthResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.extractor, "vlm");
    assert_eq!(health.model, "scripted-vlm");
    assert_eq!(health.keywords, 2);
    assert!(!health.version.is_empty());
}

#[tokio::test]
async fn test_cors_preflight_allows_any_origin() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/moderate_image")
        .header(header::ORIGIN, "https://moderation.example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let response = app()
        .oneshot(Request::builder().uri("/v1/ocr").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
