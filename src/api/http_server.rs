// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP server: router, shared state and lifecycle

use axum::{
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::moderate::moderate_image_handler;
use crate::moderation::ModerationPipeline;
use crate::version;

pub const ROOT_GREETING: &str = "Hello, this is the Image Moderation Backend!";

/// Static facts about this deployment, reported by `/health`
#[derive(Debug, Clone)]
pub struct ServiceInfo {
    pub model: String,
    pub started_at: DateTime<Utc>,
    pub max_body_bytes: usize,
}

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ModerationPipeline>,
    pub info: Arc<ServiceInfo>,
}

impl AppState {
    pub fn new(pipeline: ModerationPipeline, info: ServiceInfo) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            info: Arc::new(info),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub extractor: String,
    pub model: String,
    pub keywords: usize,
    pub started_at: DateTime<Utc>,
}

/// Build the router with CORS, tracing and the body limit applied
pub fn create_app(state: AppState) -> Router {
    let body_limit = state.info.max_body_bytes;
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/moderate_image", post(moderate_image_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until Ctrl+C
pub async fn start_server(addr: &str, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Moderation gateway listening on {}", listener.local_addr()?);

    axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received shutdown signal"),
        Err(e) => {
            warn!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

async fn root_handler() -> &'static str {
    ROOT_GREETING
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: version::VERSION.to_string(),
        extractor: state.pipeline.extractor_name().to_string(),
        model: state.info.model.clone(),
        keywords: state.pipeline.keyword_count(),
        started_at: state.info.started_at,
    })
}
