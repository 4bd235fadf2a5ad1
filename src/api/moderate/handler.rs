// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Moderation endpoint handler

use axum::extract::rejection::JsonRejection;
use axum::{extract::State, Json};
use tracing::debug;

use super::request::ModerateImageRequest;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::moderation::{ModerationReport, ModerationRequest};

/// POST /moderate_image - Moderate a base64-encoded image
///
/// # Request
/// - `image`: Base64-encoded image data (required)
///
/// # Response
/// - `ocr_text`: Text extracted from the image (empty if extraction failed)
/// - `preliminary_check`: Keyword screen result
/// - `llm_check`: Model assessment, `null` when the keyword screen rejected
/// - `final_decision`: `reject`, `manual_review` or `pass`
///
/// # Errors
/// - 400 Bad Request: missing image or malformed body
/// - 413 Payload Too Large: body over the configured limit
pub async fn moderate_image_handler(
    State(state): State<AppState>,
    payload: Result<Json<ModerateImageRequest>, JsonRejection>,
) -> Result<Json<ModerationReport>, ApiError> {
    let Json(request) = payload?;
    let image = request.into_payload()?;
    debug!("Moderation request received ({} base64 bytes)", image.encoded_len());

    let report = state
        .pipeline
        .moderate(&ModerationRequest::new(image))
        .await;
    Ok(Json(report))
}
