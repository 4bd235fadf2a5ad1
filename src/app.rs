// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Wiring: turn a configuration into a ready-to-serve application state

use anyhow::{Context, Result};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use crate::api::{AppState, ServiceInfo};
use crate::config::{ExtractorKind, GatewayConfig, OcrConfig};
use crate::moderation::{
    KeywordList, KeywordScreener, ModerationPipeline, RiskClassifier, TextExtractor,
    VlmTextExtractor,
};
use crate::vision::{CompletionOptions, VisionModel, VlmClient};

/// Build the pipeline and shared state from configuration
pub fn build_state(config: &GatewayConfig) -> Result<AppState> {
    let client = VlmClient::new(&config.vlm).context("Failed to create VLM client")?;
    let pipeline = build_pipeline(config, Arc::new(client))?;

    Ok(AppState::new(
        pipeline,
        ServiceInfo {
            model: config.vlm.model.clone(),
            started_at: Utc::now(),
            max_body_bytes: config.max_body_bytes(),
        },
    ))
}

/// Build the pipeline around an arbitrary vision model
pub fn build_pipeline(
    config: &GatewayConfig,
    model: Arc<dyn VisionModel>,
) -> Result<ModerationPipeline> {
    let keywords = KeywordList::load(config.keywords_file.as_deref())
        .context("Failed to load sensitive keywords")?;
    let options = CompletionOptions {
        temperature: config.vlm.temperature,
        max_tokens: config.vlm.max_tokens,
    };

    let extractor: Arc<dyn TextExtractor> = match config.extractor {
        ExtractorKind::Vlm => Arc::new(VlmTextExtractor::new(Arc::clone(&model), options)),
        ExtractorKind::Local => build_local_extractor(&config.ocr, config.max_image_bytes)?,
    };
    info!(
        "Moderation pipeline ready: extractor={}, model={}, keywords={}",
        extractor.name(),
        config.vlm.model,
        keywords.len()
    );

    Ok(ModerationPipeline::new(
        extractor,
        KeywordScreener::new(Arc::new(keywords)),
        RiskClassifier::new(model, options),
    ))
}

#[cfg(feature = "local-ocr")]
fn build_local_extractor(ocr: &OcrConfig, max_image_bytes: usize) -> Result<Arc<dyn TextExtractor>> {
    use crate::moderation::LocalOcrExtractor;
    use crate::vision::ocr::OcrEngine;

    let engine = OcrEngine::load(ocr).context("Failed to load local OCR models")?;
    Ok(Arc::new(LocalOcrExtractor::new(Arc::new(engine), max_image_bytes)))
}

#[cfg(not(feature = "local-ocr"))]
fn build_local_extractor(_ocr: &OcrConfig, _max_image_bytes: usize) -> Result<Arc<dyn TextExtractor>> {
    Err(crate::config::ConfigError::ExtractorUnavailable(ExtractorKind::Local).into())
}
