// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Shared fakes for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use image_moderation_gateway::{
    api::{create_app, AppState, ServiceInfo},
    moderation::{
        KeywordList, KeywordScreener, ModerationPipeline, RiskClassifier, VlmTextExtractor,
    },
    vision::{CompletionOptions, ImagePayload, VisionError, VisionModel},
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// 1x1 PNG
pub const TINY_PNG_BASE64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

pub const SAFE_VERDICT: &str = r#"{"risk_level": "safe", "reasoning": "A cat photo", "suggestion": "pass"}"#;

/// Vision model with canned replies for transcription and classification
///
/// Classification prompts are recognised by their `risk_level` field request.
pub struct ScriptedVisionModel {
    transcript: Result<String, String>,
    verdict: Result<String, String>,
    transcribe_calls: AtomicUsize,
    classify_calls: AtomicUsize,
}

impl ScriptedVisionModel {
    pub fn new(transcript: &str, verdict: &str) -> Self {
        Self {
            transcript: Ok(transcript.to_string()),
            verdict: Ok(verdict.to_string()),
            transcribe_calls: AtomicUsize::new(0),
            classify_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_transcription(mut self, message: &str) -> Self {
        self.transcript = Err(message.to_string());
        self
    }

    pub fn failing_classification(mut self, message: &str) -> Self {
        self.verdict = Err(message.to_string());
        self
    }

    pub fn transcribe_calls(&self) -> usize {
        self.transcribe_calls.load(Ordering::SeqCst)
    }

    pub fn classify_calls(&self) -> usize {
        self.classify_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VisionModel for ScriptedVisionModel {
    async fn complete(
        &self,
        prompt: &str,
        _image: &ImagePayload,
        _options: &CompletionOptions,
    ) -> Result<String, VisionError> {
        let reply = if prompt.contains("risk_level") {
            self.classify_calls.fetch_add(1, Ordering::SeqCst);
            &self.verdict
        } else {
            self.transcribe_calls.fetch_add(1, Ordering::SeqCst);
            &self.transcript
        };
        reply
            .clone()
            .map_err(VisionError::Transport)
    }
}

pub fn pipeline_with(model: Arc<ScriptedVisionModel>, keywords: &[&str]) -> ModerationPipeline {
    let options = CompletionOptions::default();
    ModerationPipeline::new(
        Arc::new(VlmTextExtractor::new(model.clone(), options)),
        KeywordScreener::new(Arc::new(KeywordList::new(keywords.iter().copied()))),
        RiskClassifier::new(model, options),
    )
}

pub fn app_with(model: Arc<ScriptedVisionModel>, keywords: &[&str], max_body_bytes: usize) -> axum::Router {
    create_app(AppState::new(
        pipeline_with(model, keywords),
        ServiceInfo {
            model: "scripted-vlm".to_string(),
            started_at: Utc::now(),
            max_body_bytes,
        },
    ))
}
