// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text extraction strategies
//!
//! Extraction is best effort: a failure is logged and yields empty text so the
//! rest of the pipeline still runs.

use async_trait::async_trait;
use image::DynamicImage;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

use super::decode::strip_code_fences;
use crate::vision::{CompletionOptions, ImageError, ImagePayload, VisionError, VisionModel};

/// Transcription-only instruction for the vision model
const TRANSCRIBE_PROMPT: &str = "请逐字输出这张图片中出现的全部文字。只输出文字本身，不要添加任何解释、说明或markdown标记。如果图片中没有文字，请输出空字符串。";

/// Transcription never samples hotter than this
const MAX_TRANSCRIBE_TEMPERATURE: f32 = 0.1;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    Vision(#[from] VisionError),

    #[error("OCR engine failed: {0}")]
    Engine(String),
}

/// Turns an image into plain text
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Short name for logs and `/health`
    fn name(&self) -> &'static str;

    /// Extract text, reporting failures
    async fn try_extract(&self, image: &ImagePayload) -> Result<String, ExtractionError>;

    /// Extract text; any failure becomes `""`
    async fn extract(&self, image: &ImagePayload) -> String {
        match self.try_extract(image).await {
            Ok(text) => text,
            Err(e) => {
                warn!(extractor = self.name(), "Text extraction failed: {}", e);
                String::new()
            }
        }
    }
}

/// Transcription by the remote vision-language model
pub struct VlmTextExtractor {
    model: Arc<dyn VisionModel>,
    options: CompletionOptions,
}

impl VlmTextExtractor {
    pub fn new(model: Arc<dyn VisionModel>, options: CompletionOptions) -> Self {
        Self {
            model,
            options: CompletionOptions {
                temperature: options.temperature.min(MAX_TRANSCRIBE_TEMPERATURE),
                ..options
            },
        }
    }

    pub fn options(&self) -> &CompletionOptions {
        &self.options
    }
}

#[async_trait]
impl TextExtractor for VlmTextExtractor {
    fn name(&self) -> &'static str {
        "vlm"
    }

    async fn try_extract(&self, image: &ImagePayload) -> Result<String, ExtractionError> {
        let reply = self
            .model
            .complete(TRANSCRIBE_PROMPT, image, &self.options)
            .await?;
        Ok(strip_code_fences(&reply, &["text"]))
    }
}

/// Blocking OCR over decoded pixels
pub trait ImageTextReader: Send + Sync {
    fn read_text(&self, image: &DynamicImage) -> anyhow::Result<String>;
}

/// Local OCR; the payload is decoded before the engine is touched
pub struct LocalOcrExtractor {
    reader: Arc<dyn ImageTextReader>,
    max_image_bytes: usize,
}

impl LocalOcrExtractor {
    pub fn new(reader: Arc<dyn ImageTextReader>, max_image_bytes: usize) -> Self {
        Self {
            reader,
            max_image_bytes,
        }
    }
}

#[async_trait]
impl TextExtractor for LocalOcrExtractor {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn try_extract(&self, image: &ImagePayload) -> Result<String, ExtractionError> {
        let decoded = image.to_image(self.max_image_bytes)?;
        let reader = Arc::clone(&self.reader);
        tokio::task::spawn_blocking(move || reader.read_text(&decoded))
            .await
            .map_err(|e| ExtractionError::Engine(e.to_string()))?
            .map_err(|e| ExtractionError::Engine(e.to_string()))
    }
}
