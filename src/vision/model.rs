// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision-language model capability
//!
//! Transcription and risk assessment are both built on a single call: send a
//! prompt plus one image, get the reply text back. Any provider that can do
//! that implements [`VisionModel`].

use async_trait::async_trait;
use thiserror::Error;

use super::image_utils::ImagePayload;

/// Sampling parameters for a single completion
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionOptions {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            max_tokens: 4096,
        }
    }
}

/// Errors from a vision-language model call
#[derive(Debug, Error)]
pub enum VisionError {
    #[error("Request to vision model failed: {0}")]
    Transport(String),

    #[error("Vision model request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("Vision model API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response from vision model: {0}")]
    InvalidResponse(String),

    #[error("Vision model returned no choices")]
    EmptyChoices,
}

/// A remote (or fake) model that answers a prompt about an image
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Ask the model about `image` and return the raw reply text
    async fn complete(
        &self,
        prompt: &str,
        image: &ImagePayload,
        options: &CompletionOptions,
    ) -> Result<String, VisionError>;
}
