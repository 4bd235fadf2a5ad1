// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision-language model client for an OpenAI-compatible chat-completions API

use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::image_utils::ImagePayload;
use super::model::{CompletionOptions, VisionError, VisionModel};
use crate::config::VlmConfig;

// --- OpenAI-compatible serde structs ---

#[derive(serde::Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    max_tokens: u32,
    temperature: f32,
}

#[derive(serde::Serialize)]
struct ChatMessage {
    role: String,
    content: serde_json::Value,
}

#[derive(serde::Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[derive(serde::Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(serde::Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(serde::Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for a hosted vision-language model (ZhipuAI GLM-4V by default)
pub struct VlmClient {
    client: Client,
    base_url: String,
    api_key: String,
    model_name: String,
    timeout: Duration,
}

impl std::fmt::Debug for VlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VlmClient")
            .field("base_url", &self.base_url)
            .field("model_name", &self.model_name)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl VlmClient {
    /// Create a new client from configuration
    pub fn new(config: &VlmConfig) -> Result<Self, VisionError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| VisionError::Transport(e.to_string()))?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        info!(
            "VLM client configured: base_url={}, model={}",
            base_url, config.model
        );

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
            model_name: config.model.clone(),
            timeout: config.timeout,
        })
    }

    /// Get the model name
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn build_request(
        &self,
        prompt: &str,
        image: &ImagePayload,
        options: &CompletionOptions,
    ) -> ChatRequest {
        ChatRequest {
            model: self.model_name.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: serde_json::json!([
                    {"type": "text", "text": prompt},
                    {"type": "image_url", "image_url": {"url": image.data_url()}}
                ]),
            }],
            stream: false,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        }
    }

    fn map_send_error(&self, e: reqwest::Error) -> VisionError {
        if e.is_timeout() {
            VisionError::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            VisionError::Transport(e.to_string())
        }
    }
}

#[async_trait]
impl VisionModel for VlmClient {
    async fn complete(
        &self,
        prompt: &str,
        image: &ImagePayload,
        options: &CompletionOptions,
    ) -> Result<String, VisionError> {
        let start = Instant::now();
        let request = self.build_request(prompt, image, options);

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(VisionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| VisionError::InvalidResponse(format!("JSON parse error: {}", e)))?;

        let choice = chat_response
            .choices
            .into_iter()
            .next()
            .ok_or(VisionError::EmptyChoices)?;

        if let Some(usage) = chat_response.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "VLM usage"
            );
        }
        debug!(
            "VLM completion in {}ms (model={})",
            start.elapsed().as_millis(),
            self.model_name
        );

        Ok(choice.message.content.unwrap_or_default())
    }
}
