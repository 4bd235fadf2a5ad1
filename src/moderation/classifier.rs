// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Risk classification by the vision-language model

use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, warn};

use super::decode::{best_effort, Decoded};
use super::types::ClassificationResult;
use crate::vision::{CompletionOptions, ImagePayload, VisionModel};

/// Asks the model for a structured risk assessment of an image
///
/// Never fails: transport errors and unparsable replies are mapped to an
/// `unknown`/`review` result.
pub struct RiskClassifier {
    model: Arc<dyn VisionModel>,
    options: CompletionOptions,
}

impl RiskClassifier {
    pub fn new(model: Arc<dyn VisionModel>, options: CompletionOptions) -> Self {
        Self { model, options }
    }

    /// Classification prompt embedding the extracted text
    pub fn build_prompt(extracted_text: &str) -> String {
        format!(
            "请客观分析这张图片（meme）是否包含不安全或敏感的内容。\
             图片中提取到的文字：{}。\
             请只用纯 JSON 回答，不要使用 markdown 代码块（例如 ```json ... ```）。\
             JSON 必须且只包含以下字段：\
             risk_level（字符串，取值 'high'、'medium'、'low'、'safe' 之一），\
             reasoning（字符串，详细的判断依据），\
             suggestion（字符串，处置建议，取值 'block'、'review'、'pass' 之一）。",
            extracted_text
        )
    }

    /// Decode a model reply, falling back to the raw text as reasoning
    ///
    /// Any JSON object is accepted as-is; nothing checks which fields it carries.
    pub fn parse_reply(reply: &str) -> ClassificationResult {
        match best_effort::<Map<String, Value>>(reply) {
            Decoded::Parsed(fields) => ClassificationResult::from_fields(fields),
            Decoded::Raw(raw) => {
                warn!("Classifier reply is not a JSON object, falling back to review");
                ClassificationResult::unparsed(raw)
            }
        }
    }

    pub async fn classify(&self, image: &ImagePayload, extracted_text: &str) -> ClassificationResult {
        let prompt = Self::build_prompt(extracted_text);
        match self.model.complete(&prompt, image, &self.options).await {
            Ok(reply) => {
                debug!("Classifier reply: {}", reply);
                Self::parse_reply(&reply)
            }
            Err(e) => {
                warn!("Error calling vision model for classification: {}", e);
                ClassificationResult::service_error(e.to_string())
            }
        }
    }
}
