// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Moderation pipeline: extract, screen, classify, decide

use std::sync::Arc;
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

use super::classifier::RiskClassifier;
use super::decision::decide;
use super::extractor::TextExtractor;
use super::screener::KeywordScreener;
use super::types::{ClassificationResult, ModerationReport, ModerationRequest};

/// Runs one image through every moderation stage
///
/// Holds only shared, immutable handles, so one instance serves all requests.
pub struct ModerationPipeline {
    extractor: Arc<dyn TextExtractor>,
    screener: KeywordScreener,
    classifier: RiskClassifier,
}

impl ModerationPipeline {
    pub fn new(
        extractor: Arc<dyn TextExtractor>,
        screener: KeywordScreener,
        classifier: RiskClassifier,
    ) -> Self {
        Self {
            extractor,
            screener,
            classifier,
        }
    }

    pub fn extractor_name(&self) -> &'static str {
        self.extractor.name()
    }

    pub fn keyword_count(&self) -> usize {
        self.screener.keywords().len()
    }

    /// Moderate one image; stage failures degrade instead of erroring
    pub async fn moderate(&self, request: &ModerationRequest) -> ModerationReport {
        let request_id = Uuid::new_v4();
        let span = info_span!("moderate_image", %request_id);
        self.run(request).instrument(span).await
    }

    async fn run(&self, request: &ModerationRequest) -> ModerationReport {
        let ocr_text = self.extractor.extract(&request.image).await;
        debug!("Extracted text from image: {}", ocr_text);

        let preliminary_check = self.screener.screen(&ocr_text);

        let llm_check = if preliminary_check.has_risk {
            info!(
                matched = ?preliminary_check.matched_keywords,
                "Sensitive keywords found, skipping model check"
            );
            None
        } else {
            Some(self.classifier.classify(&request.image, &ocr_text).await)
        };

        let final_decision = decide(&preliminary_check, llm_check.as_ref());
        info!(
            decision = %final_decision,
            risk_level = %llm_check
                .as_ref()
                .and_then(ClassificationResult::risk_level)
                .map(String::from)
                .unwrap_or_else(|| "-".to_string()),
            "Moderation complete"
        );

        ModerationReport {
            ocr_text,
            preliminary_check,
            llm_check,
            final_decision,
        }
    }
}
