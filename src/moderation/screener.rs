// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Local keyword pre-filter

use std::sync::Arc;
use tracing::debug;

use super::keywords::KeywordList;
use super::types::ScreeningResult;

/// Substring scan of extracted text against the keyword list
#[derive(Debug, Clone)]
pub struct KeywordScreener {
    keywords: Arc<KeywordList>,
}

impl KeywordScreener {
    pub fn new(keywords: Arc<KeywordList>) -> Self {
        Self { keywords }
    }

    pub fn keywords(&self) -> &KeywordList {
        &self.keywords
    }

    /// Every keyword contained in the lower-cased text, in list order
    pub fn screen(&self, text: &str) -> ScreeningResult {
        let lower = text.to_lowercase();
        let matched_keywords: Vec<String> = self
            .keywords
            .terms()
            .iter()
            .filter(|keyword| lower.contains(keyword.as_str()))
            .cloned()
            .collect();

        if !matched_keywords.is_empty() {
            debug!("Keyword screen matched {:?}", matched_keywords);
        }

        ScreeningResult {
            has_risk: !matched_keywords.is_empty(),
            matched_keywords,
        }
    }
}
