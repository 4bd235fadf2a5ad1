// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image moderation
//!
//! Text is extracted from the image, screened against a keyword list and,
//! when the screen is clean, assessed by a vision-language model. The two
//! results are aggregated into a final decision.

pub mod classifier;
pub mod decision;
pub mod decode;
pub mod extractor;
pub mod keywords;
pub mod pipeline;
pub mod screener;
pub mod types;

pub use classifier::RiskClassifier;
pub use decision::decide;
pub use decode::{best_effort, strip_code_fences, Decoded};
pub use extractor::{
    ExtractionError, ImageTextReader, LocalOcrExtractor, TextExtractor, VlmTextExtractor,
};
pub use keywords::{KeywordList, KeywordListError};
pub use pipeline::ModerationPipeline;
pub use screener::KeywordScreener;
pub use types::{
    ClassificationResult, Decision, ModerationReport, ModerationRequest, RiskLevel,
    ScreeningResult, Suggestion,
};
