// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod logging;
pub mod moderation;
pub mod version;
pub mod vision;

pub use config::{ConfigError, ExtractorKind, GatewayConfig};
pub use moderation::{
    decide, ClassificationResult, Decision, KeywordList, ModerationPipeline, ModerationReport,
    ModerationRequest, ScreeningResult,
};
pub use vision::{ImagePayload, VisionError, VisionModel, VlmClient};
