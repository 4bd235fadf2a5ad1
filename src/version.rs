// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the Image Moderation Gateway

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Full version string with feature description
pub const VERSION: &str = "v0.1.0-moderation-pipeline-2025-11-02";

/// Build date
pub const BUILD_DATE: &str = "2025-11-02";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "keyword-screening",
    "vlm-transcription",
    "vlm-risk-classification",
    "degraded-classification-fallback",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Image Moderation Gateway {} ({})", VERSION_NUMBER, BUILD_DATE)
}
