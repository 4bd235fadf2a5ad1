// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Risk classifier reply handling through a scripted model

use crate::common::{ScriptedVisionModel, TINY_PNG_BASE64};
use image_moderation_gateway::moderation::{RiskClassifier, RiskLevel, Suggestion};
use image_moderation_gateway::vision::{CompletionOptions, ImagePayload};
use std::sync::Arc;

async fn classify_with(model: ScriptedVisionModel) -> image_moderation_gateway::ClassificationResult {
    let classifier = RiskClassifier::new(Arc::new(model), CompletionOptions::default());
    classifier
        .classify(&ImagePayload::from_base64(TINY_PNG_BASE64), "hello")
        .await
}

#[tokio::test]
async fn test_well_formed_verdict() {
    let result = classify_with(ScriptedVisionModel::new(
        "",
        r#"{"risk_level": "medium", "reasoning": "mild insult", "suggestion": "review"}"#,
    ))
    .await;
    assert_eq!(result.risk_level(), Some(RiskLevel::Medium));
    assert_eq!(result.suggestion(), Some(Suggestion::Review));
    assert_eq!(result.reasoning(), Some("mild insult"));
}

#[tokio::test]
async fn test_prose_reply_becomes_reasoning() {
    let prose = "这张图片看起来没有问题。";
    let result = classify_with(ScriptedVisionModel::new("", prose)).await;
    assert_eq!(result.risk_level(), Some(RiskLevel::Unknown));
    assert_eq!(result.suggestion(), Some(Suggestion::Review));
    assert_eq!(result.reasoning(), Some(prose));
}

#[tokio::test]
async fn test_json_array_reply_is_unparsed() {
    let result = classify_with(ScriptedVisionModel::new("", "[1, 2, 3]")).await;
    assert_eq!(result.risk_level(), Some(RiskLevel::Unknown));
    assert_eq!(result.reasoning(), Some("[1, 2, 3]"));
}

#[tokio::test]
async fn test_service_failure_carries_error() {
    let result = classify_with(
        ScriptedVisionModel::new("", "").failing_classification("connection reset"),
    )
    .await;
    assert_eq!(result.reasoning(), Some("Error calling AI service"));
    assert_eq!(result.risk_level(), Some(RiskLevel::Unknown));
    assert_eq!(result.suggestion(), Some(Suggestion::Review));
    assert!(result.error().unwrap_or_default().contains("connection reset"));
}

#[tokio::test]
async fn test_verdict_without_reasoning_is_kept() {
    let result = classify_with(ScriptedVisionModel::new(
        "",
        r#"{"risk_level": "high", "suggestion": "block"}"#,
    ))
    .await;
    assert_eq!(result.risk_level(), Some(RiskLevel::High));
    assert_eq!(result.suggestion(), Some(Suggestion::Block));
    assert_eq!(result.reasoning(), None);
    assert_eq!(result.fields().len(), 2);
}
