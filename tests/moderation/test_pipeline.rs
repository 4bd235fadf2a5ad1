// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! End-to-end pipeline runs with a scripted model

use crate::common::{pipeline_with, ScriptedVisionModel, SAFE_VERDICT, TINY_PNG_BASE64};
use image_moderation_gateway::moderation::{Decision, ModerationRequest, RiskLevel};
use image_moderation_gateway::vision::ImagePayload;
use std::sync::Arc;

fn request() -> ModerationRequest {
    ModerationRequest::new(ImagePayload::from_base64(TINY_PNG_BASE64))
}

#[tokio::test]
async fn test_keyword_hit_skips_classifier() {
    let model = Arc::new(ScriptedVisionModel::new("加入我们的CASINO", SAFE_VERDICT));
    let pipeline = pipeline_with(model.clone(), &["casino"]);

    let report = pipeline.moderate(&request()).await;

    assert_eq!(report.ocr_text, "加入我们的CASINO");
    assert!(report.preliminary_check.has_risk);
    assert_eq!(report.preliminary_check.matched_keywords, vec!["casino"]);
    assert!(report.llm_check.is_none());
    assert_eq!(report.final_decision, Decision::Reject);
    assert_eq!(model.transcribe_calls(), 1);
    assert_eq!(model.classify_calls(), 0);
}

#[tokio::test]
async fn test_clean_image_passes() {
    let model = Arc::new(ScriptedVisionModel::new("```text\n生日快乐\n```", SAFE_VERDICT));
    let pipeline = pipeline_with(model.clone(), &["casino"]);

    let report = pipeline.moderate(&request()).await;

    assert_eq!(report.ocr_text, "生日快乐");
    assert!(!report.preliminary_check.has_risk);
    let llm_check = report.llm_check.unwrap();
    assert_eq!(llm_check.risk_level(), Some(RiskLevel::Safe));
    assert_eq!(report.final_decision, Decision::Pass);
    assert_eq!(model.classify_calls(), 1);
}

#[tokio::test]
async fn test_extraction_failure_still_classifies() {
    let model = Arc::new(
        ScriptedVisionModel::new("", SAFE_VERDICT).failing_transcription("timeout"),
    );
    let pipeline = pipeline_with(model.clone(), &["casino"]);

    let report = pipeline.moderate(&request()).await;

    assert_eq!(report.ocr_text, "");
    assert!(!report.preliminary_check.has_risk);
    assert_eq!(report.final_decision, Decision::Pass);
    assert_eq!(model.classify_calls(), 1);
}

#[tokio::test]
async fn test_total_outage_goes_to_review() {
    let model = Arc::new(
        ScriptedVisionModel::new("", "")
            .failing_transcription("unreachable")
            .failing_classification("unreachable"),
    );
    let pipeline = pipeline_with(model, &["casino"]);

    let report = pipeline.moderate(&request()).await;

    assert_eq!(report.ocr_text, "");
    let llm_check = report.llm_check.unwrap();
    assert_eq!(llm_check.risk_level(), Some(RiskLevel::Unknown));
    assert!(llm_check.error().is_some());
    assert_eq!(report.final_decision, Decision::ManualReview);
}

#[tokio::test]
async fn test_high_risk_verdict_rejects() {
    let model = Arc::new(ScriptedVisionModel::new(
        "",
        r#"{"risk_level": "high", "reasoning": "graphic violence", "suggestion": "pass"}"#,
    ));
    let pipeline = pipeline_with(model, &["casino"]);

    let report = pipeline.moderate(&request()).await;
    assert_eq!(report.final_decision, Decision::Reject);
}

#[tokio::test]
async fn test_verdict_missing_fields_still_rejects() {
    let model = Arc::new(ScriptedVisionModel::new(
        "",
        r#"{"risk_level": "medium", "reasoning": ["nudity", "weapon"], "suggestion": "block"}"#,
    ));
    let pipeline = pipeline_with(model, &["casino"]);

    let report = pipeline.moderate(&request()).await;
    assert_eq!(report.final_decision, Decision::Reject);
    let llm_check = serde_json::to_value(report.llm_check.unwrap()).unwrap();
    assert_eq!(llm_check["reasoning"], serde_json::json!(["nudity", "weapon"]));
}

#[tokio::test]
async fn test_concurrent_requests_share_pipeline() {
    let model = Arc::new(ScriptedVisionModel::new("hello", SAFE_VERDICT));
    let pipeline = Arc::new(pipeline_with(model.clone(), &["casino"]));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let pipeline = Arc::clone(&pipeline);
            tokio::spawn(async move { pipeline.moderate(&request()).await })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().final_decision, Decision::Pass);
    }
    assert_eq!(model.transcribe_calls(), 8);
    assert_eq!(model.classify_calls(), 8);
}
