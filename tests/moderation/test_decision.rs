// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Decision table, exhaustively over the known values

use image_moderation_gateway::moderation::{decide, ClassificationResult, Decision, ScreeningResult};

const RISK_LEVELS: &[&str] = &["high", "medium", "low", "safe", "unknown", "other"];
const SUGGESTIONS: &[&str] = &["block", "review", "pass", "other"];

fn expected(risk_level: &str, suggestion: &str) -> Decision {
    if risk_level == "high" || risk_level == "medium" || suggestion == "block" {
        Decision::Reject
    } else if suggestion == "review" || risk_level == "unknown" {
        Decision::ManualReview
    } else {
        Decision::Pass
    }
}

#[test]
fn test_full_table_without_keyword_hit() {
    let screening = ScreeningResult::default();
    for risk_level in RISK_LEVELS {
        for suggestion in SUGGESTIONS {
            let classification = ClassificationResult::new(*risk_level, "r", *suggestion);
            assert_eq!(
                decide(&screening, Some(&classification)),
                expected(risk_level, suggestion),
                "risk_level={} suggestion={}",
                risk_level,
                suggestion
            );
        }
    }
}

#[test]
fn test_keyword_hit_always_rejects() {
    let screening = ScreeningResult {
        has_risk: true,
        matched_keywords: vec!["casino".to_string()],
    };
    assert_eq!(decide(&screening, None), Decision::Reject);
    for risk_level in RISK_LEVELS {
        for suggestion in SUGGESTIONS {
            let classification = ClassificationResult::new(*risk_level, "r", *suggestion);
            assert_eq!(decide(&screening, Some(&classification)), Decision::Reject);
        }
    }
}

#[test]
fn test_unparsed_reply_goes_to_review() {
    let result = ClassificationResult::unparsed("model rambled");
    assert_eq!(
        decide(&ScreeningResult::default(), Some(&result)),
        Decision::ManualReview
    );
}
