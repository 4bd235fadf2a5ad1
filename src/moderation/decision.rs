// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Final decision aggregation

use super::types::{ClassificationResult, Decision, RiskLevel, ScreeningResult, Suggestion};

/// Combine the keyword screen and the model assessment
///
/// Reject beats manual review, which beats pass. A missing or non-string
/// field matches nothing, so an empty verdict passes.
pub fn decide(screening: &ScreeningResult, classification: Option<&ClassificationResult>) -> Decision {
    if screening.has_risk {
        return Decision::Reject;
    }
    let Some(classification) = classification else {
        return Decision::ManualReview;
    };

    let risk_level = classification.risk_level();
    let suggestion = classification.suggestion();
    let risky = matches!(risk_level, Some(RiskLevel::High | RiskLevel::Medium));
    if risky || suggestion == Some(Suggestion::Block) {
        Decision::Reject
    } else if suggestion == Some(Suggestion::Review) || risk_level == Some(RiskLevel::Unknown) {
        Decision::ManualReview
    } else {
        Decision::Pass
    }
}
