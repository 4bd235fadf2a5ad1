// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Moderation pipeline data model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::vision::ImagePayload;

/// A single image submitted for moderation
#[derive(Debug, Clone)]
pub struct ModerationRequest {
    pub image: ImagePayload,
}

impl ModerationRequest {
    pub fn new(image: ImagePayload) -> Self {
        Self { image }
    }
}

/// Outcome of the local keyword scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreeningResult {
    pub has_risk: bool,
    /// Matches in keyword-list order
    pub matched_keywords: Vec<String>,
}

/// Risk level reported by the classifier
///
/// Values outside the known set are kept as `Other` and serialized back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
    Safe,
    Unknown,
    Other(String),
}

impl RiskLevel {
    pub fn as_str(&self) -> &str {
        match self {
            RiskLevel::High => "high",
            RiskLevel::Medium => "medium",
            RiskLevel::Low => "low",
            RiskLevel::Safe => "safe",
            RiskLevel::Unknown => "unknown",
            RiskLevel::Other(value) => value,
        }
    }
}

// Exact match only: "HIGH" is not `High`.
impl From<String> for RiskLevel {
    fn from(value: String) -> Self {
        match value.as_str() {
            "high" => RiskLevel::High,
            "medium" => RiskLevel::Medium,
            "low" => RiskLevel::Low,
            "safe" => RiskLevel::Safe,
            "unknown" => RiskLevel::Unknown,
            _ => RiskLevel::Other(value),
        }
    }
}

impl From<&str> for RiskLevel {
    fn from(value: &str) -> Self {
        RiskLevel::from(value.to_string())
    }
}

impl From<RiskLevel> for String {
    fn from(level: RiskLevel) -> Self {
        match level {
            RiskLevel::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action suggested by the classifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Suggestion {
    Block,
    Review,
    Pass,
    Other(String),
}

impl Suggestion {
    pub fn as_str(&self) -> &str {
        match self {
            Suggestion::Block => "block",
            Suggestion::Review => "review",
            Suggestion::Pass => "pass",
            Suggestion::Other(value) => value,
        }
    }
}

impl From<String> for Suggestion {
    fn from(value: String) -> Self {
        match value.as_str() {
            "block" => Suggestion::Block,
            "review" => Suggestion::Review,
            "pass" => Suggestion::Pass,
            _ => Suggestion::Other(value),
        }
    }
}

impl From<&str> for Suggestion {
    fn from(value: &str) -> Self {
        Suggestion::from(value.to_string())
    }
}

impl From<Suggestion> for String {
    fn from(suggestion: Suggestion) -> Self {
        match suggestion {
            Suggestion::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured assessment from the vision-language model, or a synthesized fallback
///
/// A parsed model reply is kept verbatim as a JSON object. Fields are read
/// leniently: a missing or non-string `risk_level` matches no level at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassificationResult {
    fields: Map<String, Value>,
}

impl ClassificationResult {
    pub fn new(
        risk_level: impl Into<RiskLevel>,
        reasoning: impl Into<String>,
        suggestion: impl Into<Suggestion>,
    ) -> Self {
        let risk_level: RiskLevel = risk_level.into();
        let suggestion: Suggestion = suggestion.into();
        let mut fields = Map::new();
        fields.insert("risk_level".to_string(), Value::String(risk_level.into()));
        fields.insert("reasoning".to_string(), Value::String(reasoning.into()));
        fields.insert("suggestion".to_string(), Value::String(suggestion.into()));
        Self { fields }
    }

    /// Wrap an object decoded from the model reply, untouched
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Result used when the model could not be reached
    pub fn service_error(message: impl Into<String>) -> Self {
        let mut result = Self::new(RiskLevel::Unknown, "Error calling AI service", Suggestion::Review);
        result
            .fields
            .insert("error".to_string(), Value::String(message.into()));
        result
    }

    /// Result used when the model reply is not a JSON object
    pub fn unparsed(raw_reply: impl Into<String>) -> Self {
        Self::new(RiskLevel::Unknown, raw_reply, Suggestion::Review)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// `None` when the field is absent or not a string
    pub fn risk_level(&self) -> Option<RiskLevel> {
        self.text("risk_level").map(RiskLevel::from)
    }

    /// `None` when the field is absent or not a string
    pub fn suggestion(&self) -> Option<Suggestion> {
        self.text("suggestion").map(Suggestion::from)
    }

    pub fn reasoning(&self) -> Option<&str> {
        self.text("reasoning")
    }

    /// Set only when the model call itself failed
    pub fn error(&self) -> Option<&str> {
        self.text("error")
    }
}

/// Final moderation verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Reject,
    ManualReview,
    Pass,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Reject => "reject",
            Decision::ManualReview => "manual_review",
            Decision::Pass => "pass",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the pipeline learned about one image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationReport {
    pub ocr_text: String,
    pub preliminary_check: ScreeningResult,
    /// `None` when the keyword screen short-circuited
    pub llm_check: Option<ClassificationResult>,
    pub final_decision: Decision,
}
