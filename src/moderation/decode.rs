// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Lenient decoding of model replies

use serde::de::DeserializeOwned;
use tracing::debug;

/// Outcome of a best-effort JSON decode
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded<T> {
    Parsed(T),
    /// The reply exactly as received, fences included
    Raw(String),
}

/// Remove markdown code fences (```` ```lang ```` and bare ```` ``` ````) and trim
pub fn strip_code_fences(text: &str, languages: &[&str]) -> String {
    let mut cleaned = text.to_string();
    for language in languages {
        cleaned = cleaned.replace(&format!("```{}", language), "");
    }
    cleaned.replace("```", "").trim().to_string()
}

/// Strip ```` ```json ```` fences and decode; fall back to the raw text
pub fn best_effort<T: DeserializeOwned>(raw: &str) -> Decoded<T> {
    let cleaned = strip_code_fences(raw, &["json"]);
    match serde_json::from_str::<T>(&cleaned) {
        Ok(value) => Decoded::Parsed(value),
        Err(e) => {
            debug!("Model reply is not valid JSON: {}", e);
            Decoded::Raw(raw.to_string())
        }
    }
}
