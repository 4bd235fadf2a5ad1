// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Keyword screener behaviour against realistic extracted text

use image_moderation_gateway::moderation::{KeywordList, KeywordScreener};
use std::sync::Arc;

fn screener(terms: &[&str]) -> KeywordScreener {
    KeywordScreener::new(Arc::new(KeywordList::new(terms.iter().copied())))
}

#[test]
fn test_multiline_ocr_text() {
    let text = "欢迎光临\n线上Casino 注册送彩金\n客服微信 123";
    let result = screener(&["赌博", "casino", "彩金"]).screen(text);
    assert!(result.has_risk);
    assert_eq!(result.matched_keywords, vec!["casino", "彩金"]);
}

#[test]
fn test_no_match_returns_empty_list() {
    let result = screener(&["赌博", "casino"]).screen("今天天气很好");
    assert!(!result.has_risk);
    assert!(result.matched_keywords.is_empty());
}

#[test]
fn test_repeated_occurrence_listed_once() {
    let result = screener(&["porn"]).screen("porn porn PORN");
    assert_eq!(result.matched_keywords, vec!["porn"]);
}

#[test]
fn test_default_list_catches_common_terms() {
    let screener = KeywordScreener::new(Arc::new(KeywordList::default()));
    assert!(screener.screen("网络赌博平台").has_risk);
    assert!(screener.screen("Online CASINO bonus").has_risk);
    assert!(!screener.screen("Happy birthday!").has_risk);
}

#[test]
fn test_deterministic() {
    let screener = screener(&["毒品", "诈骗"]);
    let text = "警惕诈骗，远离毒品";
    assert_eq!(screener.screen(text), screener.screen(text));
}
