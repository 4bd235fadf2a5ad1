// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Sensitive keyword list

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Built-in list used when no keyword file is configured
const DEFAULT_KEYWORDS: &[&str] = &[
    "赌博",
    "博彩",
    "六合彩",
    "色情",
    "裸聊",
    "约炮",
    "毒品",
    "冰毒",
    "大麻",
    "枪支",
    "炸药",
    "恐怖袭击",
    "自杀",
    "诈骗",
    "代孕",
    "办证",
    "gambling",
    "casino",
    "porn",
    "cocaine",
    "heroin",
    "terrorist",
    "suicide",
];

#[derive(Debug, Error)]
pub enum KeywordListError {
    #[error("Failed to read keyword file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Keyword file {0} contains no keywords")]
    Empty(PathBuf),
}

/// Immutable ordered list of sensitive terms
///
/// Terms are matched against lower-cased text, so they are expected to be
/// lower-case already. Built once at startup and shared behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordList {
    terms: Vec<String>,
}

impl Default for KeywordList {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORDS.iter().copied())
    }
}

impl KeywordList {
    /// Build from terms, trimming whitespace and keeping the first of any duplicates
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let terms = terms
            .into_iter()
            .map(|term| term.as_ref().trim().to_string())
            .filter(|term| !term.is_empty())
            .filter(|term| seen.insert(term.clone()))
            .collect();
        Self { terms }
    }

    /// Parse file contents: one term per line, `#` comments and blank lines skipped
    pub fn parse(content: &str) -> Self {
        Self::new(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.starts_with('#')),
        )
    }

    /// Load a keyword file
    pub fn from_file(path: &Path) -> Result<Self, KeywordListError> {
        let content = fs::read_to_string(path).map_err(|source| KeywordListError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let list = Self::parse(&content);
        if list.is_empty() {
            return Err(KeywordListError::Empty(path.to_path_buf()));
        }
        info!("Loaded {} keywords from {}", list.len(), path.display());
        list.warn_unmatchable();
        Ok(list)
    }

    /// Load from `path` when given, otherwise the built-in list
    pub fn load(path: Option<&Path>) -> Result<Self, KeywordListError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let list = Self::default();
                info!("Using built-in keyword list ({} keywords)", list.len());
                Ok(list)
            }
        }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Terms with upper-case characters; they can never match lower-cased text
    pub fn unmatchable(&self) -> Vec<&str> {
        self.terms
            .iter()
            .filter(|term| term.chars().any(char::is_uppercase))
            .map(String::as_str)
            .collect()
    }

    fn warn_unmatchable(&self) {
        for term in self.unmatchable() {
            warn!(
                "Keyword '{}' contains upper-case characters and will never match",
                term
            );
        }
    }
}
