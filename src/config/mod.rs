// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Gateway configuration loaded from environment variables

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Environment variable holding the model API key
pub const API_KEY_VAR: &str = "ZHIPU_AI_API_KEY";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5001;
pub const DEFAULT_VLM_BASE_URL: &str = "https://open.bigmodel.cn/api/paas/v4";
pub const DEFAULT_VLM_MODEL: &str = "GLM-4.1V-Thinking-Flash";
pub const DEFAULT_VLM_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_MAX_TOKENS: u32 = 4096;
pub const DEFAULT_OCR_MODEL_DIR: &str = "./models/paddleocr-onnx";

/// Maximum decoded image size (10MB)
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Errors raised while loading configuration at startup
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} environment variable not set.")]
    MissingVar(&'static str),

    #[error("Invalid value for {var}: '{value}' ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("Text extractor '{0}' requires the `local-ocr` feature")]
    ExtractorUnavailable(ExtractorKind),
}

/// Which text extraction strategy is active for this deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractorKind {
    /// Remote vision-model transcription
    Vlm,
    /// Local PaddleOCR engine
    Local,
}

impl ExtractorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractorKind::Vlm => "vlm",
            ExtractorKind::Local => "local",
        }
    }
}

impl fmt::Display for ExtractorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExtractorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vlm" => Ok(ExtractorKind::Vlm),
            "local" => Ok(ExtractorKind::Local),
            other => Err(format!("expected 'vlm' or 'local', got '{}'", other)),
        }
    }
}

/// Remote vision-language model settings
#[derive(Clone)]
pub struct VlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    pub temperature: f32,
    pub max_tokens: u32,
}

// The API key never reaches logs.
impl fmt::Debug for VlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VlmConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

/// Local OCR model locations
#[derive(Debug, Clone, PartialEq)]
pub struct OcrConfig {
    /// Primary-language detection and recognition models
    pub model_dir: PathBuf,
    /// Optional latin-script recognizer used as a fallback
    pub fallback_model_dir: Option<PathBuf>,
}

/// Complete gateway configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub vlm: VlmConfig,
    pub extractor: ExtractorKind,
    pub ocr: OcrConfig,
    pub keywords_file: Option<PathBuf>,
    pub max_image_bytes: usize,
}

impl GatewayConfig {
    /// Load configuration from environment variables
    ///
    /// Fails when the API key is absent or a numeric setting does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingVar(API_KEY_VAR))?;

        let config = Self {
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_var(&lookup, "PORT", DEFAULT_PORT)?,
            vlm: VlmConfig {
                api_key,
                base_url: lookup("VLM_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_VLM_BASE_URL.to_string())
                    .trim_end_matches('/')
                    .to_string(),
                model: lookup("VLM_MODEL").unwrap_or_else(|| DEFAULT_VLM_MODEL.to_string()),
                timeout: Duration::from_secs(parse_var(
                    &lookup,
                    "VLM_TIMEOUT_SECS",
                    DEFAULT_VLM_TIMEOUT_SECS,
                )?),
                temperature: parse_var(&lookup, "VLM_TEMPERATURE", DEFAULT_TEMPERATURE)?,
                max_tokens: parse_var(&lookup, "VLM_MAX_TOKENS", DEFAULT_MAX_TOKENS)?,
            },
            extractor: parse_var(&lookup, "TEXT_EXTRACTOR", ExtractorKind::Vlm)?,
            ocr: OcrConfig {
                model_dir: lookup("OCR_MODEL_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_OCR_MODEL_DIR)),
                fallback_model_dir: lookup("OCR_FALLBACK_MODEL_DIR").map(PathBuf::from),
            },
            keywords_file: lookup("SENSITIVE_KEYWORDS_FILE").map(PathBuf::from),
            max_image_bytes: parse_var(&lookup, "MAX_IMAGE_BYTES", DEFAULT_MAX_IMAGE_BYTES)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.vlm.max_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                var: "VLM_MAX_TOKENS",
                value: "0".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        if !(0.0..=2.0).contains(&self.vlm.temperature) {
            return Err(ConfigError::InvalidValue {
                var: "VLM_TEMPERATURE",
                value: self.vlm.temperature.to_string(),
                reason: "must be within 0.0..=2.0".to_string(),
            });
        }
        if self.max_image_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                var: "MAX_IMAGE_BYTES",
                value: "0".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.extractor == ExtractorKind::Local && !cfg!(feature = "local-ocr") {
            return Err(ConfigError::ExtractorUnavailable(self.extractor));
        }
        Ok(())
    }

    /// Address the HTTP server binds to
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Request body limit covering a base64-encoded image of `max_image_bytes`
    pub fn max_body_bytes(&self) -> usize {
        // base64 expands 3 bytes into 4; leave room for the JSON envelope
        self.max_image_bytes / 3 * 4 + 4 + 1024
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                var,
                value,
                reason: e.to_string(),
            }),
    }
}
