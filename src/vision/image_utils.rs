// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image payload handling: base64 transport, format sniffing and decoding

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, ImageFormat};
use thiserror::Error;

/// MIME type assumed when the payload cannot be sniffed
pub const FALLBACK_MIME_TYPE: &str = "image/jpeg";

/// Errors raised while decoding an image payload
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Image data is too large: {0} bytes (max: {1} bytes)")]
    TooLarge(usize, usize),

    #[error("Invalid base64 encoding: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("Unsupported image format")]
    UnsupportedFormat,

    #[error("Failed to decode image: {0}")]
    DecodeFailed(String),

    #[error("Image data is empty")]
    EmptyData,
}

/// An image as received by the gateway.
///
/// The payload keeps the base64 text exactly as the client sent it (minus an
/// optional `data:` URL prefix). Bytes are only decoded when a stage needs
/// them, so an undecodable payload still flows through the pipeline and each
/// stage decides how to degrade.
#[derive(Clone, PartialEq, Eq)]
pub struct ImagePayload {
    base64: String,
}

impl std::fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImagePayload")
            .field("base64_len", &self.base64.len())
            .finish()
    }
}

impl ImagePayload {
    /// Wrap base64 text received from a client
    pub fn from_base64(encoded: impl Into<String>) -> Self {
        let encoded = encoded.into();
        let trimmed = encoded.trim();
        let body = match trimmed.split_once(";base64,") {
            Some((prefix, rest)) if prefix.starts_with("data:") => rest,
            _ => trimmed,
        };
        Self {
            base64: body.to_string(),
        }
    }

    /// Wrap raw image bytes
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            base64: STANDARD.encode(bytes),
        }
    }

    /// The base64 text
    pub fn as_base64(&self) -> &str {
        &self.base64
    }

    /// Length of the base64 text
    pub fn encoded_len(&self) -> usize {
        self.base64.len()
    }

    pub fn is_empty(&self) -> bool {
        self.base64.is_empty()
    }

    /// Decode the payload to raw bytes, refusing more than `max_bytes`
    pub fn decode(&self, max_bytes: usize) -> Result<Vec<u8>, ImageError> {
        if self.base64.is_empty() {
            return Err(ImageError::EmptyData);
        }
        let bytes = STANDARD.decode(&self.base64)?;
        if bytes.is_empty() {
            return Err(ImageError::EmptyData);
        }
        if bytes.len() > max_bytes {
            return Err(ImageError::TooLarge(bytes.len(), max_bytes));
        }
        Ok(bytes)
    }

    /// Detect the image format from the leading bytes without decoding the whole payload
    pub fn sniff_format(&self) -> Option<ImageFormat> {
        // 16 base64 chars = 12 bytes, enough for every signature below
        let encoded = self.base64.as_bytes();
        let usable = encoded.len().min(16) / 4 * 4;
        if usable < 8 {
            return None;
        }
        let bytes = STANDARD.decode(&encoded[..usable]).ok()?;
        detect_format(&bytes).ok()
    }

    /// MIME type announced to the vision model
    pub fn mime_type(&self) -> &'static str {
        self.sniff_format()
            .map(format_to_mime)
            .unwrap_or(FALLBACK_MIME_TYPE)
    }

    /// Inline `data:` URL for chat-completion image content
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type(), self.base64)
    }

    /// Decode into pixels
    pub fn to_image(&self, max_bytes: usize) -> Result<DynamicImage, ImageError> {
        let bytes = self.decode(max_bytes)?;
        decode_image_bytes(&bytes, max_bytes)
    }
}

/// Decode raw image bytes into pixels
pub fn decode_image_bytes(bytes: &[u8], max_bytes: usize) -> Result<DynamicImage, ImageError> {
    if bytes.is_empty() {
        return Err(ImageError::EmptyData);
    }
    if bytes.len() > max_bytes {
        return Err(ImageError::TooLarge(bytes.len(), max_bytes));
    }

    let format = detect_format(bytes)?;
    image::load_from_memory_with_format(bytes, format)
        .map_err(|e| ImageError::DecodeFailed(e.to_string()))
}

/// Detect image format from magic bytes
pub fn detect_format(bytes: &[u8]) -> Result<ImageFormat, ImageError> {
    match bytes {
        [0x89, 0x50, 0x4E, 0x47, ..] => Ok(ImageFormat::Png),
        [0xFF, 0xD8, 0xFF, ..] => Ok(ImageFormat::Jpeg),
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => Ok(ImageFormat::WebP),
        [0x47, 0x49, 0x46, 0x38, x, ..] if *x == 0x37 || *x == 0x39 => Ok(ImageFormat::Gif),
        [0x42, 0x4D, ..] => Ok(ImageFormat::Bmp),
        _ => Err(ImageError::UnsupportedFormat),
    }
}

/// MIME type for a detected format
pub fn format_to_mime(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Png => "image/png",
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::WebP => "image/webp",
        ImageFormat::Gif => "image/gif",
        ImageFormat::Bmp => "image/bmp",
        _ => FALLBACK_MIME_TYPE,
    }
}
