// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision layer: image payloads, the remote vision-language model and local OCR
//!
//! This module provides:
//! - `ImagePayload` handling (base64 transport, MIME sniffing, decoding)
//! - The `VisionModel` capability and its chat-completions client
//! - PaddleOCR via ONNX Runtime (feature `local-ocr`)

pub mod image_utils;
pub mod model;
#[cfg(feature = "local-ocr")]
pub mod ocr;
pub mod vlm_client;

pub use image_utils::{decode_image_bytes, detect_format, ImageError, ImagePayload};
pub use model::{CompletionOptions, VisionError, VisionModel};
pub use vlm_client::VlmClient;
