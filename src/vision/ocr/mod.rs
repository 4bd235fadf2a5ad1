// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! PaddleOCR integration for text extraction from images
//!
//! CPU-only ONNX inference, compiled with the `local-ocr` feature.
//!
//! Components:
//! - `preprocessing` - Letterboxing and tensor layout for both models
//! - `detection` - Text region detection (DB)
//! - `recognition` - Line recognition with CTC decoding
//! - `engine` - Combined pipeline used by the local text extractor

pub mod detection;
pub mod engine;
pub mod preprocessing;
pub mod recognition;

pub use detection::{TextBox, TextDetector};
pub use engine::OcrEngine;
pub use recognition::{RecognizedText, TextRecognizer};
