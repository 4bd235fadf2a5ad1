// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! End-to-end local OCR: detect regions, crop them, recognize each line

use anyhow::Result;
use image::{DynamicImage, GenericImageView};
use tracing::debug;

use super::detection::{TextBox, TextDetector};
use super::preprocessing::{detection_tensor, recognition_tensor, Letterbox};
use super::recognition::{RecognizedText, TextRecognizer};
use crate::config::OcrConfig;
use crate::moderation::ImageTextReader;

/// Crops are padded by this fraction of their height so glyph edges survive
const CROP_MARGIN: f32 = 0.15;

/// PaddleOCR pipeline with a primary recognizer and an optional latin fallback
#[derive(Debug)]
pub struct OcrEngine {
    detector: TextDetector,
    recognizers: Vec<TextRecognizer>,
}

impl OcrEngine {
    /// Load models from the configured directories
    ///
    /// The primary directory must hold `det_model.onnx`, `rec_model.onnx` and a
    /// dictionary; the fallback directory only needs a recognizer.
    pub fn load(config: &OcrConfig) -> Result<Self> {
        let detector = TextDetector::load(&config.model_dir.join("det_model.onnx"))?;
        let mut recognizers = vec![TextRecognizer::load("primary", &config.model_dir)?];
        if let Some(dir) = &config.fallback_model_dir {
            recognizers.push(TextRecognizer::load("latin", dir)?);
        }
        Ok(Self {
            detector,
            recognizers,
        })
    }

    /// Recognized lines joined with newlines, top to bottom
    pub fn read_text(&self, image: &DynamicImage) -> Result<String> {
        let (tensor, letterbox) = detection_tensor(image);
        let boxes = self.detector.detect(&tensor)?;

        let mut lines = Vec::with_capacity(boxes.len());
        for text_box in &boxes {
            let Some(crop) = crop_region(image, text_box, &letterbox) else {
                continue;
            };
            let line = recognition_tensor(&crop);
            if let Some(best) = self.best_reading(&line)? {
                if !best.text.trim().is_empty() {
                    lines.push(best.text);
                }
            }
        }

        debug!("Local OCR read {} lines from {} regions", lines.len(), boxes.len());
        Ok(lines.join("\n"))
    }

    fn best_reading(&self, line: &ndarray::Array4<f32>) -> Result<Option<RecognizedText>> {
        let mut best: Option<RecognizedText> = None;
        for recognizer in &self.recognizers {
            let reading = recognizer.recognize(line)?;
            debug!(
                recognizer = recognizer.label(),
                confidence = reading.confidence,
                "line recognized"
            );
            if best
                .as_ref()
                .map_or(true, |current| reading.confidence > current.confidence)
            {
                best = Some(reading);
            }
        }
        Ok(best)
    }
}

impl ImageTextReader for OcrEngine {
    fn read_text(&self, image: &DynamicImage) -> Result<String> {
        OcrEngine::read_text(self, image)
    }
}

/// Crop a detected box out of the source image, `None` if it falls outside
pub fn crop_region(image: &DynamicImage, text_box: &TextBox, letterbox: &Letterbox) -> Option<DynamicImage> {
    let (img_w, img_h) = image.dimensions();
    let margin = text_box.height * CROP_MARGIN;
    let (x0, y0) = letterbox.to_source(text_box.x - margin, text_box.y - margin);
    let (x1, y1) = letterbox.to_source(
        text_box.x + text_box.width + margin,
        text_box.y + text_box.height + margin,
    );

    let left = x0.max(0.0).floor() as u32;
    let top = y0.max(0.0).floor() as u32;
    let right = (x1.ceil().max(0.0) as u32).min(img_w);
    let bottom = (y1.ceil().max(0.0) as u32).min(img_h);

    if right <= left || bottom <= top {
        return None;
    }
    Some(image.crop_imm(left, top, right - left, bottom - top))
}
