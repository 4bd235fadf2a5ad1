// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! PaddleOCR text detection
//!
//! Runs the DB detection model and turns its probability map into text boxes
//! with a connected-component pass.

use anyhow::{anyhow, Context, Result};
use ndarray::{Array4, ArrayViewD, IxDyn};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

/// Probability above which a pixel counts as text
pub const DEFAULT_BOX_THRESHOLD: f32 = 0.3;

/// Components smaller than this many pixels are noise
const MIN_COMPONENT_PIXELS: usize = 10;

/// A detected text box in detection-model space
#[derive(Debug, Clone, PartialEq)]
pub struct TextBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub confidence: f32,
}

/// Text region detector backed by an ONNX session
pub struct TextDetector {
    session: Mutex<Session>,
    input_name: String,
    threshold: f32,
}

impl std::fmt::Debug for TextDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextDetector")
            .field("input_name", &self.input_name)
            .field("threshold", &self.threshold)
            .finish_non_exhaustive()
    }
}

impl TextDetector {
    /// Load the detection model (`det_model.onnx`)
    pub fn load(model_path: &Path) -> Result<Self> {
        if !model_path.exists() {
            anyhow::bail!("OCR detection model not found: {}", model_path.display());
        }

        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(4)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .with_context(|| format!("Failed to load detection model {}", model_path.display()))?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .unwrap_or_else(|| "x".to_string());

        info!("OCR detection model loaded from {}", model_path.display());

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            threshold: DEFAULT_BOX_THRESHOLD,
        })
    }

    /// Detect text boxes, ordered top-to-bottom then left-to-right
    pub fn detect(&self, input: &Array4<f32>) -> Result<Vec<TextBox>> {
        let shape = input.shape();
        if shape[0] != 1 || shape[1] != 3 {
            anyhow::bail!("Invalid detection input shape {:?}, expected [1, 3, H, W]", shape);
        }
        let (input_h, input_w) = (shape[2], shape[3]);

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow!("detection session lock poisoned"))?;
        let input_value =
            Value::from_array(input.to_owned()).context("Failed to create input tensor")?;
        let outputs = session
            .run(ort::inputs![&self.input_name => input_value])
            .context("Detection inference failed")?;
        let probabilities = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract detection output")?;

        let boxes = boxes_from_probability_map(probabilities, input_h, input_w, self.threshold)?;
        debug!("Detected {} text regions", boxes.len());
        Ok(boxes)
    }
}

/// Connected components of the thresholded probability map, scaled to input space
pub fn boxes_from_probability_map(
    map: ArrayViewD<f32>,
    input_h: usize,
    input_w: usize,
    threshold: f32,
) -> Result<Vec<TextBox>> {
    let shape = map.shape().to_vec();
    let (height, width) = match shape.len() {
        4 => (shape[2], shape[3]),
        3 => (shape[1], shape[2]),
        _ => anyhow::bail!("Unexpected detection output shape: {:?}", shape),
    };
    let prob = |x: usize, y: usize| -> f32 {
        if shape.len() == 4 {
            map[IxDyn(&[0, 0, y, x])]
        } else {
            map[IxDyn(&[0, y, x])]
        }
    };

    let scale_x = input_w as f32 / width as f32;
    let scale_y = input_h as f32 / height as f32;
    let mut visited = vec![false; width * height];
    let mut boxes = Vec::new();

    for start_y in 0..height {
        for start_x in 0..width {
            if visited[start_y * width + start_x] || prob(start_x, start_y) < threshold {
                continue;
            }

            let (mut min_x, mut max_x, mut min_y, mut max_y) = (start_x, start_x, start_y, start_y);
            let mut count = 0usize;
            let mut total = 0.0f32;
            let mut stack = vec![(start_x, start_y)];
            visited[start_y * width + start_x] = true;

            while let Some((x, y)) = stack.pop() {
                let p = prob(x, y);
                count += 1;
                total += p;
                min_x = min_x.min(x);
                max_x = max_x.max(x);
                min_y = min_y.min(y);
                max_y = max_y.max(y);

                let neighbours = [
                    (x.wrapping_sub(1), y),
                    (x + 1, y),
                    (x, y.wrapping_sub(1)),
                    (x, y + 1),
                ];
                for (nx, ny) in neighbours {
                    if nx < width
                        && ny < height
                        && !visited[ny * width + nx]
                        && prob(nx, ny) >= threshold
                    {
                        visited[ny * width + nx] = true;
                        stack.push((nx, ny));
                    }
                }
            }

            if count > MIN_COMPONENT_PIXELS {
                boxes.push(TextBox {
                    x: min_x as f32 * scale_x,
                    y: min_y as f32 * scale_y,
                    width: (max_x - min_x + 1) as f32 * scale_x,
                    height: (max_y - min_y + 1) as f32 * scale_y,
                    confidence: total / count as f32,
                });
            }
        }
    }

    boxes.sort_by(|a, b| {
        a.y.partial_cmp(&b.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    Ok(boxes)
}
