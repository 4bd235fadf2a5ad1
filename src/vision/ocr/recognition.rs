// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! PaddleOCR text recognition with greedy CTC decoding

use anyhow::{anyhow, Context, Result};
use ndarray::{Array4, ArrayViewD, IxDyn};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;

/// Dictionary file names looked up inside a model directory
const DICTIONARY_FILES: &[&str] = &["ppocr_keys_v1.txt", "dict.txt", "latin_dict.txt"];

/// Text read from one line crop
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizedText {
    pub text: String,
    /// Mean probability of the emitted characters
    pub confidence: f32,
}

/// Line recognizer backed by an ONNX session and a character dictionary
pub struct TextRecognizer {
    label: String,
    session: Mutex<Session>,
    input_name: String,
    dictionary: Vec<char>,
}

impl std::fmt::Debug for TextRecognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextRecognizer")
            .field("label", &self.label)
            .field("input_name", &self.input_name)
            .field("dictionary_size", &self.dictionary.len())
            .finish_non_exhaustive()
    }
}

impl TextRecognizer {
    /// Load `rec_model.onnx` and its dictionary from `model_dir`
    pub fn load(label: &str, model_dir: &Path) -> Result<Self> {
        let model_path = model_dir.join("rec_model.onnx");
        if !model_path.exists() {
            anyhow::bail!("OCR recognition model not found: {}", model_path.display());
        }
        let dict_path = find_dictionary(model_dir)?;
        let dictionary = load_dictionary(&dict_path)?;

        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(4)
            .context("Failed to set intra threads")?
            .commit_from_file(&model_path)
            .with_context(|| {
                format!("Failed to load recognition model {}", model_path.display())
            })?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .unwrap_or_else(|| "x".to_string());

        info!(
            "OCR recognizer '{}' loaded from {} ({} characters)",
            label,
            model_dir.display(),
            dictionary.len()
        );

        Ok(Self {
            label: label.to_string(),
            session: Mutex::new(session),
            input_name,
            dictionary,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Recognize one preprocessed line tensor `[1, 3, 48, W]`
    pub fn recognize(&self, input: &Array4<f32>) -> Result<RecognizedText> {
        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow!("recognition session lock poisoned"))?;
        let input_value =
            Value::from_array(input.to_owned()).context("Failed to create input tensor")?;
        let outputs = session
            .run(ort::inputs![&self.input_name => input_value])
            .context("Recognition inference failed")?;
        let scores = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract recognition output")?;

        ctc_greedy_decode(scores, &self.dictionary)
    }
}

fn find_dictionary(model_dir: &Path) -> Result<PathBuf> {
    DICTIONARY_FILES
        .iter()
        .map(|name| model_dir.join(name))
        .find(|path| path.exists())
        .ok_or_else(|| anyhow!("No character dictionary found in {}", model_dir.display()))
}

/// One character per line; index 0 is reserved for the CTC blank
pub fn load_dictionary(path: &Path) -> Result<Vec<char>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read dictionary {}", path.display()))?;

    let mut dictionary = vec!['\u{0}'];
    dictionary.extend(content.lines().filter_map(|line| line.chars().next()));
    // PaddleOCR appends the space class after the dictionary entries
    dictionary.push(' ');
    Ok(dictionary)
}

/// Best-path decoding: argmax per step, collapse repeats, drop blanks
pub fn ctc_greedy_decode(scores: ArrayViewD<f32>, dictionary: &[char]) -> Result<RecognizedText> {
    let shape = scores.shape().to_vec();
    let (steps, classes) = match shape.len() {
        3 => (shape[1], shape[2]),
        2 => (shape[0], shape[1]),
        _ => anyhow::bail!("Unexpected recognition output shape: {:?}", shape),
    };

    let mut text = String::new();
    let mut confidence_sum = 0.0f32;
    let mut emitted = 0usize;
    let mut previous = 0usize;

    for t in 0..steps {
        let (best, best_score) = (0..classes)
            .map(|c| {
                let score = if shape.len() == 3 {
                    scores[IxDyn(&[0, t, c])]
                } else {
                    scores[IxDyn(&[t, c])]
                };
                (c, score)
            })
            .fold((0usize, f32::NEG_INFINITY), |acc, item| {
                if item.1 > acc.1 {
                    item
                } else {
                    acc
                }
            });

        if best != 0 && best != previous {
            if let Some(ch) = dictionary.get(best) {
                text.push(*ch);
                confidence_sum += best_score;
                emitted += 1;
            }
        }
        previous = best;
    }

    let confidence = if emitted == 0 {
        0.0
    } else {
        (confidence_sum / emitted as f32).clamp(0.0, 1.0)
    };

    Ok(RecognizedText { text, confidence })
}
