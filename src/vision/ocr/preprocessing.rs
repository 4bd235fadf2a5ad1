// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Tensor preparation for the PaddleOCR detection and recognition models

use image::{imageops::FilterType, DynamicImage, GenericImageView, Rgb, RgbImage};
use ndarray::Array4;

/// Square input size of the detection model
pub const DET_INPUT_SIZE: u32 = 640;

/// Recognition model input height
pub const REC_INPUT_HEIGHT: u32 = 48;

/// Widest recognition input; longer lines are squeezed
pub const REC_MAX_WIDTH: u32 = 960;

/// ImageNet normalization used by the detector
const DET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const DET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Letterbox geometry, used to map detections back onto the source image
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    pub scale: f32,
    pub offset_x: u32,
    pub offset_y: u32,
}

impl Letterbox {
    pub fn for_image(image: &DynamicImage, target: u32) -> Self {
        let (w, h) = image.dimensions();
        if w == 0 || h == 0 {
            return Self {
                scale: 1.0,
                offset_x: 0,
                offset_y: 0,
            };
        }
        let scale = (target as f32 / w as f32).min(target as f32 / h as f32);
        let new_w = ((w as f32 * scale).round() as u32).clamp(1, target);
        let new_h = ((h as f32 * scale).round() as u32).clamp(1, target);
        Self {
            scale,
            offset_x: (target - new_w) / 2,
            offset_y: (target - new_h) / 2,
        }
    }

    /// Map a point in model space back to source pixels
    pub fn to_source(&self, x: f32, y: f32) -> (f32, f32) {
        (
            (x - self.offset_x as f32) / self.scale,
            (y - self.offset_y as f32) / self.scale,
        )
    }
}

/// Letterbox an image onto a gray square of `target` pixels
pub fn letterbox(image: &DynamicImage, target: u32) -> (RgbImage, Letterbox) {
    let geometry = Letterbox::for_image(image, target);
    let mut canvas = RgbImage::from_pixel(target, target, Rgb([128, 128, 128]));

    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        return (canvas, geometry);
    }

    let new_w = ((w as f32 * geometry.scale).round() as u32).clamp(1, target);
    let new_h = ((h as f32 * geometry.scale).round() as u32).clamp(1, target);
    let resized = image
        .resize_exact(new_w, new_h, FilterType::Triangle)
        .to_rgb8();
    image::imageops::replace(
        &mut canvas,
        &resized,
        geometry.offset_x as i64,
        geometry.offset_y as i64,
    );

    (canvas, geometry)
}

/// Detection tensor `[1, 3, 640, 640]`
pub fn detection_tensor(image: &DynamicImage) -> (Array4<f32>, Letterbox) {
    let (canvas, geometry) = letterbox(image, DET_INPUT_SIZE);
    let size = DET_INPUT_SIZE as usize;
    let mut tensor = Array4::zeros((1, 3, size, size));

    for (x, y, pixel) in canvas.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] =
                (pixel[c] as f32 / 255.0 - DET_MEAN[c]) / DET_STD[c];
        }
    }

    (tensor, geometry)
}

/// Recognition tensor `[1, 3, 48, W]` for a cropped text line, values in `[-1, 1]`
pub fn recognition_tensor(line: &DynamicImage) -> Array4<f32> {
    let (w, h) = line.dimensions();
    let scale = REC_INPUT_HEIGHT as f32 / h.max(1) as f32;
    let width = ((w as f32 * scale).round() as u32).clamp(4, REC_MAX_WIDTH);

    let resized = line
        .resize_exact(width, REC_INPUT_HEIGHT, FilterType::Triangle)
        .to_rgb8();
    let mut tensor = Array4::zeros((1, 3, REC_INPUT_HEIGHT as usize, width as usize));

    for (x, y, pixel) in resized.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] = (pixel[c] as f32 / 255.0 - 0.5) / 0.5;
        }
    }

    tensor
}
