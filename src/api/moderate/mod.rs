// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image moderation endpoint
//!
//! Provides POST /moderate_image.

pub mod handler;
pub mod request;

pub use handler::moderate_image_handler;
pub use request::ModerateImageRequest;
