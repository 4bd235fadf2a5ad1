// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Moderation request types and validation

use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;
use crate::vision::ImagePayload;

/// Body of `POST /moderate_image`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModerateImageRequest {
    /// Base64-encoded image, optionally as a `data:` URL
    #[serde(default)]
    pub image: Option<String>,
}

impl ModerateImageRequest {
    /// Validate the request and take the image payload
    ///
    /// An empty string is accepted and handled downstream like any other
    /// undecodable image.
    pub fn into_payload(self) -> Result<ImagePayload, ApiError> {
        self.image
            .map(ImagePayload::from_base64)
            .ok_or(ApiError::MissingImage)
    }
}
