// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types and handling for the server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing '{0}' field in request")]
    MissingField(&'static str),

    #[error("Unsupported image type (use PNG or JPEG)")]
    UnsupportedImage,

    #[error("Image too large: maximum size is {max_mb} MB")]
    ImageTooLarge { max_mb: usize },

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Multipart error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error(transparent)]
    Reply(#[from] furnish_core::Error),

    #[error("Model backend error: {0}")]
    Model(String),

    #[error("Detector backend error: {0}")]
    Detector(String),

    #[error("Generation backend error: {0}")]
    Diffusion(String),

    #[error("Model backend is not configured")]
    ModelUnavailable,

    #[error("Detector backend is not configured")]
    DetectorUnavailable,

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::MissingField(_) => (StatusCode::BAD_REQUEST, "MISSING_FIELD"),
            ApiError::UnsupportedImage => (StatusCode::BAD_REQUEST, "UNSUPPORTED_IMAGE"),
            ApiError::ImageTooLarge { .. } => (StatusCode::PAYLOAD_TOO_LARGE, "IMAGE_TOO_LARGE"),
            ApiError::InvalidImage(_) => (StatusCode::BAD_REQUEST, "INVALID_IMAGE"),
            ApiError::Multipart(_) => (StatusCode::BAD_REQUEST, "MULTIPART_ERROR"),
            ApiError::Reply(_) => (StatusCode::BAD_GATEWAY, "MODEL_REPLY_ERROR"),
            ApiError::Model(_) => (StatusCode::BAD_GATEWAY, "MODEL_ERROR"),
            ApiError::Detector(_) => (StatusCode::BAD_GATEWAY, "DETECTOR_ERROR"),
            ApiError::Diffusion(_) => (StatusCode::BAD_GATEWAY, "DIFFUSION_ERROR"),
            ApiError::ModelUnavailable => (StatusCode::SERVICE_UNAVAILABLE, "MODEL_UNAVAILABLE"),
            ApiError::DetectorUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, "DETECTOR_UNAVAILABLE")
            }
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
