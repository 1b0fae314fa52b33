// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Server configuration loaded from environment variables.

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on.
    pub port: u16,
    /// Maximum uploaded image size in MB.
    pub max_image_mb: usize,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Timeout for predictor backend calls in seconds.
    pub predictor_timeout_secs: u64,
    /// Base URL of the generative model API (Responses-API shaped).
    pub model_api_url: String,
    /// API key for the generative model; the model endpoint is disabled
    /// without it.
    pub model_api_key: Option<String>,
    /// Model name sent with every generation request.
    pub model_name: String,
    /// Base URL of the object-detector sidecar, if deployed.
    pub detector_url: Option<String>,
    /// Base URL of the diffusion sidecar, if deployed.
    pub diffusion_url: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5200".into())
                .parse()
                .unwrap_or(5200),
            max_image_mb: std::env::var("MAX_IMAGE_MB")
                .unwrap_or_else(|_| "4".into())
                .parse()
                .unwrap_or(4),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "300".into())
                .parse()
                .unwrap_or(300),
            predictor_timeout_secs: std::env::var("PREDICTOR_TIMEOUT_SECS")
                .unwrap_or_else(|_| "180".into())
                .parse()
                .unwrap_or(180),
            model_api_url: std::env::var("MODEL_API_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".into()),
            model_api_key: std::env::var("MODEL_API_KEY").ok().filter(|key| !key.is_empty()),
            model_name: std::env::var("MODEL_NAME").unwrap_or_else(|_| "gpt-5".into()),
            detector_url: std::env::var("DETECTOR_URL").ok().filter(|url| !url.is_empty()),
            diffusion_url: std::env::var("DIFFUSION_URL").ok().filter(|url| !url.is_empty()),
        }
    }
}
