// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Depth-conditioned diffusion sidecar client.

use crate::config::Config;
use crate::error::ApiError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct GenerateReply {
    /// Base64-encoded PNG.
    image: String,
}

/// Client for the diffusion sidecar.
///
/// Callers treat every error as non-fatal: the generation endpoint falls
/// back to a graphical preview whenever this client fails.
pub struct DiffusionClient {
    http: reqwest::Client,
    base_url: String,
}

impl DiffusionClient {
    /// Build the client from configuration; `None` without a sidecar URL.
    pub fn from_config(config: &Config) -> Option<Self> {
        let base_url = config.diffusion_url.clone()?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.predictor_timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        Some(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Generate an image conditioned on a depth map; returns PNG bytes.
    pub async fn generate(
        &self,
        prompt: &str,
        depth_png: &[u8],
        steps: u32,
        guidance: f64,
        size: u32,
    ) -> Result<Vec<u8>, ApiError> {
        let body = json!({
            "prompt": prompt,
            "depth": BASE64.encode(depth_png),
            "steps": steps,
            "guidance": guidance,
            "size": size,
        });

        let resp = self
            .http
            .post(format!("{}/generate", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Diffusion(format!("request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Diffusion(format!("HTTP {status}: {body}")));
        }

        let reply: GenerateReply = resp
            .json()
            .await
            .map_err(|e| ApiError::Diffusion(format!("response decode failed: {e}")))?;
        BASE64
            .decode(reply.image.as_bytes())
            .map_err(|e| ApiError::Diffusion(format!("image decode failed: {e}")))
    }
}
