// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Object-detector sidecar client.
//!
//! The detector itself (model weights, tensors, NMS) runs in a separate
//! inference service; this client ships it a preprocessed image and turns
//! the wire reply into the core adapter's `RawDetection` shape.

use crate::config::Config;
use crate::error::ApiError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use furnish_core::{DetectionGeometry, RawDetection};
use rustc_hash::FxHashMap;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;

/// One detection as sent by the sidecar.
#[derive(Debug, Clone, Deserialize)]
struct WireDetection {
    class_id: usize,
    confidence: f32,
    /// Axis-aligned box `[x1, y1, x2, y2]`.
    #[serde(default)]
    xyxy: Option<[f64; 4]>,
    /// Oriented box corners `[x0, y0, ..., x3, y3]`; preferred when present.
    #[serde(default)]
    polygon: Option<[f64; 8]>,
}

/// Sidecar reply.
#[derive(Debug, Clone, Deserialize)]
struct WireResponse {
    #[serde(default)]
    mode_used: Option<String>,
    /// Class-id -> name table; JSON object keys arrive as strings.
    #[serde(default)]
    names: HashMap<String, String>,
    #[serde(default)]
    detections: Vec<WireDetection>,
}

/// Adapted detector output ready for the core pipeline.
#[derive(Debug)]
pub struct DetectorOutput {
    pub detections: Vec<RawDetection>,
    pub class_names: FxHashMap<usize, String>,
    pub mode_used: String,
}

/// Client for the object-detector sidecar.
pub struct DetectorClient {
    http: reqwest::Client,
    base_url: String,
}

impl DetectorClient {
    /// Build the client from configuration; `None` without a sidecar URL.
    pub fn from_config(config: &Config) -> Option<Self> {
        let base_url = config.detector_url.clone()?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.predictor_timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        Some(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Run detection on a PNG-encoded image.
    pub async fn detect(
        &self,
        image_png: &[u8],
        mode: &str,
        conf: f32,
        iou: f32,
    ) -> Result<DetectorOutput, ApiError> {
        let body = json!({
            "image": BASE64.encode(image_png),
            "mode": mode,
            "conf": conf,
            "iou": iou,
        });

        let resp = self
            .http
            .post(format!("{}/detect", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Detector(format!("request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Detector(format!("HTTP {status}: {body}")));
        }

        let wire: WireResponse = resp
            .json()
            .await
            .map_err(|e| ApiError::Detector(format!("response decode failed: {e}")))?;
        Ok(convert(wire, mode))
    }
}

/// Turn the wire reply into `RawDetection`s and a usable class table.
fn convert(wire: WireResponse, requested_mode: &str) -> DetectorOutput {
    let class_names: FxHashMap<usize, String> = wire
        .names
        .into_iter()
        .filter_map(|(id, name)| id.parse::<usize>().ok().map(|id| (id, name)))
        .collect();

    let detections = wire
        .detections
        .into_iter()
        .filter_map(|det| {
            let geometry = match (det.polygon, det.xyxy) {
                (Some(corners), _) => DetectionGeometry::Oriented(corners),
                (None, Some(coords)) => DetectionGeometry::Axis(coords),
                (None, None) => return None,
            };
            Some(RawDetection {
                geometry,
                class_id: det.class_id,
                confidence: det.confidence,
            })
        })
        .collect();

    DetectorOutput {
        detections,
        class_names,
        mode_used: wire.mode_used.unwrap_or_else(|| requested_mode.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_reply_converts_to_raw_detections() {
        let wire: WireResponse = serde_json::from_str(
            r#"{
                "mode_used": "obb",
                "names": {"0": "couch", "7": "dog", "bogus": "skipped"},
                "detections": [
                    {"class_id": 0, "confidence": 0.8,
                     "polygon": [1, 2, 3, 2, 3, 4, 1, 4]},
                    {"class_id": 7, "confidence": 0.9, "xyxy": [5, 6, 7, 8]},
                    {"class_id": 7, "confidence": 0.1}
                ]
            }"#,
        )
        .unwrap();

        let output = convert(wire, "detect");

        assert_eq!(output.mode_used, "obb");
        assert_eq!(output.class_names.get(&0).map(String::as_str), Some("couch"));
        assert_eq!(output.class_names.len(), 2);
        // the geometry-less detection is skipped
        assert_eq!(output.detections.len(), 2);
        assert!(matches!(output.detections[0].geometry, DetectionGeometry::Oriented(_)));
        assert!(matches!(output.detections[1].geometry, DetectionGeometry::Axis(_)));
    }

    #[test]
    fn missing_mode_falls_back_to_the_requested_one() {
        let wire: WireResponse = serde_json::from_str(r#"{"detections": []}"#).unwrap();
        let output = convert(wire, "detect");
        assert_eq!(output.mode_used, "detect");
        assert!(output.detections.is_empty());
    }
}
