// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Generative vision model client (Responses-API shaped).

use crate::config::Config;
use crate::error::ApiError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::{json, Value};
use std::time::Duration;

/// Instruction prompt sent with every furnishing request.
///
/// The vocabulary lists are the canonical terms the merge pipeline expects;
/// the model is told to emit raw JSON, though fenced and double-encoded
/// replies are recovered downstream anyway.
const LAYOUT_PROMPT: &str = "\
You are an architectural assistant.

INPUTS:
  - A floor-plan image (PNG/JPEG).
  - A detection JSON from our UI with
      points  - list of boxes for structural elements
      classes - list of names parallel to points
      Width, Height, averageDoor

TASK:
  Infer likely furniture positions from the image and the given structure,
  and return them as additional axis-aligned boxes in pixel coordinates.

REQUIREMENTS:
  - Do NOT modify the given 'points', 'classes', 'Width', 'Height',
    'averageDoor'.
  - Add a new top-level array: \"furniture\".
  - Each furniture item must be an object with keys:
      - x1, y1, x2, y2  (integers, image pixel space)
      - type            (one of: sofa, armchair, coffee table, tv stand,
        dining table, dining chair, bed, nightstand, wardrobe/closet,
        dresser, desk, office chair, bookshelf, kitchen counter,
        stove/cooktop, sink, fridge, oven, island, bathtub, shower, toilet,
        bathroom sink/vanity, washing machine, dryer, rug, side table,
        bench, shoe rack, radiator)
      - room            (one of: living, bedroom, kitchen, bathroom,
        corridor, storage, balcony, porch, garage, office, great room,
        dining, master, unknown)
      - confidence      (0..1 float)
  - Boxes MUST satisfy x1 < x2 and y1 < y2.
  - Do NOT hallucinate dense furniture - only include items you clearly see
    or can strongly infer from the plan symbols.
  - If room is unclear, use \"unknown\".
  - Keep counts manageable (prefer fewer, high-confidence items).
  - Ensure all boxes lie within [0, Width) x [0, Height).

OUTPUT:
Return ONE raw JSON object with the SAME top-level keys you received
(points, classes, Width, Height, averageDoor) PLUS \"furniture\".
No markdown fences, no escaping.
";

/// Client for the generative model backend.
pub struct ModelClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl ModelClient {
    /// Build the client from configuration; `None` without an API key.
    pub fn from_config(config: &Config) -> Option<Self> {
        let api_key = config.model_api_key.clone()?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.predictor_timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        Some(Self {
            http,
            base_url: config.model_api_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model_name.clone(),
        })
    }

    /// Ask the model for furniture placements; returns the raw reply text.
    ///
    /// The reply is deliberately NOT parsed here: recovery decoding is the
    /// core pipeline's job.
    pub async fn infer_layout(
        &self,
        image: &[u8],
        mime: &str,
        baseline_json: &str,
    ) -> Result<String, ApiError> {
        let image_url = format!("data:{};base64,{}", mime, BASE64.encode(image));
        let body = json!({
            "model": self.model,
            "input": [{
                "role": "user",
                "content": [
                    { "type": "input_text", "text": LAYOUT_PROMPT },
                    { "type": "input_text", "text": baseline_json },
                    { "type": "input_image", "image_url": image_url },
                ],
            }],
        });

        let resp = self
            .http
            .post(format!("{}/responses", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Model(format!("request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Model(format!("HTTP {status}: {body}")));
        }

        let payload: Value = resp
            .json()
            .await
            .map_err(|e| ApiError::Model(format!("response decode failed: {e}")))?;
        Ok(output_text(&payload))
    }
}

/// Extract the reply text from a Responses-API payload.
///
/// Prefers the aggregated `output_text` field, then assembles the text parts
/// of the `output` array. With neither present the whole payload is returned
/// verbatim and left to the recovery parser (fail-open).
fn output_text(payload: &Value) -> String {
    if let Some(text) = payload.get("output_text").and_then(Value::as_str) {
        return text.to_string();
    }

    let mut assembled = String::new();
    if let Some(items) = payload.get("output").and_then(Value::as_array) {
        for item in items {
            let Some(parts) = item.get("content").and_then(Value::as_array) else {
                continue;
            };
            for part in parts {
                if part.get("type").and_then(Value::as_str) == Some("output_text") {
                    if let Some(text) = part.get("text").and_then(Value::as_str) {
                        assembled.push_str(text);
                    }
                }
            }
        }
    }

    if assembled.is_empty() {
        payload.to_string()
    } else {
        assembled
    }
}
