// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Adapting heterogeneous predictor output to furniture candidates
//!
//! Two predictor shapes feed the merge pipeline: a generative model's
//! free-text JSON reply and an object detector's geometric output. Both are
//! reduced to the same candidate list here, so the merger never learns where
//! its input came from.

use crate::error::Result;
use crate::labels::{is_furniture, normalize_label};
use crate::reply::parse_model_reply;
use crate::types::FurnitureCandidate;
use rustc_hash::FxHashMap;
use serde_json::Value;

/// Detector output geometry, axis-aligned or oriented.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetectionGeometry {
    /// `[x1, y1, x2, y2]`
    Axis([f64; 4]),
    /// Four corner points, `[x0, y0, x1, y1, x2, y2, x3, y3]`
    Oriented([f64; 8]),
}

impl DetectionGeometry {
    /// Axis-aligned envelope as `(x1, y1, x2, y2)`.
    ///
    /// For oriented geometry this is the min/max over the four corner
    /// x- and y-coordinates.
    pub fn envelope(&self) -> (f64, f64, f64, f64) {
        match self {
            Self::Axis([x1, y1, x2, y2]) => (*x1, *y1, *x2, *y2),
            Self::Oriented(corners) => {
                let xs = [corners[0], corners[2], corners[4], corners[6]];
                let ys = [corners[1], corners[3], corners[5], corners[7]];
                (fold_min(&xs), fold_min(&ys), fold_max(&xs), fold_max(&ys))
            }
        }
    }
}

fn fold_min(values: &[f64; 4]) -> f64 {
    values.iter().copied().fold(f64::INFINITY, f64::min)
}

fn fold_max(values: &[f64; 4]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// One raw detection from an object detector.
#[derive(Debug, Clone)]
pub struct RawDetection {
    pub geometry: DetectionGeometry,
    /// Model-specific class index, resolved through the class-name table.
    pub class_id: usize,
    pub confidence: f32,
}

/// A furniture candidate list from one of the supported predictor shapes.
#[derive(Debug)]
pub enum DetectionSource<'a> {
    /// Free-text reply from a generative vision model.
    ModelReply(&'a str),
    /// Geometric detections plus the model's class-id -> name table.
    Detector {
        detections: &'a [RawDetection],
        class_names: &'a FxHashMap<usize, String>,
    },
}

impl DetectionSource<'_> {
    /// Reduce this source to furniture candidates.
    ///
    /// Only the model-reply variant can fail (reply decoding is the
    /// pipeline's one hard failure); detector output always adapts.
    pub fn candidates(&self) -> Result<Vec<FurnitureCandidate>> {
        match self {
            Self::ModelReply(raw) => {
                let doc = parse_model_reply(raw)?;
                Ok(candidates_from_reply(&doc))
            }
            Self::Detector { detections, class_names } => {
                Ok(candidates_from_detections(detections, class_names))
            }
        }
    }
}

/// Take the `furniture` array of a parsed reply document as candidates.
///
/// The model is prompted with the canonical vocabulary, so its labels are
/// not whitelist-filtered; a missing or non-array `furniture` key yields an
/// empty list.
pub fn candidates_from_reply(doc: &Value) -> Vec<FurnitureCandidate> {
    match doc.get("furniture") {
        Some(Value::Array(items)) => items.iter().map(FurnitureCandidate::from_value).collect(),
        _ => Vec::new(),
    }
}

/// Convert detector output to candidates, keeping only furniture classes.
///
/// Labels are normalized before the whitelist check; class ids missing from
/// the table fall back to `class_{id}` (and are therefore filtered out).
/// `room` is left unset and defaulted downstream by the merger.
pub fn candidates_from_detections(
    detections: &[RawDetection],
    class_names: &FxHashMap<usize, String>,
) -> Vec<FurnitureCandidate> {
    detections
        .iter()
        .filter_map(|detection| {
            let raw_label = class_names
                .get(&detection.class_id)
                .cloned()
                .unwrap_or_else(|| format!("class_{}", detection.class_id));
            let label = normalize_label(&raw_label);
            if !is_furniture(&label) {
                return None;
            }
            let (x1, y1, x2, y2) = detection.geometry.envelope();
            Some(FurnitureCandidate {
                x1,
                y1,
                x2,
                y2,
                kind: label,
                room: None,
                confidence: detection.confidence as f64,
            })
        })
        .collect()
}
