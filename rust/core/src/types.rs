// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types for furniture detection and document merging

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Schema marker stamped on merged documents that do not already carry one.
pub const SCHEMA_VERSION: &str = "furnish.v1";

/// Axis-aligned box in image pixel space.
///
/// Sanitized boxes satisfy `x1 < x2` and `y1 < y2` with every coordinate in
/// `[0, dimension - 1]`. Anything else only exists before sanitization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl BoundingBox {
    pub fn width(&self) -> u32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> u32 {
        self.y2 - self.y1
    }
}

/// One furniture entry of a merged document.
///
/// Serializes flat (`x1,y1,x2,y2,type,room,confidence`), matching the wire
/// shape consumed by the floor-plan UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FurnitureItem {
    #[serde(flatten)]
    pub bbox: BoundingBox,
    /// Lower-cased label, open vocabulary (whitelist-filtered on the
    /// detector path before it gets here).
    #[serde(rename = "type")]
    pub kind: String,
    /// Lower-cased room name, `"unknown"` when the predictor gave none.
    pub room: String,
    /// Confidence in `[0, 1]`.
    pub confidence: f32,
}

/// Furniture candidate before sanitization.
///
/// Field values are taken as-is from untrusted model or detector output;
/// [`FurnitureCandidate::from_value`] applies the documented coercion
/// defaults (non-numeric coordinate -> 0, missing type/room -> unknown,
/// confidence falling back to `score`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FurnitureCandidate {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub kind: String,
    pub room: Option<String>,
    pub confidence: f64,
}

impl FurnitureCandidate {
    /// Coerce a loose JSON object into a candidate. Never fails.
    pub fn from_value(value: &Value) -> Self {
        let coord = |key: &str| value.get(key).map(as_number).unwrap_or(0.0);
        let confidence = value
            .get("confidence")
            .or_else(|| value.get("score"))
            .map(as_number)
            .unwrap_or(0.0);
        Self {
            x1: coord("x1"),
            y1: coord("y1"),
            x2: coord("x2"),
            y2: coord("y2"),
            kind: string_or(value.get("type"), "unknown"),
            room: value.get("room").map(|room| string_or(Some(room), "unknown")),
            confidence,
        }
    }
}

/// Parse a JSON value as a number: accepts numbers and numeric strings,
/// anything else coerces to 0.
fn as_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn string_or(value: Option<&Value>, default: &str) -> String {
    match value {
        None | Some(Value::Null) => default.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// A baseline document enriched with a sanitized furniture list.
///
/// Baseline fields are preserved verbatim: `points`, `classes` and
/// `averageDoor` are copied through untyped (the caller's structural data is
/// never validated for shape), and unknown baseline keys survive in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedDocument {
    #[serde(rename = "Width")]
    pub width: u32,
    #[serde(rename = "Height")]
    pub height: u32,
    pub points: Value,
    pub classes: Value,
    #[serde(rename = "averageDoor")]
    pub average_door: Value,
    pub furniture: Vec<FurnitureItem>,
    pub schema_version: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
