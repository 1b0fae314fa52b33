// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Merging furniture candidates into a caller-supplied baseline document
//!
//! The merge never fails: malformed baselines are replaced by an empty one,
//! bad field values are coerced to defaults, and invalid boxes are dropped.
//! Every degradation is visible in the returned [`MergeDiagnostics`].

use crate::sanitize::{clamp_confidence, sanitize_box};
use crate::types::{FurnitureCandidate, FurnitureItem, MergedDocument, SCHEMA_VERSION};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// What the merge did to its inputs.
///
/// Counts let the caller see data loss instead of inferring it from a
/// shrunken furniture list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeDiagnostics {
    /// Candidates received from the predictor.
    pub received: usize,
    /// Candidates that survived sanitization.
    pub kept: usize,
    /// Candidates rejected as zero-area after clamping and reordering.
    pub dropped_degenerate: usize,
    /// Confidence values that had to be clamped into `[0, 1]`.
    pub confidence_clamped: usize,
    /// The baseline text did not parse as a JSON object and was replaced.
    pub baseline_replaced: bool,
    /// Baseline carried no usable dimensions; the fallback dims were used.
    pub dims_from_fallback: bool,
}

/// A merged document plus the diagnostics describing how it was produced.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub document: MergedDocument,
    pub diagnostics: MergeDiagnostics,
}

/// Merge a furniture candidate list into a baseline document.
///
/// `fallback_dims` (typically the decoded image's pixel size) is used when
/// the baseline lacks a usable `Width`/`Height` pair. Structural baseline
/// fields pass through verbatim; candidates are coerced, sanitized against
/// the resolved dimensions, and dropped when degenerate.
pub fn merge_with_baseline(
    baseline_json: &str,
    candidates: &[FurnitureCandidate],
    fallback_dims: (u32, u32),
) -> MergeOutcome {
    let mut diagnostics = MergeDiagnostics {
        received: candidates.len(),
        ..Default::default()
    };

    let mut baseline = match serde_json::from_str::<Value>(baseline_json) {
        Ok(Value::Object(map)) => map,
        _ => {
            diagnostics.baseline_replaced = true;
            Map::new()
        }
    };

    let mut width = dimension(baseline.get("Width"));
    let mut height = dimension(baseline.get("Height"));
    if width == 0 || height == 0 {
        (width, height) = fallback_dims;
        diagnostics.dims_from_fallback = true;
    }

    let points = baseline.remove("points").unwrap_or_else(|| json!([]));
    let classes = baseline.remove("classes").unwrap_or_else(|| json!([]));
    let average_door = baseline.remove("averageDoor").unwrap_or_else(|| json!(0));
    let schema_version = match baseline.remove("schema_version") {
        Some(Value::String(version)) => version,
        _ => SCHEMA_VERSION.to_string(),
    };
    baseline.remove("Width");
    baseline.remove("Height");
    baseline.remove("furniture");

    let mut furniture = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        // counted for dropped candidates too; it is a predictor-quality
        // signal, not a property of the surviving list
        let (confidence, clamped) = clamp_confidence(candidate.confidence);
        if clamped {
            diagnostics.confidence_clamped += 1;
        }
        let Some(bbox) =
            sanitize_box(candidate.x1, candidate.y1, candidate.x2, candidate.y2, width, height)
        else {
            diagnostics.dropped_degenerate += 1;
            continue;
        };
        furniture.push(FurnitureItem {
            bbox,
            kind: candidate.kind.to_lowercase(),
            room: candidate.room.as_deref().unwrap_or("unknown").to_lowercase(),
            confidence,
        });
    }
    diagnostics.kept = furniture.len();

    MergeOutcome {
        document: MergedDocument {
            width,
            height,
            points,
            classes,
            average_door,
            furniture,
            schema_version,
            extra: baseline,
        },
        diagnostics,
    }
}

/// Coerce an optional baseline dimension to a non-negative integer.
fn dimension(value: Option<&Value>) -> u32 {
    let raw = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    };
    if raw.is_finite() && raw > 0.0 {
        raw.round() as u32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn candidate(x1: f64, y1: f64, x2: f64, y2: f64) -> FurnitureCandidate {
        FurnitureCandidate {
            x1,
            y1,
            x2,
            y2,
            kind: "sofa".into(),
            room: None,
            confidence: 0.9,
        }
    }

    #[test]
    fn baseline_fields_pass_through_verbatim() {
        let baseline = r#"{"Width":100,"Height":50,"points":[[1,2]],"classes":["wall"],
                           "averageDoor":42.5,"floor":"second"}"#;
        let outcome = merge_with_baseline(baseline, &[], (0, 0));
        let doc = &outcome.document;
        assert_eq!(doc.width, 100);
        assert_eq!(doc.height, 50);
        assert_eq!(doc.points, json!([[1, 2]]));
        assert_eq!(doc.classes, json!(["wall"]));
        assert_eq!(doc.average_door, json!(42.5));
        assert_eq!(doc.extra.get("floor"), Some(&json!("second")));
        assert_eq!(doc.schema_version, SCHEMA_VERSION);
        assert!(doc.furniture.is_empty());
        assert!(!outcome.diagnostics.baseline_replaced);
    }

    #[test]
    fn malformed_baseline_falls_open_to_fallback_dims() {
        let outcome = merge_with_baseline("{not json", &[], (400, 300));
        assert_eq!(outcome.document.width, 400);
        assert_eq!(outcome.document.height, 300);
        assert!(outcome.document.furniture.is_empty());
        assert!(outcome.diagnostics.baseline_replaced);
        assert!(outcome.diagnostics.dims_from_fallback);
    }

    #[test]
    fn non_object_baseline_is_replaced() {
        let outcome = merge_with_baseline("[1,2,3]", &[], (10, 10));
        assert!(outcome.diagnostics.baseline_replaced);
        assert_eq!(outcome.document.points, json!([]));
    }

    #[test]
    fn zero_dims_in_baseline_use_fallback() {
        let outcome = merge_with_baseline(r#"{"Width":0,"Height":200}"#, &[], (640, 480));
        assert_eq!(outcome.document.width, 640);
        assert_eq!(outcome.document.height, 480);
        assert!(outcome.diagnostics.dims_from_fallback);
    }

    #[test]
    fn spec_scenario_clamps_and_defaults() {
        let baseline = r#"{"Width":100,"Height":50,"points":[],"classes":[]}"#;
        let candidates = [FurnitureCandidate {
            x1: -5.0,
            y1: 10.0,
            x2: 200.0,
            y2: 40.0,
            kind: "Sofa".into(),
            room: None,
            confidence: 0.9,
        }];
        let outcome = merge_with_baseline(baseline, &candidates, (0, 0));
        let furniture = &outcome.document.furniture;
        assert_eq!(furniture.len(), 1);
        let item = &furniture[0];
        assert_eq!((item.bbox.x1, item.bbox.x2), (0, 99));
        assert_eq!((item.bbox.y1, item.bbox.y2), (10, 40));
        assert_eq!(item.kind, "sofa");
        assert_eq!(item.room, "unknown");
        assert_eq!(item.confidence, 0.9);
    }

    #[test]
    fn degenerate_candidates_are_dropped_and_counted() {
        let baseline = r#"{"Width":100,"Height":100}"#;
        let candidates = [
            candidate(10.0, 10.0, 40.0, 40.0),
            candidate(30.0, 10.0, 30.0, 40.0), // zero width
            candidate(10.0, 70.0, 40.0, 70.0), // zero height
        ];
        let outcome = merge_with_baseline(baseline, &candidates, (0, 0));
        assert_eq!(outcome.document.furniture.len(), 1);
        let diag = outcome.diagnostics;
        assert_eq!(diag.received, 3);
        assert_eq!(diag.kept, 1);
        assert_eq!(diag.dropped_degenerate, 2);
    }

    #[test]
    fn out_of_range_confidence_is_clamped_and_counted() {
        let baseline = r#"{"Width":100,"Height":100}"#;
        let mut hot = candidate(10.0, 10.0, 40.0, 40.0);
        hot.confidence = 1.7;
        let outcome = merge_with_baseline(baseline, &[hot], (0, 0));
        assert_eq!(outcome.document.furniture[0].confidence, 1.0);
        assert_eq!(outcome.diagnostics.confidence_clamped, 1);
    }

    #[test]
    fn existing_schema_version_is_preserved() {
        let outcome =
            merge_with_baseline(r#"{"Width":10,"Height":10,"schema_version":"furnish.v0"}"#, &[], (0, 0));
        assert_eq!(outcome.document.schema_version, "furnish.v0");
    }

    #[test]
    fn merge_is_idempotent_on_furniture_content() {
        let baseline = r#"{"Width":100,"Height":80,"points":[],"classes":[]}"#;
        let candidates = [
            candidate(5.0, 5.0, 50.0, 60.0),
            candidate(-3.0, 120.0, 90.0, 10.0),
        ];
        let first = merge_with_baseline(baseline, &candidates, (0, 0));

        let again: Vec<FurnitureCandidate> = first
            .document
            .furniture
            .iter()
            .map(|item| serde_json::to_value(item).unwrap())
            .map(|value| FurnitureCandidate::from_value(&value))
            .collect();
        let second = merge_with_baseline(baseline, &again, (0, 0));

        let bytes_first = serde_json::to_vec(&first.document.furniture).unwrap();
        let bytes_second = serde_json::to_vec(&second.document.furniture).unwrap();
        assert_eq!(bytes_first, bytes_second);
    }
}
