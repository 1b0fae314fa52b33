// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Detection-result normalization and floor-plan document merging
//!
//! This crate turns heterogeneous, untrusted bounding-box data into one
//! well-formed document merged with a caller-supplied baseline:
//! 1. Decoding a generative model's free-text JSON reply (fenced or
//!    double-encoded replies are recovered)
//! 2. Adapting object-detector output (axis-aligned or oriented boxes) and
//!    filtering it to the furniture vocabulary
//! 3. Sanitizing boxes against the image bounds (clamp, reorder, reject)
//! 4. Merging the result into the baseline with diagnostics instead of
//!    silent data loss
//!
//! Everything here is a pure, request-scoped transformation: no I/O, no
//! shared state. Predictors live behind HTTP clients in the server crate and
//! hand their output in as plain data.
//!
//! # Usage
//!
//! ```rust
//! use furnish_core::{enrich_baseline, DetectionSource};
//!
//! let baseline = r#"{"Width":100,"Height":50,"points":[],"classes":[]}"#;
//! let reply = r#"{"furniture":[{"x1":-5,"y1":10,"x2":200,"y2":40,
//!                 "type":"Sofa","confidence":0.9}]}"#;
//!
//! let outcome = enrich_baseline(baseline, DetectionSource::ModelReply(reply), (100, 50))?;
//! assert_eq!(outcome.document.furniture.len(), 1);
//! assert_eq!(outcome.document.furniture[0].kind, "sofa");
//! # Ok::<(), furnish_core::Error>(())
//! ```

pub mod adapter;
pub mod error;
pub mod labels;
pub mod merge;
pub mod reply;
pub mod sanitize;
pub mod types;

// Re-export commonly used types and functions
pub use adapter::{
    candidates_from_detections, candidates_from_reply, DetectionGeometry, DetectionSource,
    RawDetection,
};
pub use error::{Error, Result};
pub use labels::{is_furniture, normalize_label};
pub use merge::{merge_with_baseline, MergeDiagnostics, MergeOutcome};
pub use reply::parse_model_reply;
pub use sanitize::{clamp_confidence, sanitize_box};
pub use types::{
    BoundingBox, FurnitureCandidate, FurnitureItem, MergedDocument, SCHEMA_VERSION,
};

/// High-level entry: reduce a predictor source to candidates and merge them
/// into the baseline.
///
/// Fails only when a model reply cannot be decoded as JSON; every other
/// malformed input degrades and is reported in the outcome's diagnostics.
pub fn enrich_baseline(
    baseline_json: &str,
    source: DetectionSource<'_>,
    fallback_dims: (u32, u32),
) -> Result<MergeOutcome> {
    let candidates = source.candidates()?;
    Ok(merge_with_baseline(baseline_json, &candidates, fallback_dims))
}
