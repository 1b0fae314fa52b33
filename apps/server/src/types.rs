// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response types for the API.

use furnish_core::{MergeDiagnostics, MergedDocument};
use serde::Serialize;

/// Enriched document returned by the model-backed endpoint.
///
/// The merged document serializes flat at the top level (the baseline's own
/// keys plus `furniture`), with the merge diagnostics alongside.
#[derive(Debug, Serialize)]
pub struct FurnishResponse {
    #[serde(flatten)]
    pub document: MergedDocument,
    pub diagnostics: MergeDiagnostics,
}

/// Enriched document returned by the detector-backed endpoint.
#[derive(Debug, Serialize)]
pub struct DetectorFurnishResponse {
    #[serde(flatten)]
    pub document: MergedDocument,
    pub diagnostics: MergeDiagnostics,
    /// Detector mode that actually ran (`detect` or `obb`).
    pub detector_mode: String,
    /// Preprocessing mode applied to the image before detection.
    pub prep: String,
}

/// Result of the depth-conditioned generation endpoint.
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    /// PNG data URL of the generated image or the fallback preview.
    pub image: String,
    /// True when the diffusion backend was skipped or failed and the
    /// caption-bar preview was returned instead.
    pub fallback: bool,
    /// Echo of the prompt; present on the fallback path, where it cannot be
    /// rendered into the preview itself.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}
