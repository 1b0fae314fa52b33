// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Furniture enrichment endpoints.

use crate::error::ApiError;
use crate::types::{DetectorFurnishResponse, FurnishResponse};
use crate::AppState;
use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use furnish_core::{enrich_baseline, DetectionSource, MergeOutcome};
use furnish_vision::PrepMode;
use image::{DynamicImage, ImageFormat};
use serde::Deserialize;

/// Fields of a furnishing upload: the plan image and the baseline JSON.
struct FurnishUpload {
    image: Vec<u8>,
    baseline_json: String,
}

/// Pull the `image` and `json` fields out of a multipart request.
async fn extract_upload(multipart: &mut Multipart) -> Result<FurnishUpload, ApiError> {
    let mut image = None;
    let mut baseline_json = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => image = Some(field.bytes().await?.to_vec()),
            "json" => baseline_json = Some(field.text().await?),
            other => tracing::debug!(field_name = %other, "Ignoring multipart field"),
        }
    }

    Ok(FurnishUpload {
        image: image.ok_or(ApiError::MissingField("image"))?,
        baseline_json: baseline_json.ok_or(ApiError::MissingField("json"))?,
    })
}

/// Validate size and format of an uploaded plan image.
fn check_image(data: &[u8], max_mb: usize) -> Result<ImageFormat, ApiError> {
    if data.len() > max_mb * 1024 * 1024 {
        return Err(ApiError::ImageTooLarge { max_mb });
    }
    match image::guess_format(data) {
        Ok(format @ (ImageFormat::Png | ImageFormat::Jpeg)) => Ok(format),
        _ => Err(ApiError::UnsupportedImage),
    }
}

/// Log what the merge did; dropped items are worth a warning.
fn log_outcome(outcome: &MergeOutcome) {
    let diag = &outcome.diagnostics;
    if diag.dropped_degenerate > 0 || diag.confidence_clamped > 0 {
        tracing::warn!(
            received = diag.received,
            kept = diag.kept,
            dropped_degenerate = diag.dropped_degenerate,
            confidence_clamped = diag.confidence_clamped,
            "Merge degraded predictor output"
        );
    } else {
        tracing::info!(received = diag.received, kept = diag.kept, "Merged furniture");
    }
}

/// POST /api/v1/furnish - model-based furniture enrichment.
pub async fn furnish_model(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<FurnishResponse>, ApiError> {
    let upload = extract_upload(&mut multipart).await?;
    let format = check_image(&upload.image, state.config.max_image_mb)?;
    let model = state.model.as_ref().ok_or(ApiError::ModelUnavailable)?;

    // Dimensions are only a fallback for baselines without Width/Height;
    // an undecodable (but well-formed-enough) image is not fatal here.
    let dims = image::load_from_memory(&upload.image)
        .map(|img| (img.width(), img.height()))
        .unwrap_or((0, 0));

    let reply = model
        .infer_layout(&upload.image, format.to_mime_type(), &upload.baseline_json)
        .await?;

    let outcome = enrich_baseline(
        &upload.baseline_json,
        DetectionSource::ModelReply(&reply),
        dims,
    )?;
    log_outcome(&outcome);

    Ok(Json(FurnishResponse {
        document: outcome.document,
        diagnostics: outcome.diagnostics,
    }))
}

/// Detector endpoint query parameters, parsed leniently: bad values fall
/// back to defaults instead of rejecting the request.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DetectorParams {
    mode: Option<String>,
    conf: Option<String>,
    iou: Option<String>,
    prep: Option<String>,
}

#[derive(Debug, PartialEq)]
struct DetectorSettings {
    mode: &'static str,
    conf: f32,
    iou: f32,
    prep: PrepMode,
}

impl DetectorParams {
    fn normalized(&self) -> DetectorSettings {
        let mode = match self.mode.as_deref().map(str::to_lowercase).as_deref() {
            Some("obb") => "obb",
            _ => "detect",
        };
        DetectorSettings {
            mode,
            conf: parse_or(self.conf.as_deref(), 0.15),
            iou: parse_or(self.iou.as_deref(), 0.50),
            prep: PrepMode::parse(self.prep.as_deref().unwrap_or("auto")),
        }
    }
}

fn parse_or(raw: Option<&str>, default: f32) -> f32 {
    raw.and_then(|value| value.trim().parse().ok()).unwrap_or(default)
}

/// POST /api/v1/furnish/detector - detector-based furniture enrichment.
pub async fn furnish_detector(
    State(state): State<AppState>,
    Query(params): Query<DetectorParams>,
    mut multipart: Multipart,
) -> Result<Json<DetectorFurnishResponse>, ApiError> {
    let upload = extract_upload(&mut multipart).await?;
    check_image(&upload.image, state.config.max_image_mb)?;
    let detector = state.detector.as_ref().ok_or(ApiError::DetectorUnavailable)?;
    let settings = params.normalized();

    let plan: DynamicImage = image::load_from_memory(&upload.image)
        .map_err(|e| ApiError::InvalidImage(e.to_string()))?;
    let dims = (plan.width(), plan.height());

    let prepared = furnish_vision::preprocess_plan(&plan, settings.prep);
    let png = super::encode_png(&prepared)?;

    let output = detector
        .detect(&png, settings.mode, settings.conf, settings.iou)
        .await?;
    tracing::debug!(
        detections = output.detections.len(),
        mode_used = %output.mode_used,
        "Detector sidecar replied"
    );

    let outcome = enrich_baseline(
        &upload.baseline_json,
        DetectionSource::Detector {
            detections: &output.detections,
            class_names: &output.class_names,
        },
        dims,
    )?;
    log_outcome(&outcome);

    Ok(Json(DetectorFurnishResponse {
        document: outcome.document,
        diagnostics: outcome.diagnostics,
        detector_mode: output.mode_used,
        prep: settings.prep.as_str().to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_default_and_normalize() {
        let params = DetectorParams::default();
        assert_eq!(
            params.normalized(),
            DetectorSettings { mode: "detect", conf: 0.15, iou: 0.50, prep: PrepMode::Auto }
        );

        let params = DetectorParams {
            mode: Some("OBB".into()),
            conf: Some("0.3".into()),
            iou: Some("junk".into()),
            prep: Some("none".into()),
        };
        assert_eq!(
            params.normalized(),
            DetectorSettings { mode: "obb", conf: 0.3, iou: 0.50, prep: PrepMode::None }
        );
    }

    #[test]
    fn unknown_mode_falls_back_to_detect() {
        let params = DetectorParams { mode: Some("segment".into()), ..Default::default() };
        assert_eq!(params.normalized().mode, "detect");
    }

    #[test]
    fn check_image_validates_format_and_size() {
        // PNG magic bytes
        let png_header = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
        assert!(check_image(&png_header, 4).is_ok());

        assert!(matches!(check_image(b"GIF89a....", 4), Err(ApiError::UnsupportedImage)));

        let oversized = vec![0u8; 2 * 1024 * 1024];
        assert!(matches!(
            check_image(&oversized, 1),
            Err(ApiError::ImageTooLarge { max_mb: 1 })
        ));
    }
}
