// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Depth-conditioned image generation endpoint.

use crate::error::ApiError;
use crate::types::GenerateResponse;
use crate::AppState;
use axum::{
    extract::{Multipart, State},
    Json,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

/// Fields of a generation upload.
struct GenerateUpload {
    depth: Vec<u8>,
    prompt: String,
    steps: u32,
    guidance: f64,
    size: u32,
}

/// Pull the depth image and sampler fields out of a multipart request.
///
/// Numeric fields parse leniently, falling back to the sampler defaults.
async fn extract_upload(multipart: &mut Multipart) -> Result<GenerateUpload, ApiError> {
    let mut depth = None;
    let mut prompt = None;
    let mut steps = 28u32;
    let mut guidance = 7.5f64;
    let mut size = 512u32;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "depth" => depth = Some(field.bytes().await?.to_vec()),
            "prompt" => prompt = Some(field.text().await?.trim().to_string()),
            "steps" => steps = field.text().await?.trim().parse().unwrap_or(steps),
            "guidance" => guidance = field.text().await?.trim().parse().unwrap_or(guidance),
            "size" => size = field.text().await?.trim().parse().unwrap_or(size),
            other => tracing::debug!(field_name = %other, "Ignoring multipart field"),
        }
    }

    let prompt = prompt.filter(|p| !p.is_empty()).ok_or(ApiError::MissingField("prompt"))?;
    Ok(GenerateUpload {
        depth: depth.ok_or(ApiError::MissingField("depth"))?,
        prompt,
        steps,
        guidance,
        size: size.clamp(128, 1024),
    })
}

fn png_data_url(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", BASE64.encode(png))
}

/// POST /api/v1/generate - generate an image from a depth map and a prompt.
///
/// When the diffusion sidecar is unconfigured or fails, the depth map comes
/// back as a caption-bar preview instead; generation never hard-fails past
/// input validation.
pub async fn generate(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<GenerateResponse>, ApiError> {
    let upload = extract_upload(&mut multipart).await?;

    let depth_image = image::load_from_memory(&upload.depth)
        .map_err(|e| ApiError::InvalidImage(e.to_string()))?;

    if let Some(diffusion) = state.diffusion.as_ref() {
        match diffusion
            .generate(&upload.prompt, &upload.depth, upload.steps, upload.guidance, upload.size)
            .await
        {
            Ok(png) => {
                return Ok(Json(GenerateResponse {
                    image: png_data_url(&png),
                    fallback: false,
                    prompt: None,
                }));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Diffusion backend failed; returning preview");
            }
        }
    }

    let preview = furnish_vision::caption_preview(&depth_image);
    let png = super::encode_png(&preview)?;
    Ok(Json(GenerateResponse {
        image: png_data_url(&png),
        fallback: true,
        prompt: Some(upload.prompt),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_has_png_prefix() {
        let url = png_data_url(&[1, 2, 3]);
        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(&url["data:image/png;base64,".len()..], "AQID");
    }
}
