// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Route handlers.

pub mod furnish;
pub mod generate;
pub mod health;

use crate::error::ApiError;
use image::{ImageFormat, RgbImage};
use std::io::Cursor;

/// Encode an RGB image as PNG bytes.
pub(crate) fn encode_png(image: &RgbImage) -> Result<Vec<u8>, ApiError> {
    let mut cursor = Cursor::new(Vec::new());
    image
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|e| ApiError::Internal(format!("PNG encode failed: {e}")))?;
    Ok(cursor.into_inner())
}
