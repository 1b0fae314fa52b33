// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floor-plan image preprocessing
//!
//! Black-and-gray line drawings detect poorly as-is: contrast is washed out
//! and thin strokes vanish at detector input resolution. The pipeline here
//! boosts contrast, binarizes, and thickens the linework into the
//! white-on-black rendition object detectors handle best. A small overlay
//! helper builds the preview returned when the generation backend is down.

pub mod ops;
pub mod overlay;

// Re-export commonly used operations
pub use ops::{autocontrast, binarize_lines, dilate, gray_to_rgb};
pub use overlay::caption_preview;

use image::{DynamicImage, RgbImage};

/// Preprocessing mode for detector input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrepMode {
    /// Contrast boost + binarize + thicken.
    #[default]
    Auto,
    /// Bypass preprocessing entirely.
    None,
}

impl PrepMode {
    /// Parse a query-string value; anything unrecognized means [`Auto`].
    ///
    /// [`Auto`]: PrepMode::Auto
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "none" => PrepMode::None,
            _ => PrepMode::Auto,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PrepMode::Auto => "auto",
            PrepMode::None => "none",
        }
    }
}

/// Prepare a floor-plan image for the object detector.
///
/// `Auto` normalizes contrast (2% cutoff), binarizes with line pixels white,
/// and dilates once to thicken strokes; `None` only converts to RGB.
pub fn preprocess_plan(image: &DynamicImage, mode: PrepMode) -> RgbImage {
    if mode == PrepMode::None {
        return image.to_rgb8();
    }

    let gray = image.to_luma8();
    let stretched = ops::autocontrast(&gray, 2.0);
    let lines = ops::binarize_lines(&stretched, 200);
    let thickened = ops::dilate(&lines, 1);
    ops::gray_to_rgb(&thickened)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn plan_with_line() -> DynamicImage {
        let mut img = GrayImage::from_pixel(32, 32, Luma([230]));
        for x in 4..28 {
            img.put_pixel(x, 16, Luma([60]));
        }
        DynamicImage::ImageLuma8(img)
    }

    #[test]
    fn none_mode_only_converts_to_rgb() {
        let plan = plan_with_line();
        let out = preprocess_plan(&plan, PrepMode::None);
        assert_eq!(out.get_pixel(0, 0).0, [230, 230, 230]);
        assert_eq!(out.get_pixel(5, 16).0, [60, 60, 60]);
    }

    #[test]
    fn auto_mode_produces_white_lines_on_black() {
        let plan = plan_with_line();
        let out = preprocess_plan(&plan, PrepMode::Auto);

        assert_eq!(out.dimensions(), (32, 32));
        // the stroke turns white, the paper turns black
        assert_eq!(out.get_pixel(10, 16).0, [255, 255, 255]);
        assert_eq!(out.get_pixel(0, 0).0, [0, 0, 0]);
        // dilation thickens the stroke into the neighboring row
        assert_eq!(out.get_pixel(10, 15).0, [255, 255, 255]);
    }

    #[test]
    fn mode_parsing_defaults_to_auto() {
        assert_eq!(PrepMode::parse("none"), PrepMode::None);
        assert_eq!(PrepMode::parse("NONE "), PrepMode::None);
        assert_eq!(PrepMode::parse("auto"), PrepMode::Auto);
        assert_eq!(PrepMode::parse("garbage"), PrepMode::Auto);
        assert_eq!(PrepMode::parse(""), PrepMode::Auto);
    }
}
