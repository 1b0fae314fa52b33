// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Preview overlays for the generation fallback path

use image::{DynamicImage, RgbImage};

/// Opacity of the caption strip, out of 255.
const BAR_ALPHA: u32 = 140;

/// Compose a darkened caption strip along the bottom edge of a preview.
///
/// Used when the diffusion backend is unavailable: the depth map itself is
/// returned as a readable preview, with the strip marking where a caption
/// belongs. The caption text travels in the response body, not in pixels.
pub fn caption_preview(image: &DynamicImage) -> RgbImage {
    let mut rgb = image.to_rgb8();
    let height = rgb.height();
    let bar_height = (height / 10).max(32).min(height);

    for y in height - bar_height..height {
        for x in 0..rgb.width() {
            let pixel = rgb.get_pixel_mut(x, y);
            for channel in pixel.0.iter_mut() {
                *channel = ((*channel as u32 * (255 - BAR_ALPHA)) / 255) as u8;
            }
        }
    }

    rgb
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn bottom_strip_is_darkened_and_the_rest_untouched() {
        let gray = GrayImage::from_pixel(10, 100, Luma([200]));
        let preview = caption_preview(&DynamicImage::ImageLuma8(gray));

        assert_eq!(preview.get_pixel(5, 0).0[0], 200);
        // 100px tall -> 32px strip
        assert_eq!(preview.get_pixel(5, 67).0[0], 200);
        assert!(preview.get_pixel(5, 68).0[0] < 200);
        assert!(preview.get_pixel(5, 99).0[0] < 200);
    }

    #[test]
    fn tiny_images_do_not_underflow() {
        let gray = GrayImage::from_pixel(4, 8, Luma([100]));
        let preview = caption_preview(&DynamicImage::ImageLuma8(gray));
        // strip covers the whole image
        assert!(preview.get_pixel(0, 0).0[0] < 100);
    }
}
