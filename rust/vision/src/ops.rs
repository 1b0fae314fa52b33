// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Image operations for floor-plan preprocessing

use image::{GrayImage, Luma, Rgb, RgbImage};

/// Stretch image contrast, ignoring `cutoff_percent` of the darkest and
/// brightest pixels when picking the remap range.
///
/// Line drawings scanned with washed-out grays normalize to a full black
/// to white range this way.
pub fn autocontrast(image: &GrayImage, cutoff_percent: f32) -> GrayImage {
    let mut histogram = [0u32; 256];
    for pixel in image.pixels() {
        histogram[pixel.0[0] as usize] += 1;
    }

    let total = (image.width() * image.height()) as f32;
    if total == 0.0 {
        return image.clone();
    }
    let cutoff = total * cutoff_percent / 100.0;

    let mut low = 0usize;
    let mut seen = 0.0;
    for (i, &count) in histogram.iter().enumerate() {
        seen += count as f32;
        if seen > cutoff {
            low = i;
            break;
        }
    }

    let mut high = 255usize;
    seen = 0.0;
    for (i, &count) in histogram.iter().enumerate().rev() {
        seen += count as f32;
        if seen > cutoff {
            high = i;
            break;
        }
    }

    if high <= low {
        return image.clone();
    }

    let scale = 255.0 / (high - low) as f32;
    let mut result = image.clone();
    for pixel in result.pixels_mut() {
        let value = (pixel.0[0] as f32 - low as f32) * scale;
        pixel.0[0] = value.clamp(0.0, 255.0) as u8;
    }
    result
}

/// Binarize so that line pixels (at or below `threshold_value`) become white
/// and the background becomes black.
pub fn binarize_lines(image: &GrayImage, threshold_value: u8) -> GrayImage {
    let mut result = GrayImage::new(image.width(), image.height());

    for (x, y, pixel) in image.enumerate_pixels() {
        let value = if pixel.0[0] <= threshold_value { 255 } else { 0 };
        result.put_pixel(x, y, Luma([value]));
    }

    result
}

/// Morphological dilation - expands white regions (thickens extracted lines)
pub fn dilate(image: &GrayImage, radius: u8) -> GrayImage {
    imageproc::morphology::dilate(image, imageproc::distance_transform::Norm::L1, radius)
}

/// Replicate a grayscale image into the three RGB channels
pub fn gray_to_rgb(image: &GrayImage) -> RgbImage {
    let mut rgb = RgbImage::new(image.width(), image.height());
    for (x, y, pixel) in image.enumerate_pixels() {
        let v = pixel.0[0];
        rgb.put_pixel(x, y, Rgb([v, v, v]));
    }
    rgb
}
