// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bounding-box sanitization against image bounds

use crate::types::BoundingBox;

/// Clamp a raw coordinate into `[0, upper]`, rounding to the nearest integer.
///
/// NaN rounds to 0 and +inf saturates to `upper`, so non-numeric input that
/// was coerced upstream lands on the lower bound as documented.
fn clamp_coord(value: f64, upper: u32) -> u32 {
    (value.round() as i64).clamp(0, upper as i64) as u32
}

/// Produce a canonical integer box inside `[0, width) x [0, height)`, or
/// reject it.
///
/// Coordinates are clamped first and reordered second; reordering before the
/// clamp could move a box whose endpoints straddle the image edge to a
/// different relative position. The min/max repair runs once, and a box that
/// is still zero-width or zero-height afterwards is rejected.
pub fn sanitize_box(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    width: u32,
    height: u32,
) -> Option<BoundingBox> {
    let max_x = width.saturating_sub(1);
    let max_y = height.saturating_sub(1);

    let mut x1 = clamp_coord(x1, max_x);
    let mut y1 = clamp_coord(y1, max_y);
    let mut x2 = clamp_coord(x2, max_x);
    let mut y2 = clamp_coord(y2, max_y);

    if x2 <= x1 || y2 <= y1 {
        if x1 > x2 {
            std::mem::swap(&mut x1, &mut x2);
        }
        if y1 > y2 {
            std::mem::swap(&mut y1, &mut y2);
        }
    }
    if x2 <= x1 || y2 <= y1 {
        return None;
    }

    Some(BoundingBox { x1, y1, x2, y2 })
}

/// Clamp a confidence value into `[0, 1]`.
///
/// Returns the clamped value and whether clamping changed the input; callers
/// count changed inputs as a data-quality signal. NaN coerces to 0.0.
pub fn clamp_confidence(value: f64) -> (f32, bool) {
    if value.is_nan() {
        return (0.0, true);
    }
    let clamped = value.clamp(0.0, 1.0);
    (clamped as f32, clamped != value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_bounds_box_is_untouched() {
        let bbox = sanitize_box(10.0, 20.0, 30.0, 40.0, 100, 100).unwrap();
        assert_eq!(bbox, BoundingBox { x1: 10, y1: 20, x2: 30, y2: 40 });
    }

    #[test]
    fn out_of_range_coordinates_clamp_to_image_bounds() {
        let bbox = sanitize_box(-5.0, 10.0, 200.0, 40.0, 100, 50).unwrap();
        assert_eq!(bbox, BoundingBox { x1: 0, y1: 10, x2: 99, y2: 40 });
    }

    #[test]
    fn swapped_coordinates_are_reordered_once() {
        let bbox = sanitize_box(30.0, 40.0, 10.0, 20.0, 100, 100).unwrap();
        assert_eq!(bbox, BoundingBox { x1: 10, y1: 20, x2: 30, y2: 40 });
    }

    #[test]
    fn zero_width_box_is_rejected() {
        assert_eq!(sanitize_box(30.0, 10.0, 30.0, 40.0, 100, 100), None);
    }

    #[test]
    fn zero_height_after_clamping_is_rejected() {
        // both y endpoints beyond the bottom edge collapse onto it
        assert_eq!(sanitize_box(10.0, 80.0, 20.0, 90.0, 100, 50), None);
    }

    #[test]
    fn fractional_coordinates_round_to_nearest() {
        let bbox = sanitize_box(9.6, 10.4, 20.5, 30.0, 100, 100).unwrap();
        assert_eq!(bbox.x1, 10);
        assert_eq!(bbox.y1, 10);
        assert_eq!(bbox.x2, 21);
    }

    #[test]
    fn non_finite_coordinates_do_not_panic() {
        let bbox = sanitize_box(f64::NAN, 0.0, f64::INFINITY, 10.0, 100, 100).unwrap();
        assert_eq!(bbox, BoundingBox { x1: 0, y1: 0, x2: 99, y2: 10 });
    }

    #[test]
    fn zero_dimension_image_rejects_everything() {
        assert_eq!(sanitize_box(0.0, 0.0, 10.0, 10.0, 0, 0), None);
    }

    #[test]
    fn confidence_is_clamped_and_flagged() {
        assert_eq!(clamp_confidence(0.9), (0.9, false));
        assert_eq!(clamp_confidence(1.7), (1.0, true));
        assert_eq!(clamp_confidence(-0.2), (0.0, true));
        assert_eq!(clamp_confidence(f64::NAN), (0.0, true));
    }
}
