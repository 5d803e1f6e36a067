//! Conversion between display space and image pixel space.
//!
//! # Algorithm
//!
//! The image is first fitted into the viewport with a contain policy:
//!
//! ```text
//! scale    = min(vw / iw, vh / ih)
//! offset_x = (vw - iw * scale) / 2
//! offset_y = (vh - ih * scale) / 2
//! ```
//!
//! The user transform then zooms and pans that fitted image about its center,
//! and rotates it by quarter turns. A display point `p` maps back to the
//! rotated image's pixel grid as:
//!
//! ```text
//! u  = (p - offset) / scale                     // contain fit undone
//! u' = (u - center - translate / scale) / zoom  // pan and zoom undone
//! q  = u' + rotated_center                      // re-origin in the rotated frame
//! ```
//!
//! The rotated image shares its center with the unrotated one, so no
//! trigonometry is needed: the rectangle is already expressed in the frame the
//! crop step of an export operates on (rotate first, then crop).

use serde::{Deserialize, Serialize};

use super::types::{CropRect, ImageGeometry, ImageRect, ViewportGeometry};
use crate::transform::Transform;

/// Default minimum crop rectangle edge, in display units.
pub const DEFAULT_MIN_CROP_SIZE: f64 = 20.0;

/// Scale and offset of a contain-fitted image inside the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayMapping {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for DisplayMapping {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

impl DisplayMapping {
    /// Compute the contain fit of `image` inside `viewport`.
    ///
    /// Falls back to the default mapping (unit scale, no offset) until both
    /// geometries have been measured.
    pub fn contain(image: ImageGeometry, viewport: ViewportGeometry) -> Self {
        if image.is_empty() || viewport.is_empty() {
            return Self::default();
        }

        let iw = image.width as f64;
        let ih = image.height as f64;
        let scale = (viewport.width / iw).min(viewport.height / ih);

        Self {
            scale,
            offset_x: (viewport.width - iw * scale) / 2.0,
            offset_y: (viewport.height - ih * scale) / 2.0,
        }
    }

    /// Footprint of the untransformed image in display space.
    pub fn displayed_rect(&self, image: ImageGeometry) -> CropRect {
        CropRect::new(
            self.offset_x,
            self.offset_y,
            image.width as f64 * self.scale,
            image.height as f64 * self.scale,
        )
    }

    /// Footprint of the image in display space once `transform` is applied.
    ///
    /// Inverse of [`to_image_space`]: the returned rectangle maps back to the
    /// whole rotated image.
    pub fn transformed_rect(&self, image: ImageGeometry, transform: Transform) -> CropRect {
        let (cx, cy) = self.displayed_rect(image).center();
        let rotated = image.rotated(transform.rotation);
        let zoom = sanitize_positive(transform.scale);
        let width = rotated.width as f64 * self.scale * zoom;
        let height = rotated.height as f64 * self.scale * zoom;

        CropRect::new(
            cx + finite_or_zero(transform.translate_x) - width / 2.0,
            cy + finite_or_zero(transform.translate_y) - height / 2.0,
            width,
            height,
        )
    }

    /// Map an image-space rectangle to display space, ignoring any user transform.
    pub fn to_display_rect(&self, rect: ImageRect) -> CropRect {
        CropRect::new(
            self.offset_x + rect.origin_x as f64 * self.scale,
            self.offset_y + rect.origin_y as f64 * self.scale,
            rect.width as f64 * self.scale,
            rect.height as f64 * self.scale,
        )
    }
}

/// Map a display-space crop rectangle to image pixels.
///
/// The result is expressed in the pixel grid of the image after the
/// transform's quarter-turn rotation, and is clamped to that image's bounds.
/// A measured image always yields at least a 1x1 rectangle; an unmeasured one
/// yields an empty rectangle. Never fails: gesture state can overshoot
/// transiently and is clamped instead.
pub fn to_image_space(
    display_rect: CropRect,
    image: ImageGeometry,
    mapping: DisplayMapping,
    transform: Transform,
) -> ImageRect {
    if image.is_empty() {
        return ImageRect::default();
    }

    let rotated = image.rotated(transform.rotation);
    let scale = sanitize_positive(mapping.scale);
    let zoom = sanitize_positive(transform.scale);

    let center_x = image.width as f64 / 2.0;
    let center_y = image.height as f64 / 2.0;
    let pan_x = finite_or_zero(transform.translate_x) / scale;
    let pan_y = finite_or_zero(transform.translate_y) / scale;

    let to_rotated_x = |px: f64| {
        let u = (px - mapping.offset_x) / scale;
        (u - center_x - pan_x) / zoom + rotated.width as f64 / 2.0
    };
    let to_rotated_y = |py: f64| {
        let v = (py - mapping.offset_y) / scale;
        (v - center_y - pan_y) / zoom + rotated.height as f64 / 2.0
    };

    let (x0, x1) = ordered(
        to_rotated_x(display_rect.x),
        to_rotated_x(display_rect.right()),
    );
    let (y0, y1) = ordered(
        to_rotated_y(display_rect.y),
        to_rotated_y(display_rect.bottom()),
    );

    let (origin_x, width) = clamp_span(x0, x1, rotated.width);
    let (origin_y, height) = clamp_span(y0, y1, rotated.height);

    ImageRect::new(origin_x, origin_y, width, height)
}

/// Constrain a display-space rectangle to a minimum size and to the viewport.
///
/// The size is clamped first (at least `min_size`, at most the viewport), then
/// the rectangle is shifted so it lies fully inside the viewport. When the
/// viewport itself is smaller than `min_size`, the viewport wins.
pub fn clamp_crop_rect(rect: CropRect, viewport: ViewportGeometry, min_size: f64) -> CropRect {
    let bounds = viewport.bounds();
    let min_size = if min_size.is_finite() && min_size > 0.0 {
        min_size
    } else {
        0.0
    };
    let min_w = min_size.min(bounds.width);
    let min_h = min_size.min(bounds.height);

    let width = finite_or(rect.width, min_w).clamp(min_w, bounds.width);
    let height = finite_or(rect.height, min_h).clamp(min_h, bounds.height);
    let x = finite_or_zero(rect.x).clamp(0.0, bounds.width - width);
    let y = finite_or_zero(rect.y).clamp(0.0, bounds.height - height);

    CropRect::new(x, y, width, height)
}

/// Round a `[start, end)` span to whole pixels inside `[0, limit]`.
///
/// Returns `(origin, length)` with `length >= 1` whenever `limit >= 1`.
fn clamp_span(start: f64, end: f64, limit: u32) -> (u32, u32) {
    let max = limit as f64;
    let lo = start.round().clamp(0.0, max) as u32;
    let hi = end.round().clamp(0.0, max) as u32;

    if hi > lo {
        (lo, hi - lo)
    } else {
        // Fully outside or collapsed: keep a single pixel at the nearest edge
        let lo = lo.min(limit.saturating_sub(1));
        (lo, limit.min(1))
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn sanitize_positive(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        1.0
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

fn finite_or_zero(value: f64) -> f64 {
    finite_or(value, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn portrait() -> (ImageGeometry, ViewportGeometry) {
        (
            ImageGeometry::new(1000, 2000),
            ViewportGeometry::new(400.0, 800.0),
        )
    }

    #[test]
    fn test_contain_exact_fit() {
        let (image, viewport) = portrait();
        let mapping = DisplayMapping::contain(image, viewport);
        assert_abs_diff_eq!(mapping.scale, 0.4, epsilon = 1e-12);
        assert_abs_diff_eq!(mapping.offset_x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(mapping.offset_y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_contain_letterboxes_wide_image() {
        let image = ImageGeometry::new(2000, 1000);
        let viewport = ViewportGeometry::new(400.0, 800.0);
        let mapping = DisplayMapping::contain(image, viewport);

        assert_abs_diff_eq!(mapping.scale, 0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(mapping.offset_x, 0.0, epsilon = 1e-9);
        // 1000 * 0.2 = 200 tall, centered in 800
        assert_abs_diff_eq!(mapping.offset_y, 300.0, epsilon = 1e-9);

        let shown = mapping.displayed_rect(image);
        assert!(viewport.bounds().contains_rect(&shown));
    }

    #[test]
    fn test_contain_degenerate_defaults() {
        let mapping = DisplayMapping::contain(
            ImageGeometry::default(),
            ViewportGeometry::new(400.0, 800.0),
        );
        assert_eq!(mapping, DisplayMapping::default());

        let mapping = DisplayMapping::contain(
            ImageGeometry::new(100, 100),
            ViewportGeometry::new(0.0, 800.0),
        );
        assert_eq!(mapping, DisplayMapping::default());
    }

    #[test]
    fn test_example_scenario() {
        let (image, viewport) = portrait();
        let mapping = DisplayMapping::contain(image, viewport);
        let rect = CropRect::new(50.0, 100.0, 300.0, 300.0);

        let result = to_image_space(rect, image, mapping, Transform::IDENTITY);
        assert_eq!(result, ImageRect::new(125, 250, 750, 750));
    }

    #[test]
    fn test_displayed_rect_maps_to_full_image() {
        let image = ImageGeometry::new(3024, 4032);
        let viewport = ViewportGeometry::new(390.0, 700.0);
        let mapping = DisplayMapping::contain(image, viewport);

        let result = to_image_space(
            mapping.displayed_rect(image),
            image,
            mapping,
            Transform::IDENTITY,
        );
        assert_eq!(result, ImageRect::full(image));
    }

    #[test]
    fn test_transformed_rect_is_inverse_of_mapping() {
        let (image, viewport) = portrait();
        let mapping = DisplayMapping::contain(image, viewport);
        let transform = Transform {
            rotation: 90.0,
            ..Transform::IDENTITY
        };

        // The rotated 2000x1000 image is 800x400 on screen, centered at (200, 400)
        let shown = mapping.transformed_rect(image, transform);
        assert_abs_diff_eq!(shown.x, -200.0, epsilon = 1e-9);
        assert_abs_diff_eq!(shown.y, 200.0, epsilon = 1e-9);
        assert_abs_diff_eq!(shown.width, 800.0, epsilon = 1e-9);
        assert_abs_diff_eq!(shown.height, 400.0, epsilon = 1e-9);

        let result = to_image_space(shown, image, mapping, transform);
        assert_eq!(result, ImageRect::new(0, 0, 2000, 1000));
    }

    #[test]
    fn test_zoom_narrows_the_region() {
        let (image, viewport) = portrait();
        let mapping = DisplayMapping::contain(image, viewport);
        let transform = Transform {
            scale: 2.0,
            ..Transform::IDENTITY
        };

        let result = to_image_space(viewport.bounds(), image, mapping, transform);
        assert_eq!(result, ImageRect::new(250, 500, 500, 1000));
    }

    #[test]
    fn test_pan_shifts_and_clamps() {
        let (image, viewport) = portrait();
        let mapping = DisplayMapping::contain(image, viewport);
        // 40 display units right is 100 image pixels
        let transform = Transform {
            translate_x: 40.0,
            ..Transform::IDENTITY
        };

        let result = to_image_space(viewport.bounds(), image, mapping, transform);
        assert_eq!(result, ImageRect::new(0, 0, 900, 2000));
    }

    #[test]
    fn test_quarter_turn_uses_rotated_frame() {
        let (image, viewport) = portrait();
        let mapping = DisplayMapping::contain(image, viewport);
        let transform = Transform {
            rotation: 90.0,
            ..Transform::IDENTITY
        };

        // Rotated image is 2000x1000, shown 800x400 around the viewport center
        let rect = CropRect::new(0.0, 200.0, 400.0, 400.0);
        let result = to_image_space(rect, image, mapping, transform);
        assert_eq!(result, ImageRect::new(500, 0, 1000, 1000));
        assert!(result.fits_within(image.rotated(90.0)));
    }

    #[test]
    fn test_rect_outside_image_collapses_to_edge_pixel() {
        let image = ImageGeometry::new(2000, 1000);
        let viewport = ViewportGeometry::new(400.0, 800.0);
        let mapping = DisplayMapping::contain(image, viewport);

        // Entirely in the top letterbox band
        let rect = CropRect::new(0.0, 0.0, 400.0, 100.0);
        let result = to_image_space(rect, image, mapping, Transform::IDENTITY);
        assert_eq!(result.height, 1);
        assert_eq!(result.origin_y, 0);
        assert_eq!(result.width, 2000);
    }

    #[test]
    fn test_unmeasured_image_yields_empty_rect() {
        let result = to_image_space(
            CropRect::new(0.0, 0.0, 10.0, 10.0),
            ImageGeometry::default(),
            DisplayMapping::default(),
            Transform::IDENTITY,
        );
        assert_eq!(result, ImageRect::default());
    }

    #[test]
    fn test_to_display_rect_inverts_identity_mapping() {
        let (image, viewport) = portrait();
        let mapping = DisplayMapping::contain(image, viewport);
        let shown = mapping.to_display_rect(ImageRect::new(125, 250, 750, 750));
        assert_abs_diff_eq!(shown.x, 50.0, epsilon = 1e-9);
        assert_abs_diff_eq!(shown.y, 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(shown.width, 300.0, epsilon = 1e-9);
        assert_abs_diff_eq!(shown.height, 300.0, epsilon = 1e-9);
    }

    #[test]
    fn test_clamp_enforces_min_size() {
        let viewport = ViewportGeometry::new(360.0, 600.0);
        let rect = clamp_crop_rect(CropRect::new(10.0, 10.0, 5.0, 0.0), viewport, 20.0);
        assert_eq!(rect.width, 20.0);
        assert_eq!(rect.height, 20.0);
    }

    #[test]
    fn test_clamp_shifts_inside_viewport() {
        let viewport = ViewportGeometry::new(360.0, 600.0);
        let rect = clamp_crop_rect(CropRect::new(300.0, -50.0, 100.0, 100.0), viewport, 20.0);
        assert_eq!(rect, CropRect::new(260.0, 0.0, 100.0, 100.0));
    }

    #[test]
    fn test_clamp_caps_to_viewport() {
        let viewport = ViewportGeometry::new(360.0, 600.0);
        let rect = clamp_crop_rect(CropRect::new(0.0, 0.0, 1000.0, 1000.0), viewport, 20.0);
        assert_eq!(rect, CropRect::new(0.0, 0.0, 360.0, 600.0));
    }

    #[test]
    fn test_clamp_tiny_viewport_wins_over_min_size() {
        let viewport = ViewportGeometry::new(10.0, 10.0);
        let rect = clamp_crop_rect(CropRect::new(0.0, 0.0, 5.0, 5.0), viewport, 20.0);
        assert_eq!(rect, CropRect::new(0.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn test_clamp_replaces_non_finite() {
        let viewport = ViewportGeometry::new(360.0, 600.0);
        let rect = clamp_crop_rect(
            CropRect::new(f64::NAN, 10.0, f64::INFINITY, f64::NAN),
            viewport,
            20.0,
        );
        assert!(viewport.bounds().contains_rect(&rect));
        assert!(rect.width >= 20.0 && rect.height >= 20.0);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
