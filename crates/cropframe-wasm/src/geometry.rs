//! Geometry mapper WASM bindings.
//!
//! Stateless helpers for hosts that drive their own interaction state and
//! only need the coordinate conversion.
//!
//! # Example
//!
//! ```typescript
//! import { to_image_space, JsCropRect, JsTransform } from '@cropframe/wasm';
//!
//! const rect = new JsCropRect(50, 100, 300, 300);
//! const pixels = to_image_space(rect, 1000, 2000, 400, 800, JsTransform.identity());
//! console.log(pixels.origin_x, pixels.origin_y, pixels.width, pixels.height);
//! ```

use crate::types::{JsCropRect, JsImageRect, JsTransform};
use cropframe_core::geometry::{self, DisplayMapping, ImageGeometry, ViewportGeometry};
use wasm_bindgen::prelude::*;

/// Map a display-space crop rectangle to image pixels.
///
/// The image is contain-fitted into the viewport before `transform` is
/// applied. The result is in the pixel grid of the image after the
/// transform's quarter-turn rotation and is clamped to its bounds.
#[wasm_bindgen]
pub fn to_image_space(
    rect: &JsCropRect,
    image_width: u32,
    image_height: u32,
    viewport_width: f64,
    viewport_height: f64,
    transform: &JsTransform,
) -> JsImageRect {
    let image = ImageGeometry::new(image_width, image_height);
    let viewport = ViewportGeometry::new(viewport_width, viewport_height);
    let mapping = DisplayMapping::contain(image, viewport);

    JsImageRect::from_rect(geometry::to_image_space(
        rect.rect(),
        image,
        mapping,
        transform.transform(),
    ))
}

/// Constrain a display-space rectangle to a minimum size and to the viewport.
#[wasm_bindgen]
pub fn clamp_crop_rect(
    rect: &JsCropRect,
    viewport_width: f64,
    viewport_height: f64,
    min_size: f64,
) -> JsCropRect {
    let viewport = ViewportGeometry::new(viewport_width, viewport_height);
    JsCropRect::from_rect(geometry::clamp_crop_rect(rect.rect(), viewport, min_size))
}

/// Footprint of the contain-fitted image inside the viewport.
#[wasm_bindgen]
pub fn displayed_image_rect(
    image_width: u32,
    image_height: u32,
    viewport_width: f64,
    viewport_height: f64,
) -> JsCropRect {
    let image = ImageGeometry::new(image_width, image_height);
    let viewport = ViewportGeometry::new(viewport_width, viewport_height);
    JsCropRect::from_rect(DisplayMapping::contain(image, viewport).displayed_rect(image))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_image_space_example() {
        let rect = JsCropRect::new(50.0, 100.0, 300.0, 300.0);
        let result = to_image_space(&rect, 1000, 2000, 400.0, 800.0, &JsTransform::identity());
        assert_eq!(
            (result.origin_x(), result.origin_y(), result.width(), result.height()),
            (125, 250, 750, 750)
        );
    }

    #[test]
    fn test_to_image_space_with_zoom() {
        let rect = JsCropRect::new(0.0, 0.0, 400.0, 800.0);
        let transform = JsTransform::new(2.0, 0.0, 0.0, 0.0);
        let result = to_image_space(&rect, 1000, 2000, 400.0, 800.0, &transform);
        assert_eq!(
            (result.origin_x(), result.origin_y(), result.width(), result.height()),
            (250, 500, 500, 1000)
        );
    }

    #[test]
    fn test_clamp_crop_rect() {
        let rect = JsCropRect::new(390.0, -10.0, 5.0, 5.0);
        let result = clamp_crop_rect(&rect, 400.0, 800.0, 20.0);
        assert_eq!(
            (result.x(), result.y(), result.width(), result.height()),
            (380.0, 0.0, 20.0, 20.0)
        );
    }

    #[test]
    fn test_displayed_image_rect_letterbox() {
        let result = displayed_image_rect(2000, 1000, 400.0, 800.0);
        assert_eq!(
            (result.x(), result.y(), result.width(), result.height()),
            (0.0, 300.0, 400.0, 200.0)
        );
    }
}
