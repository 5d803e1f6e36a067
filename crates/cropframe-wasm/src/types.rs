//! WASM-compatible wrapper types for geometry values.
//!
//! These wrap the core value types so JavaScript receives plain objects with
//! numeric getters, and so the bindings stay testable on native targets.

use cropframe_core::crop::CropTransition;
use cropframe_core::geometry::{CropRect, ImageGeometry, ImageRect};
use cropframe_core::transform::Transform;
use wasm_bindgen::prelude::*;

/// A display-space rectangle.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JsCropRect {
    inner: CropRect,
}

#[wasm_bindgen]
impl JsCropRect {
    #[wasm_bindgen(constructor)]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> JsCropRect {
        Self {
            inner: CropRect::new(x, y, width, height),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn x(&self) -> f64 {
        self.inner.x
    }

    #[wasm_bindgen(getter)]
    pub fn y(&self) -> f64 {
        self.inner.y
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> f64 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> f64 {
        self.inner.height
    }
}

impl JsCropRect {
    pub(crate) fn from_rect(inner: CropRect) -> Self {
        Self { inner }
    }

    pub(crate) fn rect(&self) -> CropRect {
        self.inner
    }
}

/// A rectangle in image pixels, as passed to the manipulation primitive.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JsImageRect {
    inner: ImageRect,
}

#[wasm_bindgen]
impl JsImageRect {
    #[wasm_bindgen(getter)]
    pub fn origin_x(&self) -> u32 {
        self.inner.origin_x
    }

    #[wasm_bindgen(getter)]
    pub fn origin_y(&self) -> u32 {
        self.inner.origin_y
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }
}

impl JsImageRect {
    pub(crate) fn from_rect(inner: ImageRect) -> Self {
        Self { inner }
    }
}

/// Natural dimensions of an image, in pixels.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JsImageGeometry {
    inner: ImageGeometry,
}

#[wasm_bindgen]
impl JsImageGeometry {
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }
}

impl JsImageGeometry {
    pub(crate) fn from_geometry(inner: ImageGeometry) -> Self {
        Self { inner }
    }
}

/// Pan, zoom and rotation of the displayed image.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JsTransform {
    inner: Transform,
}

#[wasm_bindgen]
impl JsTransform {
    #[wasm_bindgen(constructor)]
    pub fn new(scale: f64, translate_x: f64, translate_y: f64, rotation: f64) -> JsTransform {
        Self {
            inner: Transform {
                scale,
                translate_x,
                translate_y,
                rotation,
            },
        }
    }

    /// The identity transform.
    pub fn identity() -> JsTransform {
        Self::from_transform(Transform::IDENTITY)
    }

    #[wasm_bindgen(getter)]
    pub fn scale(&self) -> f64 {
        self.inner.scale
    }

    #[wasm_bindgen(getter)]
    pub fn translate_x(&self) -> f64 {
        self.inner.translate_x
    }

    #[wasm_bindgen(getter)]
    pub fn translate_y(&self) -> f64 {
        self.inner.translate_y
    }

    #[wasm_bindgen(getter)]
    pub fn rotation(&self) -> f64 {
        self.inner.rotation
    }
}

impl JsTransform {
    pub(crate) fn from_transform(inner: Transform) -> Self {
        Self { inner }
    }

    pub(crate) fn transform(&self) -> Transform {
        self.inner
    }
}

/// Endpoints of a crop snap, for animating the overlay.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JsCropTransition {
    inner: CropTransition,
}

#[wasm_bindgen]
impl JsCropTransition {
    #[wasm_bindgen(getter)]
    pub fn from(&self) -> JsCropRect {
        JsCropRect::from_rect(self.inner.from)
    }

    #[wasm_bindgen(getter)]
    pub fn to(&self) -> JsCropRect {
        JsCropRect::from_rect(self.inner.to)
    }

    /// Rectangle at progress `t` (0 to 1) with smootherstep easing.
    pub fn sample(&self, t: f64) -> JsCropRect {
        JsCropRect::from_rect(self.inner.sample(t))
    }
}

impl JsCropTransition {
    pub(crate) fn from_transition(inner: CropTransition) -> Self {
        Self { inner }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_rect_getters() {
        let rect = JsCropRect::new(1.0, 2.0, 30.0, 40.0);
        assert_eq!((rect.x(), rect.y(), rect.width(), rect.height()), (1.0, 2.0, 30.0, 40.0));
        assert_eq!(rect.rect(), CropRect::new(1.0, 2.0, 30.0, 40.0));
    }

    #[test]
    fn test_image_rect_getters() {
        let rect = JsImageRect::from_rect(ImageRect::new(125, 250, 750, 700));
        assert_eq!(rect.origin_x(), 125);
        assert_eq!(rect.origin_y(), 250);
        assert_eq!(rect.width(), 750);
        assert_eq!(rect.height(), 700);
    }

    #[test]
    fn test_transform_identity() {
        let transform = JsTransform::identity();
        assert_eq!(transform.scale(), 1.0);
        assert!(transform.transform().is_identity());
    }

    #[test]
    fn test_transition_endpoints() {
        let transition = JsCropTransition::from_transition(CropTransition {
            from: CropRect::new(0.0, 0.0, 100.0, 200.0),
            to: CropRect::new(0.0, 50.0, 100.0, 100.0),
        });
        assert_eq!(transition.sample(0.0), transition.from());
        assert_eq!(transition.sample(1.0), transition.to());
    }
}
