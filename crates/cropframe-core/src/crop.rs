//! Crop region state: the on-screen crop rectangle and its resize gestures.
//!
//! The rectangle lives in display space and is independent of the image
//! transform. It is resized from its bottom-right handle (origin fixed) or
//! snapped to an aspect ratio centered in the canvas.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::{clamp_crop_rect, CropRect, ViewportGeometry};

/// Target aspect ratio, expressed as width:height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectRatio {
    pub width: f64,
    pub height: f64,
}

impl AspectRatio {
    pub const SQUARE: AspectRatio = AspectRatio::new(1.0, 1.0);
    pub const PHOTO: AspectRatio = AspectRatio::new(4.0, 3.0);
    pub const PHOTO_PORTRAIT: AspectRatio = AspectRatio::new(3.0, 4.0);
    pub const LANDSCAPE: AspectRatio = AspectRatio::new(16.0, 9.0);
    pub const PORTRAIT: AspectRatio = AspectRatio::new(9.0, 16.0);

    /// Presets offered by the crop toolbar, in display order.
    pub const PRESETS: [AspectRatio; 5] = [
        Self::SQUARE,
        Self::PHOTO,
        Self::PHOTO_PORTRAIT,
        Self::LANDSCAPE,
        Self::PORTRAIT,
    ];

    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Width over height, or `None` if the ratio is not a positive finite number.
    pub fn value(&self) -> Option<f64> {
        let value = self.width / self.height;
        (value.is_finite() && value > 0.0).then_some(value)
    }
}

/// Start and end of an aspect-ratio snap, for presentation-layer animation.
///
/// The crop region jumps to `to` immediately; intermediate frames are only a
/// rendering concern.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropTransition {
    pub from: CropRect,
    pub to: CropRect,
}

impl CropTransition {
    /// Returns true if the snap did not move the rectangle.
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }

    /// Rectangle at progress `t` (0.0 to 1.0) with smootherstep easing.
    pub fn sample(&self, t: f64) -> CropRect {
        let e = smootherstep(t);
        let lerp = |a: f64, b: f64| a + (b - a) * e;
        CropRect::new(
            lerp(self.from.x, self.to.x),
            lerp(self.from.y, self.to.y),
            lerp(self.from.width, self.to.width),
            lerp(self.from.height, self.to.height),
        )
    }
}

/// Smootherstep easing: `6t^5 - 15t^4 + 10t^3`, with `t` clamped to 0.0-1.0.
///
/// Zero velocity and acceleration at both ends, so a snap eases in and out.
#[inline]
pub fn smootherstep(t: f64) -> f64 {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 1.0 };
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

/// The crop rectangle plus the snapshot of an in-progress resize.
#[derive(Debug, Clone, PartialEq)]
pub struct CropRegion {
    rect: CropRect,
    viewport: ViewportGeometry,
    min_size: f64,
    resize_origin: Option<CropRect>,
}

impl CropRegion {
    /// Create a region, clamping `initial` into the viewport.
    pub fn new(initial: CropRect, viewport: ViewportGeometry, min_size: f64) -> Self {
        Self {
            rect: clamp_crop_rect(initial, viewport, min_size),
            viewport,
            min_size,
            resize_origin: None,
        }
    }

    pub fn rect(&self) -> CropRect {
        self.rect
    }

    pub fn viewport(&self) -> ViewportGeometry {
        self.viewport
    }

    pub fn min_size(&self) -> f64 {
        self.min_size
    }

    pub fn is_resizing(&self) -> bool {
        self.resize_origin.is_some()
    }

    /// Snapshot the current rectangle as the base of a resize gesture.
    pub fn begin_resize(&mut self) {
        self.resize_origin = Some(self.rect);
    }

    /// Resize from the snapshot by a cumulative delta since `begin_resize`.
    ///
    /// The origin stays put; the size is capped at the viewport's right and
    /// bottom edges and then clamped. Without a snapshot the current
    /// rectangle is used as the base.
    pub fn update_resize(&mut self, delta_width: f64, delta_height: f64) {
        let start = self.resize_origin.unwrap_or(self.rect);
        let bounds = self.viewport.bounds();
        let dw = if delta_width.is_finite() { delta_width } else { 0.0 };
        let dh = if delta_height.is_finite() { delta_height } else { 0.0 };

        let width = (start.width + dw).min(bounds.width - start.x);
        let height = (start.height + dh).min(bounds.height - start.y);

        self.rect = clamp_crop_rect(
            CropRect::new(start.x, start.y, width, height),
            self.viewport,
            self.min_size,
        );
    }

    /// Finish the resize gesture and drop the snapshot.
    pub fn end_resize(&mut self) {
        if self.resize_origin.take().is_some() {
            debug!(rect = ?self.rect, "Crop resize finished");
        }
    }

    /// Snap the rectangle to `ratio`, centered in the canvas.
    ///
    /// Starts from the current width. If the resulting height overflows the
    /// canvas, the width is derived from the canvas height instead, and vice
    /// versa. Invalid ratios leave the rectangle unchanged.
    pub fn apply_aspect_ratio(&mut self, ratio: AspectRatio) -> CropTransition {
        let from = self.rect;
        let Some(r) = ratio.value() else {
            return CropTransition { from, to: from };
        };
        let canvas = self.viewport.bounds();

        let mut width = self.rect.width;
        let mut height = width / r;

        // Grow tiny rectangles until both edges reach the minimum size
        let min = self.min_size.max(0.0);
        if width < min || height < min {
            let grow = (min / width.max(f64::MIN_POSITIVE)).max(min / height.max(f64::MIN_POSITIVE));
            width *= grow;
            height *= grow;
        }

        if height > canvas.height {
            height = canvas.height;
            width = height * r;
        }
        if width > canvas.width {
            width = canvas.width;
            height = width / r;
        }

        let target = CropRect::new(
            (canvas.width - width) / 2.0,
            (canvas.height - height) / 2.0,
            width,
            height,
        );
        self.rect = clamp_crop_rect(target, self.viewport, self.min_size);
        self.resize_origin = None;

        debug!(ratio = r, rect = ?self.rect, "Snapped crop to aspect ratio");
        CropTransition {
            from,
            to: self.rect,
        }
    }

    /// Replace the rectangle wholesale, clamping it into the viewport.
    pub fn set_rect(&mut self, rect: CropRect) {
        self.rect = clamp_crop_rect(rect, self.viewport, self.min_size);
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
