//! Value types shared by the geometry mapper and the session state.

use serde::{Deserialize, Serialize};

/// Natural pixel dimensions of the source image.
///
/// A zero dimension means the image has not been measured yet; mapping
/// functions treat such a geometry as degenerate and fall back to defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageGeometry {
    pub width: u32,
    pub height: u32,
}

impl ImageGeometry {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns true until both dimensions are known.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Geometry of the image after a clockwise rotation snapped to quarter turns.
    ///
    /// 90 and 270 degrees swap the dimensions; 0 and 180 preserve them.
    pub fn rotated(&self, rotation_degrees: f64) -> Self {
        if quarter_turns(rotation_degrees) % 2 == 1 {
            Self::new(self.height, self.width)
        } else {
            *self
        }
    }
}

/// Size of the display surface the image is fitted into.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportGeometry {
    pub width: f64,
    pub height: f64,
}

impl ViewportGeometry {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }

    /// The whole viewport as a display rectangle anchored at the origin.
    pub fn bounds(&self) -> CropRect {
        CropRect::new(0.0, 0.0, self.width.max(0.0), self.height.max(0.0))
    }
}

/// Crop rectangle in display space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Width over height, or 0.0 for a rectangle with no height.
    pub fn aspect_ratio(&self) -> f64 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            0.0
        }
    }

    /// Returns true if `other` lies entirely inside `self`, with a small
    /// tolerance for accumulated floating point error.
    pub fn contains_rect(&self, other: &CropRect) -> bool {
        const EPS: f64 = 1e-6;
        other.x >= self.x - EPS
            && other.y >= self.y - EPS
            && other.right() <= self.right() + EPS
            && other.bottom() <= self.bottom() + EPS
    }
}

/// Crop rectangle in image pixel space, as handed to the manipulation primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRect {
    pub origin_x: u32,
    pub origin_y: u32,
    pub width: u32,
    pub height: u32,
}

impl ImageRect {
    pub fn new(origin_x: u32, origin_y: u32, width: u32, height: u32) -> Self {
        Self {
            origin_x,
            origin_y,
            width,
            height,
        }
    }

    /// Rectangle covering the whole image.
    pub fn full(image: ImageGeometry) -> Self {
        Self::new(0, 0, image.width, image.height)
    }

    pub fn is_full(&self, image: ImageGeometry) -> bool {
        *self == Self::full(image)
    }

    /// Returns true if the rectangle fits inside `image`.
    pub fn fits_within(&self, image: ImageGeometry) -> bool {
        self.origin_x as u64 + self.width as u64 <= image.width as u64
            && self.origin_y as u64 + self.height as u64 <= image.height as u64
    }

    /// Map a rectangle expressed in the rotated image back to the source frame.
    ///
    /// `rotated` is the geometry of the image *after* the clockwise rotation,
    /// i.e. the frame this rectangle lives in. Primitives that crop before
    /// rotating need the rectangle in this form.
    pub fn to_source_frame(&self, rotation_degrees: f64, rotated: ImageGeometry) -> ImageRect {
        let (x, y, w, h) = (self.origin_x, self.origin_y, self.width, self.height);
        match quarter_turns(rotation_degrees) {
            // Source (sx, sy) lands at (H - sy, sx); the rotated width is H.
            1 => ImageRect::new(y, rotated.width.saturating_sub(x + w), h, w),
            2 => ImageRect::new(
                rotated.width.saturating_sub(x + w),
                rotated.height.saturating_sub(y + h),
                w,
                h,
            ),
            // Source (sx, sy) lands at (sy, W - sx); the rotated height is W.
            3 => ImageRect::new(rotated.height.saturating_sub(y + h), x, h, w),
            _ => *self,
        }
    }
}

/// Normalize an angle in degrees to `[0, 360)`.
pub fn normalize_rotation(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Number of clockwise quarter turns (0..=3) nearest to `degrees`.
pub fn quarter_turns(degrees: f64) -> u8 {
    if !degrees.is_finite() {
        return 0;
    }
    ((degrees / 90.0).round() as i64).rem_euclid(4) as u8
}
