//! Decoded pixels, EXIF orientation and decode errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::ImageGeometry;

/// Errors raised while reading encoded image bytes.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The bytes do not start with a recognized JPEG or PNG signature.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The header was recognized but the data could not be read.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),
}

/// Transform that brings stored pixels upright, derived from the EXIF
/// orientation tag: first `clockwise_turns` quarter turns, then an optional
/// horizontal mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Orientation {
    pub clockwise_turns: u8,
    pub mirrored: bool,
}

impl Orientation {
    pub const UPRIGHT: Orientation = Orientation {
        clockwise_turns: 0,
        mirrored: false,
    };

    /// Interpret an EXIF orientation tag (1-8). Unknown values are upright.
    pub fn from_exif(tag: u32) -> Self {
        let (clockwise_turns, mirrored) = match tag {
            2 => (0, true),
            3 => (2, false),
            4 => (2, true),
            5 => (1, true),
            6 => (1, false),
            7 => (3, true),
            8 => (3, false),
            _ => (0, false),
        };
        Self {
            clockwise_turns,
            mirrored,
        }
    }

    /// Returns true if the upright image has width and height swapped.
    pub fn swaps_dimensions(self) -> bool {
        self.clockwise_turns % 2 == 1
    }
}

/// RGB pixels in row-major order, 3 bytes per pixel.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            (width as usize) * (height as usize) * 3,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self::new(width, height, img.into_raw())
    }

    pub fn geometry(&self) -> ImageGeometry {
        ImageGeometry::new(self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}
