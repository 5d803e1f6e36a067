//! The image-manipulation primitive: request types, trait, and a reference
//! in-process implementation.
//!
//! # Request Order
//!
//! An export request is an ordered list of operations:
//! 1. Rotation (quarter turns, clockwise), if any
//! 2. Crop, in the pixel grid of the rotated image
//!
//! # Serialized Form
//!
//! Operations serialize to the shape JS manipulators expect:
//! `{ "rotate": 90 }` and
//! `{ "crop": { "originX": 0, "originY": 0, "width": 10, "height": 10 } }`.

mod crop;
mod pixel;
mod rotation;

pub use crop::crop_pixels;
pub use pixel::PixelManipulator;
pub use rotation::rotate_quarter_turns;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::DecodeError;
use crate::encode::EncodeError;
use crate::geometry::ImageRect;

/// One step of a manipulation request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ManipulationOp {
    /// Rotate clockwise by this many degrees (a multiple of 90).
    Rotate(f64),
    /// Crop to this rectangle, in pixels of the image as it is at this step.
    Crop(ImageRect),
}

/// Encoded output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Jpeg,
    Png,
}

impl OutputFormat {
    /// File extension for resources in this format.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }
}

/// Output options passed alongside the operation list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveOptions {
    pub format: OutputFormat,
    /// JPEG quality, 1-100. Ignored for PNG.
    pub quality: u8,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self::jpeg(90)
    }
}

impl SaveOptions {
    pub fn jpeg(quality: u8) -> Self {
        Self {
            format: OutputFormat::Jpeg,
            quality,
        }
    }

    pub fn png() -> Self {
        Self {
            format: OutputFormat::Png,
            quality: 100,
        }
    }
}

/// New image resource returned by the manipulation primitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManipulatedImage {
    pub uri: String,
    pub width: u32,
    pub height: u32,
}

/// Errors raised by a manipulation primitive.
#[derive(Debug, Error)]
pub enum ManipulationError {
    /// The source URI does not name a readable image.
    #[error("Unknown image resource: {0}")]
    UnknownResource(String),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// Failure reported by an external primitive.
    #[error("Image manipulation failed: {0}")]
    Failed(String),
}

/// Applies an ordered operation list to the image at `uri` and returns a new resource.
///
/// Implementations run on a single thread; the returned future need not be `Send`.
#[allow(async_fn_in_trait)]
pub trait ImageManipulator {
    async fn manipulate(
        &self,
        uri: &str,
        ops: &[ManipulationOp],
        options: SaveOptions,
    ) -> Result<ManipulatedImage, ManipulationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_save_options() {
        let options = SaveOptions::default();
        assert_eq!(options.format, OutputFormat::Jpeg);
        assert_eq!(options.quality, 90);
    }

    #[test]
    fn test_extensions() {
        assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
        assert_eq!(OutputFormat::Png.extension(), "png");
    }

    #[test]
    fn test_ops_serialize_to_host_shape() {
        let rotate = serde_json::to_value(ManipulationOp::Rotate(90.0)).unwrap();
        assert_eq!(rotate, serde_json::json!({ "rotate": 90.0 }));

        let crop = serde_json::to_value(ManipulationOp::Crop(ImageRect::new(1, 2, 3, 4))).unwrap();
        assert_eq!(
            crop,
            serde_json::json!({ "crop": { "originX": 1, "originY": 2, "width": 3, "height": 4 } })
        );
    }

    #[test]
    fn test_save_options_serialize() {
        let value = serde_json::to_value(SaveOptions::png()).unwrap();
        assert_eq!(value, serde_json::json!({ "format": "png", "quality": 100 }));
    }

    #[test]
    fn test_error_display() {
        let err = ManipulationError::UnknownResource("memory://missing".to_string());
        assert_eq!(err.to_string(), "Unknown image resource: memory://missing");
    }
}
