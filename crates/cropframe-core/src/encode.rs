//! Encoding of manipulated images for the reference manipulator.
//!
//! Uses the `image` crate's JPEG and PNG encoders. Quality only applies to
//! JPEG; PNG is lossless.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use thiserror::Error;

use crate::decode::DecodedImage;
use crate::manipulate::{OutputFormat, SaveOptions};

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying encoder failed
    #[error("{format:?} encoding failed: {message}")]
    EncodingFailed { format: OutputFormat, message: String },
}

/// Encode an RGB image in the requested output format.
///
/// JPEG quality is clamped to 1-100.
pub fn encode_image(image: &DecodedImage, options: SaveOptions) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = (image.width, image.height);
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = (width as usize) * (height as usize) * 3;
    if image.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: image.pixels.len(),
        });
    }

    let mut buffer = Cursor::new(Vec::new());
    let result = match options.format {
        OutputFormat::Jpeg => {
            JpegEncoder::new_with_quality(&mut buffer, options.quality.clamp(1, 100))
                .write_image(&image.pixels, width, height, ExtendedColorType::Rgb8)
        }
        OutputFormat::Png => PngEncoder::new(&mut buffer).write_image(
            &image.pixels,
            width,
            height,
            ExtendedColorType::Rgb8,
        ),
    };
    result.map_err(|e| EncodeError::EncodingFailed {
        format: options.format,
        message: e.to_string(),
    })?;

    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(width: u32, height: u32) -> DecodedImage {
        DecodedImage::new(width, height, vec![128u8; (width * height * 3) as usize])
    }

    #[test]
    fn test_encode_jpeg_markers() {
        let bytes = encode_image(&gray(16, 16), SaveOptions::jpeg(90)).unwrap();

        // SOI and EOI markers
        assert_eq!(&bytes[0..2], &[0xFF, 0xD8]);
        assert_eq!(&bytes[bytes.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_encode_png_signature() {
        let bytes = encode_image(&gray(8, 4), SaveOptions::png()).unwrap();
        assert_eq!(&bytes[0..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_png_round_trips_exact_pixels() {
        let pixels: Vec<u8> = (0..4 * 3 * 3).map(|i| (i * 7) as u8).collect();
        let image = DecodedImage::new(4, 3, pixels.clone());

        let bytes = encode_image(&image, SaveOptions::png()).unwrap();
        let decoded = crate::decode::decode_image(&bytes).unwrap();
        assert_eq!(decoded.pixels, pixels);
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        let image = DecodedImage {
            width: 0,
            height: 10,
            pixels: vec![],
        };
        let result = encode_image(&image, SaveOptions::default());
        assert!(matches!(
            result,
            Err(EncodeError::InvalidDimensions { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_pixel_length_mismatch_rejected() {
        let image = DecodedImage {
            width: 10,
            height: 10,
            pixels: vec![0u8; 30],
        };
        let result = encode_image(&image, SaveOptions::default());
        assert!(matches!(
            result,
            Err(EncodeError::InvalidPixelData { expected: 300, actual: 30 })
        ));
    }

    #[test]
    fn test_quality_out_of_range_is_clamped() {
        assert!(encode_image(&gray(8, 8), SaveOptions::jpeg(0)).is_ok());
        assert!(encode_image(&gray(8, 8), SaveOptions::jpeg(255)).is_ok());
    }
}
