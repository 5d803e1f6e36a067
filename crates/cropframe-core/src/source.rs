//! Image source: a readable resource URI plus its natural pixel dimensions.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::decode::{read_dimensions, read_orientation, DecodeError};
use crate::geometry::ImageGeometry;

/// A source image as handed to an edit session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSource {
    pub uri: String,
    pub geometry: ImageGeometry,
}

impl ImageSource {
    pub fn new(uri: impl Into<String>, geometry: ImageGeometry) -> Self {
        Self {
            uri: uri.into(),
            geometry,
        }
    }

    /// Probe `bytes` for the geometry of the image stored under `uri`.
    pub fn probe(uri: impl Into<String>, bytes: &[u8]) -> Result<Self, DecodeError> {
        Ok(Self::new(uri, probe_geometry(bytes)?))
    }
}

/// Natural dimensions of encoded image bytes, as displayed.
///
/// Reads the header only. Dimensions are swapped when the EXIF orientation is
/// a quarter turn, matching what a viewer shows and what the decoder produces.
pub fn probe_geometry(bytes: &[u8]) -> Result<ImageGeometry, DecodeError> {
    let (width, height) = read_dimensions(bytes)?;
    let orientation = read_orientation(bytes);

    let geometry = if orientation.swaps_dimensions() {
        ImageGeometry::new(height, width)
    } else {
        ImageGeometry::new(width, height)
    };
    debug!(?orientation, width = geometry.width, height = geometry.height, "Probed image geometry");
    Ok(geometry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{decode_image, DecodedImage};
    use crate::encode::encode_image;
    use crate::manipulate::SaveOptions;

    fn encoded(width: u32, height: u32, options: SaveOptions) -> Vec<u8> {
        let pixels = vec![64u8; (width * height * 3) as usize];
        encode_image(&DecodedImage::new(width, height, pixels), options).unwrap()
    }

    #[test]
    fn test_probe_png() {
        let geometry = probe_geometry(&encoded(30, 20, SaveOptions::png())).unwrap();
        assert_eq!(geometry, ImageGeometry::new(30, 20));
    }

    #[test]
    fn test_probe_jpeg() {
        let geometry = probe_geometry(&encoded(16, 48, SaveOptions::jpeg(80))).unwrap();
        assert_eq!(geometry, ImageGeometry::new(16, 48));
    }

    #[test]
    fn test_probe_matches_decoded_size() {
        let bytes = encoded(12, 9, SaveOptions::png());
        let decoded = decode_image(&bytes).unwrap();
        assert_eq!(probe_geometry(&bytes).unwrap(), decoded.geometry());
    }

    #[test]
    fn test_probe_rejects_unknown_bytes() {
        assert!(matches!(
            probe_geometry(b"not an image"),
            Err(DecodeError::InvalidFormat)
        ));
    }

    #[test]
    fn test_image_source_probe() {
        let source = ImageSource::probe("memory://a.png", &encoded(5, 7, SaveOptions::png())).unwrap();
        assert_eq!(source.uri, "memory://a.png");
        assert_eq!(source.geometry, ImageGeometry::new(5, 7));
    }
}
