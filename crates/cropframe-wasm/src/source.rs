//! Image source WASM bindings.

use crate::types::JsImageGeometry;
use cropframe_core::source;
use wasm_bindgen::prelude::*;

/// Read the natural dimensions of encoded JPEG or PNG bytes.
///
/// Only the header is parsed. Dimensions are swapped when the EXIF
/// orientation is a quarter turn, matching the displayed image.
///
/// # Example
///
/// ```typescript
/// const bytes = new Uint8Array(await file.arrayBuffer());
/// const geometry = probe_image_geometry(bytes);
/// const session = new JsEditSession(uri, geometry.width, geometry.height, 390, 700);
/// ```
#[wasm_bindgen]
pub fn probe_image_geometry(bytes: &[u8]) -> Result<JsImageGeometry, JsValue> {
    source::probe_geometry(bytes)
        .map(JsImageGeometry::from_geometry)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// WASM-specific tests that require JsValue.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use cropframe_core::decode::DecodedImage;
    use cropframe_core::encode::encode_image;
    use cropframe_core::manipulate::SaveOptions;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_probe_png() {
        let image = DecodedImage::new(6, 4, vec![10u8; 6 * 4 * 3]);
        let bytes = encode_image(&image, SaveOptions::png()).unwrap();
        let geometry = probe_image_geometry(&bytes).unwrap();
        assert_eq!((geometry.width(), geometry.height()), (6, 4));
    }

    #[wasm_bindgen_test]
    fn test_probe_invalid() {
        assert!(probe_image_geometry(&[0, 1, 2, 3]).is_err());
    }
}
