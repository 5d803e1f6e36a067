//! Pixel cropping.
//!
//! The crop rectangle is given in pixel coordinates of the image being
//! cropped, exactly as the geometry mapper produces it.

use crate::decode::DecodedImage;
use crate::geometry::ImageRect;

/// Copy the pixels inside `rect` into a new image.
///
/// # Behavior
///
/// - A rectangle extending beyond the image is clamped to its bounds
/// - The output is at least 1x1 pixels for a non-empty source
/// - A rectangle covering the whole image returns a copy of the original
pub fn crop_pixels(image: &DecodedImage, rect: ImageRect) -> DecodedImage {
    if rect.is_full(image.geometry()) || image.is_empty() {
        return image.clone();
    }

    let left = rect.origin_x.min(image.width - 1);
    let top = rect.origin_y.min(image.height - 1);
    let right = left.saturating_add(rect.width).min(image.width);
    let bottom = top.saturating_add(rect.height).min(image.height);

    let out_width = right.saturating_sub(left).max(1);
    let out_height = bottom.saturating_sub(top).max(1);

    let src_stride = image.width as usize * 3;
    let row_len = out_width as usize * 3;
    let mut output = Vec::with_capacity(row_len * out_height as usize);

    // Rows are contiguous, so copy whole row slices
    for y in top..top + out_height {
        let start = y as usize * src_stride + left as usize * 3;
        output.extend_from_slice(&image.pixels[start..start + row_len]);
    }

    DecodedImage::new(out_width, out_height, output)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Create a test image where each pixel has a unique value based on position.
    fn test_image(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((y * width + x) % 256) as u8;
                pixels.extend_from_slice(&[v, v, v]);
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    #[test]
    fn test_full_crop_is_identity() {
        let img = test_image(50, 40);
        let result = crop_pixels(&img, ImageRect::new(0, 0, 50, 40));
        assert_eq!(result.pixels, img.pixels);
    }

    #[test]
    fn test_inner_crop() {
        let img = test_image(10, 10);
        let result = crop_pixels(&img, ImageRect::new(2, 3, 4, 5));

        assert_eq!((result.width, result.height), (4, 5));
        // First pixel comes from (2, 3): 3 * 10 + 2 = 32
        assert_eq!(result.pixels[0], 32);
        // Last pixel comes from (5, 7): 7 * 10 + 5 = 75
        assert_eq!(result.pixels[result.pixels.len() - 1], 75);
    }

    #[test]
    fn test_crop_clamps_to_bounds() {
        let img = test_image(10, 10);
        let result = crop_pixels(&img, ImageRect::new(8, 8, 50, 50));
        assert_eq!((result.width, result.height), (2, 2));
        assert_eq!(result.pixels[0], 88);
    }

    #[test]
    fn test_crop_origin_outside_keeps_one_pixel() {
        let img = test_image(10, 10);
        let result = crop_pixels(&img, ImageRect::new(100, 100, 5, 5));
        assert_eq!((result.width, result.height), (1, 1));
        assert_eq!(result.pixels[0], 99);
    }

    #[test]
    fn test_zero_size_crop_keeps_one_pixel() {
        let img = test_image(10, 10);
        let result = crop_pixels(&img, ImageRect::new(4, 4, 0, 0));
        assert_eq!((result.width, result.height), (1, 1));
    }

    #[test]
    fn test_rectangular_strip() {
        let img = test_image(200, 100);
        let result = crop_pixels(&img, ImageRect::new(0, 0, 50, 100));
        assert_eq!((result.width, result.height), (50, 100));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn create_test_image(width: u32, height: u32) -> DecodedImage {
        let pixels = (0..width * height)
            .flat_map(|i| {
                let v = (i % 256) as u8;
                [v, v, v]
            })
            .collect();
        DecodedImage::new(width, height, pixels)
    }

    proptest! {
        /// Property: output stays within the source and matches its buffer size.
        #[test]
        fn prop_output_bounded_and_consistent(
            (width, height) in (1u32..=64, 1u32..=64),
            (x, y, w, h) in (0u32..80, 0u32..80, 0u32..80, 0u32..80),
        ) {
            let img = create_test_image(width, height);
            let result = crop_pixels(&img, ImageRect::new(x, y, w, h));

            prop_assert!(result.width >= 1 && result.width <= width);
            prop_assert!(result.height >= 1 && result.height <= height);
            prop_assert_eq!(result.pixels.len(), (result.width * result.height * 3) as usize);
        }

        /// Property: an in-bounds crop keeps the requested size and origin pixel.
        #[test]
        fn prop_in_bounds_crop_is_exact(
            (width, height) in (2u32..=64, 2u32..=64),
            fx in 0.0f64..1.0,
            fy in 0.0f64..1.0,
        ) {
            let img = create_test_image(width, height);
            let x = ((width - 1) as f64 * fx) as u32;
            let y = ((height - 1) as f64 * fy) as u32;
            let rect = ImageRect::new(x, y, width - x, height - y);

            let result = crop_pixels(&img, rect);
            prop_assert_eq!((result.width, result.height), (rect.width, rect.height));
            prop_assert_eq!(result.pixels[0], ((y * width + x) % 256) as u8);
        }
    }
}
