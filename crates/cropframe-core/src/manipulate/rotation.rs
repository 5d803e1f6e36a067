//! Lossless quarter-turn rotation.
//!
//! Rotation snaps to the nearest multiple of 90 degrees, so every output pixel
//! maps to exactly one source pixel and no interpolation is needed.
//!
//! For a clockwise quarter turn of a `W x H` image the output is `H x W` and
//! source pixel `(sx, sy)` lands at `(H - 1 - sy, sx)`.

use crate::decode::DecodedImage;
use crate::geometry::quarter_turns;

/// Rotate `image` clockwise by `degrees`, snapped to quarter turns.
pub fn rotate_quarter_turns(image: &DecodedImage, degrees: f64) -> DecodedImage {
    let turns = quarter_turns(degrees);
    if turns == 0 || image.is_empty() {
        return image.clone();
    }

    let (src_w, src_h) = (image.width as usize, image.height as usize);
    let (out_w, out_h) = if turns % 2 == 1 {
        (src_h, src_w)
    } else {
        (src_w, src_h)
    };

    let mut output = vec![0u8; out_w * out_h * 3];
    for dy in 0..out_h {
        for dx in 0..out_w {
            // Inverse mapping: find the source pixel for each destination pixel
            let (sx, sy) = match turns {
                1 => (dy, src_h - 1 - dx),
                2 => (src_w - 1 - dx, src_h - 1 - dy),
                _ => (src_w - 1 - dy, dx),
            };
            let src = (sy * src_w + sx) * 3;
            let dst = (dy * out_w + dx) * 3;
            output[dst..dst + 3].copy_from_slice(&image.pixels[src..src + 3]);
        }
    }

    DecodedImage::new(out_w as u32, out_h as u32, output)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
