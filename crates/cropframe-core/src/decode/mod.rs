//! Image decoding for the image source and the reference manipulator.
//!
//! This module provides functionality for:
//! - Decoding JPEG and PNG bytes to RGB pixels
//! - Reading header dimensions and EXIF orientation without a full decode
//!
//! # Architecture
//!
//! All operations are synchronous and single-threaded, so they run unchanged
//! inside WASM.

mod reader;
mod types;

pub use reader::{decode_image, read_dimensions, read_orientation};
pub use types::{DecodeError, DecodedImage, Orientation};
