//! Geometry mapper: stateless conversion between display and image space.
//!
//! # Coordinate Systems
//!
//! - **Display space**: viewport units, origin at the viewport's top-left
//! - **Image space**: pixels of the original image, origin at its top-left
//!
//! The image is contain-fitted into the viewport (see [`DisplayMapping`]),
//! then the user's [`Transform`](crate::transform::Transform) is layered on
//! top. [`to_image_space`] undoes both so a crop drawn on screen can be handed
//! to the manipulation primitive in pixel coordinates.

mod mapping;
mod types;

pub use mapping::{clamp_crop_rect, to_image_space, DisplayMapping, DEFAULT_MIN_CROP_SIZE};
pub use types::{
    normalize_rotation, quarter_turns, CropRect, ImageGeometry, ImageRect, ViewportGeometry,
};
