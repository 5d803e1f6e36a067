//! In-process manipulator backed by an in-memory resource table.
//!
//! Resources are addressed by URI. Hosts insert the encoded source bytes
//! under a URI of their choosing; manipulated results are stored under
//! `memory://manipulated/{n}.{ext}`.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use tracing::debug;

use super::{
    crop_pixels, rotate_quarter_turns, ImageManipulator, ManipulatedImage, ManipulationError,
    ManipulationOp, SaveOptions,
};
use crate::decode::decode_image;
use crate::encode::encode_image;

/// Reference [`ImageManipulator`] that decodes, transforms and re-encodes on the CPU.
#[derive(Debug, Default)]
pub struct PixelManipulator {
    resources: RefCell<HashMap<String, Vec<u8>>>,
    next_id: Cell<u64>,
}

impl PixelManipulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register encoded image bytes under `uri`, replacing any previous entry.
    pub fn insert(&self, uri: impl Into<String>, bytes: Vec<u8>) {
        self.resources.borrow_mut().insert(uri.into(), bytes);
    }

    /// Encoded bytes stored under `uri`, if any.
    pub fn get(&self, uri: &str) -> Option<Vec<u8>> {
        self.resources.borrow().get(uri).cloned()
    }

    /// Take the bytes stored under `uri` out of the table.
    ///
    /// Hosts call this once a result has been persisted; nothing else frees entries.
    pub fn remove(&self, uri: &str) -> Option<Vec<u8>> {
        self.resources.borrow_mut().remove(uri)
    }

    pub fn len(&self) -> usize {
        self.resources.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.borrow().is_empty()
    }

    fn allocate_uri(&self, options: SaveOptions) -> String {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        format!("memory://manipulated/{id}.{}", options.format.extension())
    }
}

impl ImageManipulator for PixelManipulator {
    async fn manipulate(
        &self,
        uri: &str,
        ops: &[ManipulationOp],
        options: SaveOptions,
    ) -> Result<ManipulatedImage, ManipulationError> {
        let bytes = self
            .get(uri)
            .ok_or_else(|| ManipulationError::UnknownResource(uri.to_string()))?;

        let mut image = decode_image(&bytes)?;
        for op in ops {
            image = match *op {
                ManipulationOp::Rotate(degrees) => rotate_quarter_turns(&image, degrees),
                ManipulationOp::Crop(rect) => crop_pixels(&image, rect),
            };
        }

        let encoded = encode_image(&image, options)?;
        let output_uri = self.allocate_uri(options);
        debug!(
            source = uri,
            output = %output_uri,
            width = image.width,
            height = image.height,
            "Image manipulated"
        );
        self.insert(output_uri.clone(), encoded);

        Ok(ManipulatedImage {
            uri: output_uri,
            width: image.width,
            height: image.height,
        })
    }
}
