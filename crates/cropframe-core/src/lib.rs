//! Cropframe Core - crop and rotate geometry engine
//!
//! This crate maps crop gestures drawn over a contain-fitted image back into
//! the original image's pixel space, manages the interactive edit session that
//! produces them, and runs the resulting export through a pluggable
//! image-manipulation primitive and asset store.

pub mod config;
pub mod crop;
pub mod decode;
pub mod encode;
pub mod export;
pub mod geometry;
pub mod manipulate;
pub mod session;
pub mod source;
pub mod transform;

pub use config::{ConfigError, EditorConfig};
pub use crop::{AspectRatio, CropRegion, CropTransition};
pub use export::{
    AssetHandle, AssetStore, ExportError, ExportInvoker, ExportPlan, PersistenceError, SaveOutcome,
};
pub use geometry::{
    clamp_crop_rect, to_image_space, CropRect, DisplayMapping, ImageGeometry, ImageRect,
    ViewportGeometry,
};
pub use manipulate::{
    ImageManipulator, ManipulatedImage, ManipulationError, ManipulationOp, OutputFormat,
    PixelManipulator, SaveOptions,
};
pub use session::{Effect, EditMode, EditSession, EditorEvent, PanTarget, SessionEnd};
pub use source::{probe_geometry, ImageSource};
pub use transform::{Transform, TransformState};
