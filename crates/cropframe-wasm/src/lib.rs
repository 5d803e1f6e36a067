//! Cropframe WASM - WebAssembly bindings for Cropframe
//!
//! This crate exposes the cropframe-core edit session and geometry mapper to
//! JavaScript/TypeScript applications.
//!
//! # Module Structure
//!
//! - `session` - Interactive crop/rotate session (`JsEditSession`)
//! - `export` - Single-flight exporter over host callbacks (`JsExporter`)
//! - `geometry` - Stateless display/image coordinate conversion
//! - `source` - Image dimension probing
//! - `types` - WASM-compatible wrapper types for geometry values
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsEditSession, JsExporter, probe_image_geometry } from '@cropframe/wasm';
//!
//! await init();
//!
//! const geometry = probe_image_geometry(bytes);
//! const session = new JsEditSession(uri, geometry.width, geometry.height, 390, 700);
//! const exporter = new JsExporter(manipulate, persist);
//! ```

use wasm_bindgen::prelude::*;

mod export;
mod geometry;
mod session;
mod source;
mod types;

// Re-export public types
pub use export::JsExporter;
pub use geometry::{clamp_crop_rect, displayed_image_rect, to_image_space};
pub use session::{JsEditSession, JsPanTarget};
pub use source::probe_image_geometry;
pub use types::{JsCropRect, JsCropTransition, JsImageGeometry, JsImageRect, JsTransform};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "Cropframe WASM loaded");
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
