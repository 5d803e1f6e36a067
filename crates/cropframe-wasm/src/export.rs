//! Export bridge: runs the single-flight export against JavaScript callbacks.
//!
//! The host supplies two async functions:
//!
//! - `manipulate(uri, ops, options)` resolves to `{ uri, width, height }`
//! - `persist(uri)` resolves to `{ id, uri }`
//!
//! `ops` is the ordered request, e.g.
//! `[{ rotate: 90 }, { crop: { originX, originY, width, height } }]`.
//!
//! # Example
//!
//! ```typescript
//! const exporter = new JsExporter(
//!   (uri, ops, options) => ImageManipulator.manipulateAsync(uri, ops, options),
//!   (uri) => MediaLibrary.createAssetAsync(uri),
//! );
//! const outcome = await session.save(exporter);
//! if (outcome.status === 'saved') gallery.unshift(outcome.asset);
//! ```

use std::rc::Rc;

use cropframe_core::export::{AssetHandle, AssetStore, ExportInvoker, PersistenceError};
use cropframe_core::manipulate::{
    ImageManipulator, ManipulatedImage, ManipulationError, ManipulationOp, SaveOptions,
};
use js_sys::{Function, Promise};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

/// Manipulation primitive backed by a JS function returning a promise.
pub(crate) struct JsManipulator {
    manipulate: Function,
}

impl ImageManipulator for JsManipulator {
    async fn manipulate(
        &self,
        uri: &str,
        ops: &[ManipulationOp],
        options: SaveOptions,
    ) -> Result<ManipulatedImage, ManipulationError> {
        let failed = |e: JsValue| ManipulationError::Failed(describe(&e));
        let ops = serde_wasm_bindgen::to_value(ops)
            .map_err(|e| ManipulationError::Failed(e.to_string()))?;
        let options = serde_wasm_bindgen::to_value(&options)
            .map_err(|e| ManipulationError::Failed(e.to_string()))?;

        let pending = self
            .manipulate
            .call3(&JsValue::NULL, &JsValue::from_str(uri), &ops, &options)
            .map_err(failed)?;
        let result = JsFuture::from(Promise::resolve(&pending))
            .await
            .map_err(failed)?;

        serde_wasm_bindgen::from_value(result).map_err(|e| {
            ManipulationError::Failed(format!("Unexpected manipulation result: {e}"))
        })
    }
}

/// Persistence collaborator backed by a JS function returning a promise.
pub(crate) struct JsAssetStore {
    persist: Function,
}

impl AssetStore for JsAssetStore {
    async fn persist(&self, uri: &str) -> Result<AssetHandle, PersistenceError> {
        let failed = |e: JsValue| PersistenceError(describe(&e));
        let pending = self
            .persist
            .call1(&JsValue::NULL, &JsValue::from_str(uri))
            .map_err(failed)?;
        let result = JsFuture::from(Promise::resolve(&pending))
            .await
            .map_err(failed)?;

        serde_wasm_bindgen::from_value(result)
            .map_err(|e| PersistenceError(format!("Unexpected asset handle: {e}")))
    }
}

/// Best-effort text for a rejected promise or thrown value.
fn describe(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    format!("{value:?}")
}

pub(crate) type JsInvoker = ExportInvoker<JsManipulator, JsAssetStore>;

/// Single-flight exporter shared by the sessions of one editor screen.
#[wasm_bindgen]
pub struct JsExporter {
    invoker: Rc<JsInvoker>,
}

#[wasm_bindgen]
impl JsExporter {
    /// Create an exporter from the host's manipulate and persist functions.
    #[wasm_bindgen(constructor)]
    pub fn new(manipulate: Function, persist: Function) -> JsExporter {
        Self {
            invoker: Rc::new(ExportInvoker::new(
                JsManipulator { manipulate },
                JsAssetStore { persist },
            )),
        }
    }

    /// True while a save is in flight. Save controls should be disabled meanwhile.
    #[wasm_bindgen(getter)]
    pub fn is_processing(&self) -> bool {
        self.invoker.is_processing()
    }
}

impl JsExporter {
    pub(crate) fn invoker(&self) -> Rc<JsInvoker> {
        Rc::clone(&self.invoker)
    }
}

/// WASM-specific tests that require JS functions and promises.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use cropframe_core::export::{ExportPlan, SaveOutcome};
    use cropframe_core::geometry::ImageRect;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn resolving_manipulate() -> Function {
        Function::new_with_args(
            "uri, ops, options",
            "return Promise.resolve({ uri: 'file:///edited.jpg', width: ops.length, height: 1 });",
        )
    }

    fn resolving_persist() -> Function {
        Function::new_with_args("uri", "return Promise.resolve({ id: 'asset-1', uri: uri });")
    }

    fn plan(rotation: f64) -> ExportPlan {
        ExportPlan {
            source_uri: "file:///photo.jpg".to_string(),
            crop: ImageRect::new(0, 0, 10, 10),
            rotation,
            options: SaveOptions::default(),
        }
    }

    #[wasm_bindgen_test]
    async fn test_save_through_js_callbacks() {
        let exporter = JsExporter::new(resolving_manipulate(), resolving_persist());
        let outcome = exporter.invoker().save(&plan(90.0)).await;
        let SaveOutcome::Saved { asset } = outcome else {
            panic!("expected saved outcome");
        };
        assert_eq!(asset.id, "asset-1");
        assert_eq!(asset.uri, "file:///edited.jpg");
        assert!(!exporter.is_processing());
    }

    #[wasm_bindgen_test]
    async fn test_rejected_manipulation_fails() {
        let manipulate =
            Function::new_with_args("uri, ops, options", "return Promise.reject(new Error('nope'));");
        let exporter = JsExporter::new(manipulate, resolving_persist());
        let outcome = exporter.invoker().save(&plan(0.0)).await;
        assert!(matches!(outcome, SaveOutcome::Failed { .. }));
    }

    #[wasm_bindgen_test]
    async fn test_malformed_asset_handle_fails() {
        let persist = Function::new_with_args("uri", "return 42;");
        let exporter = JsExporter::new(resolving_manipulate(), persist);
        let outcome = exporter.invoker().save(&plan(0.0)).await;
        assert!(matches!(outcome, SaveOutcome::Failed { .. }));
    }
}
