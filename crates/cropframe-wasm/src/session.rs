//! Edit session WASM bindings.
//!
//! `JsEditSession` wraps the core controller. Gesture methods return `true`
//! when the session changed and the host should redraw.
//!
//! # Example
//!
//! ```typescript
//! const session = new JsEditSession(uri, 3024, 4032, 390, 700, { minCropSize: 32 });
//! session.enter_crop();
//! session.pan_start(JsPanTarget.Image);
//! session.pan_delta(event.translationX, event.translationY);
//! session.pan_end();
//! const transition = session.set_aspect_ratio(1, 1);
//! session.done_crop();
//! const outcome = await session.save(exporter);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use cropframe_core::config::EditorConfig;
use cropframe_core::crop::AspectRatio;
use cropframe_core::export::SaveOutcome;
use cropframe_core::geometry::{ImageGeometry, ViewportGeometry};
use cropframe_core::session::{Effect, EditMode, EditSession, EditorEvent, PanTarget};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use crate::export::JsExporter;
use crate::types::{JsCropRect, JsCropTransition, JsTransform};

/// What a pan gesture drags.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsPanTarget {
    Image = 0,
    CropHandle = 1,
}

impl From<JsPanTarget> for PanTarget {
    fn from(value: JsPanTarget) -> Self {
        match value {
            JsPanTarget::Image => PanTarget::Image,
            JsPanTarget::CropHandle => PanTarget::CropHandle,
        }
    }
}

/// An interactive crop/rotate session over one image.
#[wasm_bindgen]
pub struct JsEditSession {
    inner: Rc<RefCell<EditSession>>,
}

#[wasm_bindgen]
impl JsEditSession {
    /// Open a session.
    ///
    /// `config` is an optional plain object with `minScale`, `maxScale`,
    /// `minCropSize` and `output: { format, quality }`; missing keys use defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(
        source_uri: String,
        image_width: u32,
        image_height: u32,
        viewport_width: f64,
        viewport_height: f64,
        config: JsValue,
    ) -> Result<JsEditSession, JsValue> {
        let config = if config.is_undefined() || config.is_null() {
            EditorConfig::default()
        } else {
            serde_wasm_bindgen::from_value::<EditorConfig>(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid editor config: {e}")))?
        };
        Ok(Self::with_config(
            source_uri,
            ImageGeometry::new(image_width, image_height),
            ViewportGeometry::new(viewport_width, viewport_height),
            &config,
        ))
    }

    /// Current mode: `"view"` or `"crop"`.
    #[wasm_bindgen(getter)]
    pub fn mode(&self) -> String {
        match self.inner.borrow().mode() {
            EditMode::View => "view".to_string(),
            EditMode::Crop => "crop".to_string(),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn crop_rect(&self) -> JsCropRect {
        JsCropRect::from_rect(self.inner.borrow().crop_rect())
    }

    /// Where to draw the image under the active transform.
    #[wasm_bindgen(getter)]
    pub fn image_rect(&self) -> JsCropRect {
        JsCropRect::from_rect(self.inner.borrow().image_display_rect())
    }

    #[wasm_bindgen(getter)]
    pub fn active_transform(&self) -> JsTransform {
        JsTransform::from_transform(self.inner.borrow().active_transform())
    }

    #[wasm_bindgen(getter)]
    pub fn committed_transform(&self) -> JsTransform {
        JsTransform::from_transform(self.inner.borrow().committed_transform())
    }

    /// True while a save started by `save` is running.
    #[wasm_bindgen(getter)]
    pub fn is_saving(&self) -> bool {
        self.inner.borrow().is_saving()
    }

    /// True once the session was saved or discarded.
    #[wasm_bindgen(getter)]
    pub fn is_ended(&self) -> bool {
        self.inner.borrow().is_ended()
    }

    pub fn enter_crop(&self) -> bool {
        self.dispatch(EditorEvent::EnterCrop)
    }

    pub fn cancel_crop(&self) -> bool {
        self.dispatch(EditorEvent::CancelCrop)
    }

    pub fn done_crop(&self) -> bool {
        self.dispatch(EditorEvent::DoneCrop)
    }

    pub fn pan_start(&self, target: JsPanTarget) -> bool {
        self.dispatch(EditorEvent::PanStart {
            target: target.into(),
        })
    }

    /// Cumulative translation since `pan_start`.
    pub fn pan_delta(&self, translation_x: f64, translation_y: f64) -> bool {
        self.dispatch(EditorEvent::PanDelta {
            translation_x,
            translation_y,
        })
    }

    pub fn pan_end(&self) -> bool {
        self.dispatch(EditorEvent::PanEnd)
    }

    pub fn pinch_start(&self) -> bool {
        self.dispatch(EditorEvent::PinchStart)
    }

    /// Cumulative scale since `pinch_start`.
    pub fn pinch_delta(&self, scale: f64) -> bool {
        self.dispatch(EditorEvent::PinchDelta { scale })
    }

    pub fn pinch_end(&self) -> bool {
        self.dispatch(EditorEvent::PinchEnd)
    }

    pub fn rotate(&self) -> bool {
        self.dispatch(EditorEvent::RotatePressed)
    }

    pub fn reset(&self) -> bool {
        self.dispatch(EditorEvent::ResetPressed)
    }

    /// Snap the crop to `width:height`. Returns the transition to animate, if any.
    pub fn set_aspect_ratio(&self, width: f64, height: f64) -> Option<JsCropTransition> {
        let ratio = AspectRatio::new(width, height);
        match self.handle(EditorEvent::AspectRatioPressed { ratio }) {
            Effect::Animate(transition) => Some(JsCropTransition::from_transition(transition)),
            _ => None,
        }
    }

    /// Discard the session. Returns true if it closed.
    pub fn cancel(&self) -> bool {
        self.handle(EditorEvent::Cancel) == Effect::Close
    }

    /// The export request the committed state would produce, as a plain object.
    pub fn export_plan(&self) -> Result<JsValue, JsValue> {
        let plan = self.inner.borrow().export_plan();
        serde_wasm_bindgen::to_value(&plan).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Save through `exporter`.
    ///
    /// Resolves to `{ status: "saved", asset }`, `{ status: "skipped" }` or
    /// `{ status: "failed", message }`. Never rejects for export failures.
    pub fn save(&self, exporter: &JsExporter) -> js_sys::Promise {
        // Requested eagerly so the session drops events from here until finish_save
        let effect = self.handle(EditorEvent::Save);
        let session = Rc::clone(&self.inner);
        let invoker = exporter.invoker();

        future_to_promise(async move {
            let outcome = match effect {
                Effect::Export(plan) => {
                    let outcome = invoker.save(&plan).await;
                    session.borrow_mut().finish_save(&outcome);
                    outcome
                }
                _ => SaveOutcome::Skipped,
            };

            if let SaveOutcome::Failed { message } = &outcome {
                web_sys::console::warn_1(&JsValue::from_str(message));
            }
            serde_wasm_bindgen::to_value(&outcome).map_err(|e| JsValue::from_str(&e.to_string()))
        })
    }
}

impl JsEditSession {
    pub(crate) fn with_config(
        source_uri: String,
        image: ImageGeometry,
        viewport: ViewportGeometry,
        config: &EditorConfig,
    ) -> Self {
        Self {
            inner: Rc::new(RefCell::new(EditSession::new(
                source_uri, image, viewport, config,
            ))),
        }
    }

    fn handle(&self, event: EditorEvent) -> Effect {
        self.inner.borrow_mut().handle(event)
    }

    fn dispatch(&self, event: EditorEvent) -> bool {
        self.handle(event) != Effect::None
    }
}
