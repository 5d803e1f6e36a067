//! Edit session controller.
//!
//! A session owns the geometry of one source image, its transform and crop
//! state, and a two-state mode machine:
//!
//! ```text
//!            enter_crop
//!   view  ------------->  crop
//!    |    <-------------   |
//!    |     done / cancel   |
//!    |                     +-- pan, pinch, resize, rotate, aspect, reset
//!    +-- save   -> Effect::Export(plan)
//!    +-- cancel -> Effect::Close (discarded)
//! ```
//!
//! Gestures and crop toolbar controls are only accepted in crop mode; in view
//! mode they are no-ops. Export reads the committed transform, never the
//! active one, so the saved image matches what the user last confirmed.
//!
//! Between `Effect::Export` and [`EditSession::finish_save`] the session is
//! saving and drops every event.

mod events;

pub use events::{Effect, EditorEvent, PanTarget, SessionEnd};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::EditorConfig;
use crate::crop::{AspectRatio, CropRegion};
use crate::export::{AssetStore, ExportInvoker, ExportPlan, SaveOutcome};
use crate::geometry::{to_image_space, CropRect, DisplayMapping, ImageGeometry, ViewportGeometry};
use crate::manipulate::{ImageManipulator, SaveOptions};
use crate::transform::{Transform, TransformState};

/// Session mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditMode {
    /// Reviewing the result. Initial state.
    #[default]
    View,
    /// Adjusting crop and transform.
    Crop,
}

/// Gesture in progress.
///
/// Pans remember the last cumulative translation seen. Pinches remember the
/// scale at pinch-start, so the result is `start_scale * cumulative` clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Pan {
        target: PanTarget,
        last_x: f64,
        last_y: f64,
    },
    Pinch {
        start_scale: f64,
    },
}

/// State of one editor invocation, from open to save or discard.
#[derive(Debug, Clone)]
pub struct EditSession {
    source_uri: String,
    image: ImageGeometry,
    viewport: ViewportGeometry,
    mapping: DisplayMapping,
    mode: EditMode,
    transform: TransformState,
    crop: CropRegion,
    /// Crop rectangle when crop mode was entered; restored on cancel.
    crop_checkpoint: CropRect,
    gesture: Option<Gesture>,
    options: SaveOptions,
    /// Set between `Effect::Export` and `finish_save`; events are dropped meanwhile.
    saving: bool,
    ended: Option<SessionEnd>,
}

impl EditSession {
    /// Open a session on `source_uri`.
    ///
    /// The crop rectangle starts out covering the displayed image.
    pub fn new(
        source_uri: impl Into<String>,
        image: ImageGeometry,
        viewport: ViewportGeometry,
        config: &EditorConfig,
    ) -> Self {
        let config = config.clone().validated();
        let mapping = DisplayMapping::contain(image, viewport);
        let initial = if image.is_empty() {
            viewport.bounds()
        } else {
            mapping.displayed_rect(image)
        };
        let crop = CropRegion::new(initial, viewport, config.min_crop_size);
        let source_uri = source_uri.into();

        debug!(
            source = %source_uri,
            width = image.width,
            height = image.height,
            scale = mapping.scale,
            "Edit session opened"
        );

        Self {
            source_uri,
            image,
            viewport,
            mapping,
            mode: EditMode::View,
            transform: TransformState::new(config.min_scale, config.max_scale),
            crop_checkpoint: crop.rect(),
            crop,
            gesture: None,
            options: config.output,
            saving: false,
            ended: None,
        }
    }

    pub fn source_uri(&self) -> &str {
        &self.source_uri
    }

    pub fn image(&self) -> ImageGeometry {
        self.image
    }

    pub fn viewport(&self) -> ViewportGeometry {
        self.viewport
    }

    pub fn mapping(&self) -> DisplayMapping {
        self.mapping
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn active_transform(&self) -> Transform {
        self.transform.active()
    }

    pub fn committed_transform(&self) -> Transform {
        self.transform.committed()
    }

    pub fn crop_rect(&self) -> CropRect {
        self.crop.rect()
    }

    pub fn save_options(&self) -> SaveOptions {
        self.options
    }

    /// Where the image is drawn under the active transform.
    pub fn image_display_rect(&self) -> CropRect {
        self.mapping
            .transformed_rect(self.image, self.transform.active())
    }

    /// How the session ended, or `None` while it is still open.
    pub fn end(&self) -> Option<&SessionEnd> {
        self.ended.as_ref()
    }

    pub fn is_ended(&self) -> bool {
        self.ended.is_some()
    }

    /// True while an export handed out by [`Effect::Export`] awaits `finish_save`.
    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Image-space parameters for exporting the committed state.
    pub fn export_plan(&self) -> ExportPlan {
        let committed = self.transform.committed();
        ExportPlan {
            source_uri: self.source_uri.clone(),
            crop: to_image_space(self.crop.rect(), self.image, self.mapping, committed),
            rotation: committed.rotation,
            options: self.options,
        }
    }

    /// Apply one input event.
    ///
    /// Events that are not legal in the current mode, events arriving while a
    /// save is in flight, and every event after the session ended return
    /// [`Effect::None`].
    pub fn handle(&mut self, event: EditorEvent) -> Effect {
        if self.ended.is_some() {
            return Effect::None;
        }
        if self.saving {
            debug!(?event, "Event ignored while saving");
            return Effect::None;
        }

        match (self.mode, event) {
            (EditMode::View, EditorEvent::EnterCrop) => self.enter_crop(),
            (EditMode::View, EditorEvent::Save) => self.request_save(),
            (EditMode::View, EditorEvent::Cancel) => self.discard(),
            (EditMode::Crop, EditorEvent::CancelCrop) => self.cancel_crop(),
            (EditMode::Crop, EditorEvent::DoneCrop) => self.done_crop(),
            (EditMode::Crop, EditorEvent::PanStart { target }) => self.pan_start(target),
            (
                EditMode::Crop,
                EditorEvent::PanDelta {
                    translation_x,
                    translation_y,
                },
            ) => self.pan_delta(translation_x, translation_y),
            (EditMode::Crop, EditorEvent::PanEnd) => self.pan_end(),
            (EditMode::Crop, EditorEvent::PinchStart) => self.pinch_start(),
            (EditMode::Crop, EditorEvent::PinchDelta { scale }) => self.pinch_delta(scale),
            (EditMode::Crop, EditorEvent::PinchEnd) => self.pinch_end(),
            (EditMode::Crop, EditorEvent::RotatePressed) => {
                self.transform.rotate90();
                Effect::Updated
            }
            (EditMode::Crop, EditorEvent::AspectRatioPressed { ratio }) => {
                self.apply_aspect_ratio(ratio)
            }
            (EditMode::Crop, EditorEvent::ResetPressed) => self.reset(),
            (mode, event) => {
                debug!(?mode, ?event, "Event ignored in current mode");
                Effect::None
            }
        }
    }

    /// Report the outcome of an export started from [`Effect::Export`].
    ///
    /// Success ends the session. Failure leaves it open in view mode so the
    /// user can retry. Either way the session accepts events again.
    pub fn finish_save(&mut self, outcome: &SaveOutcome) -> Effect {
        self.saving = false;
        if self.ended.is_some() {
            return Effect::None;
        }
        match outcome {
            SaveOutcome::Saved { asset } => {
                info!(source = %self.source_uri, asset = %asset.id, "Edit session saved");
                self.ended = Some(SessionEnd::Saved {
                    asset: asset.clone(),
                });
                Effect::Close
            }
            SaveOutcome::Failed { message } => {
                warn!(source = %self.source_uri, %message, "Save failed, session stays open");
                Effect::Updated
            }
            SaveOutcome::Skipped => Effect::None,
        }
    }

    /// Handle a save request end to end with `invoker`.
    ///
    /// Returns [`SaveOutcome::Skipped`] when saving is not legal right now
    /// (crop mode, or the session already ended).
    pub async fn save<M, S>(&mut self, invoker: &ExportInvoker<M, S>) -> SaveOutcome
    where
        M: ImageManipulator,
        S: AssetStore,
    {
        let Effect::Export(plan) = self.handle(EditorEvent::Save) else {
            return SaveOutcome::Skipped;
        };
        let outcome = invoker.save(&plan).await;
        self.finish_save(&outcome);
        outcome
    }

    fn enter_crop(&mut self) -> Effect {
        self.mode = EditMode::Crop;
        self.crop_checkpoint = self.crop.rect();
        debug!("Entered crop mode");
        Effect::Updated
    }

    fn cancel_crop(&mut self) -> Effect {
        self.abort_gesture();
        self.transform.reset_to_committed();
        self.crop.set_rect(self.crop_checkpoint);
        self.mode = EditMode::View;
        debug!("Crop cancelled");
        Effect::Updated
    }

    fn done_crop(&mut self) -> Effect {
        self.abort_gesture();
        self.transform.commit();
        self.crop_checkpoint = self.crop.rect();
        self.mode = EditMode::View;
        debug!(crop = ?self.crop.rect(), "Crop confirmed");
        Effect::Updated
    }

    fn reset(&mut self) -> Effect {
        self.abort_gesture();
        self.transform.reset_to_committed();
        self.crop.set_rect(self.crop_checkpoint);
        Effect::Updated
    }

    fn request_save(&mut self) -> Effect {
        if self.image.is_empty() {
            warn!(source = %self.source_uri, "Save requested before the image was measured");
            return Effect::None;
        }
        self.saving = true;
        Effect::Export(self.export_plan())
    }

    fn discard(&mut self) -> Effect {
        info!(source = %self.source_uri, "Edit session discarded");
        self.ended = Some(SessionEnd::Discarded);
        Effect::Close
    }

    fn pan_start(&mut self, target: PanTarget) -> Effect {
        self.abort_gesture();
        if target == PanTarget::CropHandle {
            self.crop.begin_resize();
        }
        self.gesture = Some(Gesture::Pan {
            target,
            last_x: 0.0,
            last_y: 0.0,
        });
        Effect::None
    }

    fn pan_delta(&mut self, x: f64, y: f64) -> Effect {
        let Some(Gesture::Pan {
            target,
            last_x,
            last_y,
        }) = self.gesture
        else {
            return Effect::None;
        };
        if !(x.is_finite() && y.is_finite()) {
            return Effect::None;
        }

        match target {
            PanTarget::Image => self.transform.apply_pan(x - last_x, y - last_y),
            PanTarget::CropHandle => self.crop.update_resize(x, y),
        }
        self.gesture = Some(Gesture::Pan {
            target,
            last_x: x,
            last_y: y,
        });
        Effect::Updated
    }

    fn pan_end(&mut self) -> Effect {
        match self.gesture.take() {
            Some(Gesture::Pan {
                target: PanTarget::CropHandle,
                ..
            }) => {
                self.crop.end_resize();
                Effect::Updated
            }
            Some(Gesture::Pan { .. }) => Effect::Updated,
            other => {
                self.gesture = other;
                Effect::None
            }
        }
    }

    fn pinch_start(&mut self) -> Effect {
        self.abort_gesture();
        self.gesture = Some(Gesture::Pinch {
            start_scale: self.transform.active().scale,
        });
        Effect::None
    }

    fn pinch_delta(&mut self, scale: f64) -> Effect {
        let Some(Gesture::Pinch { start_scale }) = self.gesture else {
            return Effect::None;
        };
        if !scale.is_finite() || scale <= 0.0 {
            return Effect::None;
        }

        self.transform.set_scale(start_scale * scale);
        Effect::Updated
    }

    fn pinch_end(&mut self) -> Effect {
        if matches!(self.gesture, Some(Gesture::Pinch { .. })) {
            self.gesture = None;
            Effect::Updated
        } else {
            Effect::None
        }
    }

    fn apply_aspect_ratio(&mut self, ratio: AspectRatio) -> Effect {
        self.abort_gesture();
        let transition = self.crop.apply_aspect_ratio(ratio);
        if transition.is_noop() {
            Effect::None
        } else {
            Effect::Animate(transition)
        }
    }

    /// Drop any half-finished gesture, closing an open resize.
    fn abort_gesture(&mut self) {
        if let Some(Gesture::Pan {
            target: PanTarget::CropHandle,
            ..
        }) = self.gesture.take()
        {
            self.crop.end_resize();
        }
    }
}
