//! Input events accepted by an edit session and the effects it reports back.

use serde::{Deserialize, Serialize};

use crate::crop::{AspectRatio, CropTransition};
use crate::export::{AssetHandle, ExportPlan};

/// What a pan gesture drags, decided when the gesture starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PanTarget {
    /// Pan the image under the crop rectangle.
    Image,
    /// Resize the crop rectangle from its bottom-right handle.
    CropHandle,
}

/// Discrete input delivered by the host's gesture and button handlers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum EditorEvent {
    PanStart { target: PanTarget },
    /// Cumulative translation since `PanStart`, in display units.
    PanDelta { translation_x: f64, translation_y: f64 },
    PanEnd,
    PinchStart,
    /// Cumulative scale since `PinchStart` (1.0 = unchanged).
    PinchDelta { scale: f64 },
    PinchEnd,
    RotatePressed,
    AspectRatioPressed { ratio: AspectRatio },
    ResetPressed,
    EnterCrop,
    CancelCrop,
    DoneCrop,
    Save,
    Cancel,
}

/// What the host should do after an event was handled.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Nothing changed.
    None,
    /// Session state changed; redraw.
    Updated,
    /// The crop rectangle snapped; the host may animate between the endpoints.
    Animate(CropTransition),
    /// Run this export, then report the outcome with `finish_save`.
    Export(ExportPlan),
    /// The session ended; close the editor.
    Close,
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SessionEnd {
    Saved { asset: AssetHandle },
    Discarded,
}
