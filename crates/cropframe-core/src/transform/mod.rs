//! User transform applied on top of the contain-fitted image.
//!
//! Two [`Transform`] values live side by side in a [`TransformState`]:
//!
//! - **active**: driven live by pan and pinch gestures
//! - **committed**: the last state the user confirmed with "done"
//!
//! Export always reads the committed value. Cancelling a crop edit copies the
//! committed value back over the active one.
//!
//! # Coordinate System
//!
//! - Translation is in display units, relative to the viewport center
//! - Scale is a zoom factor about the image center, 1.0 = contain fit
//! - Rotation is in degrees clockwise, normalized to `[0, 360)`

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geometry::normalize_rotation;

/// Default lower zoom bound.
pub const DEFAULT_MIN_SCALE: f64 = 0.5;
/// Default upper zoom bound.
pub const DEFAULT_MAX_SCALE: f64 = 3.0;

/// Pan, zoom and rotation of the displayed image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    pub rotation: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        scale: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
        rotation: 0.0,
    };

    /// Check if this transform leaves the contain-fitted image untouched.
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

/// Active and committed transforms for one edit session.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformState {
    active: Transform,
    committed: Transform,
    min_scale: f64,
    max_scale: f64,
}

impl Default for TransformState {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_SCALE, DEFAULT_MAX_SCALE)
    }
}

impl TransformState {
    /// Create an identity state with the given zoom range.
    ///
    /// Inverted bounds are swapped. The identity scale is clamped into the
    /// range so that `active` starts out valid.
    pub fn new(min_scale: f64, max_scale: f64) -> Self {
        let (min_scale, max_scale) = if min_scale <= max_scale {
            (min_scale, max_scale)
        } else {
            (max_scale, min_scale)
        };
        let mut initial = Transform::IDENTITY;
        initial.scale = initial.scale.clamp(min_scale, max_scale);
        Self {
            active: initial,
            committed: initial,
            min_scale,
            max_scale,
        }
    }

    pub fn active(&self) -> Transform {
        self.active
    }

    pub fn committed(&self) -> Transform {
        self.committed
    }

    pub fn scale_range(&self) -> (f64, f64) {
        (self.min_scale, self.max_scale)
    }

    /// Returns true if the active transform differs from the committed one.
    pub fn has_pending_changes(&self) -> bool {
        self.active != self.committed
    }

    /// Translate the active transform by a display-space delta.
    pub fn apply_pan(&mut self, dx: f64, dy: f64) {
        if dx.is_finite() {
            self.active.translate_x += dx;
        }
        if dy.is_finite() {
            self.active.translate_y += dy;
        }
    }

    /// Multiply the active scale by `factor`, clamped to the zoom range.
    ///
    /// Non-finite or non-positive factors are ignored.
    pub fn apply_pinch(&mut self, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        self.set_scale(self.active.scale * factor);
    }

    /// Set the active scale directly, clamped to the zoom range.
    ///
    /// Non-finite or non-positive values are ignored.
    pub fn set_scale(&mut self, scale: f64) {
        if !scale.is_finite() || scale <= 0.0 {
            return;
        }
        self.active.scale = scale.clamp(self.min_scale, self.max_scale);
    }

    /// Rotate a quarter turn clockwise.
    ///
    /// Rotation is a direct edit: the new angle is written into both the
    /// active and the committed transform, so cancelling a crop edit keeps it.
    pub fn rotate90(&mut self) {
        let rotation = normalize_rotation(self.active.rotation + 90.0);
        self.active.rotation = rotation;
        self.committed.rotation = rotation;
        debug!(rotation, "Rotated a quarter turn");
    }

    /// Copy the active transform into the committed slot.
    pub fn commit(&mut self) {
        self.committed = self.active;
        debug!(transform = ?self.committed, "Transform committed");
    }

    /// Copy the committed transform back over the active one.
    pub fn reset_to_committed(&mut self) {
        self.active = self.committed;
        debug!(transform = ?self.active, "Transform reset to committed");
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
