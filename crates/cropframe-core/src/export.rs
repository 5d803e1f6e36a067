//! Single-flight export: manipulate the source image, then persist the result.
//!
//! An [`ExportPlan`] carries everything computed from committed session
//! state. [`ExportInvoker::save`] turns it into an ordered manipulation
//! request, awaits the manipulator and then the asset store, and reports a
//! [`SaveOutcome`]. A save requested while another is in flight is skipped.

use std::cell::Cell;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::geometry::{quarter_turns, ImageRect};
use crate::manipulate::{ImageManipulator, ManipulationError, ManipulationOp, SaveOptions};

/// Handle to a persisted asset, passed back up to the host (e.g. a gallery list).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetHandle {
    pub id: String,
    pub uri: String,
}

/// Failure reported by an [`AssetStore`].
#[derive(Debug, Error)]
#[error("Failed to persist image: {0}")]
pub struct PersistenceError(pub String);

/// Persists a manipulated image resource and returns its asset handle.
///
/// Implementations run on a single thread; the returned future need not be `Send`.
#[allow(async_fn_in_trait)]
pub trait AssetStore {
    async fn persist(&self, uri: &str) -> Result<AssetHandle, PersistenceError>;
}

/// Errors that can occur during an export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Manipulation(#[from] ManipulationError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl ExportError {
    /// Short message suitable for showing to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            ExportError::Manipulation(_) => "Could not edit the image. Please try again.",
            ExportError::Persistence(_) => "Could not save the edited image. Please try again.",
        }
    }
}

/// Image-space parameters for one export, built from committed session state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPlan {
    pub source_uri: String,
    /// Crop rectangle in the pixel grid of the rotated image.
    pub crop: ImageRect,
    /// Clockwise rotation in degrees, a multiple of 90.
    pub rotation: f64,
    pub options: SaveOptions,
}

impl ExportPlan {
    /// Ordered manipulation request: rotation first (when non-zero), then crop.
    pub fn ops(&self) -> Vec<ManipulationOp> {
        let mut ops = Vec::with_capacity(2);
        let turns = quarter_turns(self.rotation);
        if turns != 0 {
            ops.push(ManipulationOp::Rotate(turns as f64 * 90.0));
        }
        ops.push(ManipulationOp::Crop(self.crop));
        ops
    }
}

/// Result of [`ExportInvoker::save`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SaveOutcome {
    /// The edited image was persisted.
    Saved { asset: AssetHandle },
    /// Another save was already in flight; nothing was done.
    Skipped,
    /// The manipulator or the store failed. Nothing was persisted.
    Failed { message: String },
}

/// Clears the in-flight flag when the save finishes, whichever way it exits.
struct ProcessingGuard<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> ProcessingGuard<'a> {
    fn acquire(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            None
        } else {
            Some(Self { flag })
        }
    }
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

/// Runs exports against a manipulator and an asset store, one at a time.
#[derive(Debug)]
pub struct ExportInvoker<M, S> {
    manipulator: M,
    store: S,
    processing: Cell<bool>,
}

impl<M: ImageManipulator, S: AssetStore> ExportInvoker<M, S> {
    pub fn new(manipulator: M, store: S) -> Self {
        Self {
            manipulator,
            store,
            processing: Cell::new(false),
        }
    }

    /// Returns true while a save is in flight. Hosts disable save controls meanwhile.
    pub fn is_processing(&self) -> bool {
        self.processing.get()
    }

    pub fn manipulator(&self) -> &M {
        &self.manipulator
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run one export. Never returns an error: failures become [`SaveOutcome::Failed`].
    pub async fn save(&self, plan: &ExportPlan) -> SaveOutcome {
        let Some(_guard) = ProcessingGuard::acquire(&self.processing) else {
            debug!(source = %plan.source_uri, "Save already in flight, skipping");
            return SaveOutcome::Skipped;
        };

        info!(source = %plan.source_uri, crop = ?plan.crop, rotation = plan.rotation, "Export started");
        match self.run(plan).await {
            Ok(asset) => {
                info!(asset = %asset.id, "Export finished");
                SaveOutcome::Saved { asset }
            }
            Err(err) => {
                error!(source = %plan.source_uri, error = %err, "Export failed");
                SaveOutcome::Failed {
                    message: err.user_message().to_string(),
                }
            }
        }
    }

    async fn run(&self, plan: &ExportPlan) -> Result<AssetHandle, ExportError> {
        let ops = plan.ops();
        let image = self
            .manipulator
            .manipulate(&plan.source_uri, &ops, plan.options)
            .await?;
        debug!(output = %image.uri, width = image.width, height = image.height, "Image manipulated");
        let asset = self.store.persist(&image.uri).await?;
        Ok(asset)
    }
}
