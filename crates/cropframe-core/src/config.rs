//! Editor configuration.
//!
//! Every field has a default, so a host only needs to supply what it wants to
//! change. Configuration arrives either as TOML text or, through the WASM
//! bindings, as a plain JS object.
//!
//! ```toml
//! min_scale = 0.5
//! max_scale = 4.0
//! min_crop_size = 32.0
//!
//! [output]
//! format = "png"
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::geometry::DEFAULT_MIN_CROP_SIZE;
use crate::manipulate::SaveOptions;
use crate::transform::{DEFAULT_MAX_SCALE, DEFAULT_MIN_SCALE};

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML text could not be parsed into an `EditorConfig`.
    #[error("Invalid editor config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Tunables for an edit session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Lower zoom bound for pinch gestures.
    #[serde(alias = "min_scale")]
    pub min_scale: f64,
    /// Upper zoom bound for pinch gestures.
    #[serde(alias = "max_scale")]
    pub max_scale: f64,
    /// Minimum crop rectangle edge in display units.
    #[serde(alias = "min_crop_size")]
    pub min_crop_size: f64,
    /// Output format and quality passed to the manipulation primitive.
    pub output: SaveOptions,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
            min_crop_size: DEFAULT_MIN_CROP_SIZE,
            output: SaveOptions::default(),
        }
    }
}

impl EditorConfig {
    /// Parse a config from TOML text and normalize it.
    ///
    /// Keys may be written in snake_case or camelCase.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: EditorConfig = toml::from_str(text)?;
        Ok(config.validated())
    }

    /// Return a copy with out-of-range values repaired.
    ///
    /// Non-finite or non-positive numbers fall back to their defaults,
    /// inverted scale bounds are swapped and quality is clamped to 1-100.
    pub fn validated(mut self) -> Self {
        let defaults = Self::default();

        if !is_positive(self.min_scale) {
            warn!(value = self.min_scale, "Invalid min_scale, using default");
            self.min_scale = defaults.min_scale;
        }
        if !is_positive(self.max_scale) {
            warn!(value = self.max_scale, "Invalid max_scale, using default");
            self.max_scale = defaults.max_scale;
        }
        if self.min_scale > self.max_scale {
            warn!(
                min = self.min_scale,
                max = self.max_scale,
                "Scale bounds inverted, swapping"
            );
            std::mem::swap(&mut self.min_scale, &mut self.max_scale);
        }
        if !is_positive(self.min_crop_size) {
            warn!(value = self.min_crop_size, "Invalid min_crop_size, using default");
            self.min_crop_size = defaults.min_crop_size;
        }
        self.output.quality = self.output.quality.clamp(1, 100);

        self
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
