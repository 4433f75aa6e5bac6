//! User settings, read from a JSON document.
//!
//! Every key is optional. Diagram keys sit at the top level next to the
//! terminal-specific ones:
//!
//! ```json
//! { "transition_ms": 300, "initial_scale": 1.0, "cell_width": 7.0 }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use gitscape_diagram::DiagramConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::paths;

/// Settings error type.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(flatten)]
    pub diagram: DiagramConfig,
    /// Diagram units covered by one terminal column.
    pub cell_width: f32,
    /// Diagram units covered by one terminal row.
    pub cell_height: f32,
    /// Scale factor of one wheel notch or `+`/`-` press.
    pub zoom_step: f32,
    /// Cells moved by one arrow key press.
    pub pan_step: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            diagram: DiagramConfig::default(),
            cell_width: 6.0,
            cell_height: 14.0,
            zoom_step: 1.15,
            pan_step: 4,
        }
    }
}

impl Settings {
    /// Load from `explicit`, or from the user settings file when it exists.
    ///
    /// A missing explicit file is an error; a missing user file means
    /// defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, SettingsError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match paths::settings_file() {
                Some(path) if path.exists() => path,
                _ => {
                    log::debug!("no settings file, using defaults");
                    return Ok(Self::default());
                }
            },
        };
        let text = fs::read_to_string(&path).map_err(|source| SettingsError::Read {
            path: path.clone(),
            source,
        })?;
        let settings = Self::from_json(&text).map_err(|source| SettingsError::Parse {
            path: path.clone(),
            source,
        })?;
        log::info!("loaded settings from {}", path.display());
        Ok(settings.sanitized())
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Replace unusable cell metrics, zoom scales and zoom step with
    /// defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !positive(self.cell_width) {
            log::warn!("ignoring cell_width {}", self.cell_width);
            self.cell_width = defaults.cell_width;
        }
        if !positive(self.cell_height) {
            log::warn!("ignoring cell_height {}", self.cell_height);
            self.cell_height = defaults.cell_height;
        }
        if !(positive(self.zoom_step) && self.zoom_step > 1.0) {
            log::warn!("ignoring zoom_step {}", self.zoom_step);
            self.zoom_step = defaults.zoom_step;
        }

        let diagram = &mut self.diagram;
        if !(positive(diagram.min_scale) && positive(diagram.max_scale)) {
            log::warn!(
                "ignoring scale extent [{}, {}]",
                diagram.min_scale,
                diagram.max_scale
            );
            diagram.min_scale = defaults.diagram.min_scale;
            diagram.max_scale = defaults.diagram.max_scale;
        }
        if !positive(diagram.initial_scale) {
            log::warn!("ignoring initial_scale {}", diagram.initial_scale);
            diagram.initial_scale = defaults.diagram.initial_scale;
        }
        self
    }
}

fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
