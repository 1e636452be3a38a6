// src/config.rs
//! Editor configuration, read from a JSON file at startup.
//!
//! Every field has a default, so an empty object (or no file at all) is a
//! valid configuration.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "tableplan.json";
/// Environment variable overriding the config file path.
pub const CONFIG_ENV: &str = "TABLEPLAN_CONFIG";

pub const MIN_ZOOM: f64 = 0.5;
pub const MAX_ZOOM: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub show_grid: bool,
    pub snap_to_grid: bool,
    pub grid_step: f64,
    pub zoom: f64,
    /// Degrees added or removed by one rotate action.
    pub rotation_step: f64,
    /// Directory holding `floor_plan.json` and `tables.json`.
    pub data_dir: PathBuf,
    pub default_plan_name: String,
    pub canvas_width: f64,
    pub canvas_height: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            show_grid: true,
            snap_to_grid: true,
            grid_step: 20.0,
            zoom: 1.0,
            rotation_step: 15.0,
            data_dir: PathBuf::from("data"),
            default_plan_name: "Main Floor".to_string(),
            canvas_width: 1200.0,
            canvas_height: 800.0,
        }
    }
}

impl EditorConfig {
    /// Reads a config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let config: EditorConfig = serde_json::from_str(text)?;
        Ok(config.sanitized())
    }

    /// Loads from `$TABLEPLAN_CONFIG` or `./tableplan.json`, falling back to
    /// defaults (with a warning) if the file is unreadable.
    pub fn from_env() -> Self {
        let path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("{}; using default configuration", e);
                Self::default()
            }
        }
    }

    /// Pulls out-of-range values back into something usable.
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        self.zoom = clamp_zoom(self.zoom);
        if !(self.grid_step > 0.0) || !self.grid_step.is_finite() {
            self.grid_step = defaults.grid_step;
        }
        if !(self.rotation_step > 0.0) || !self.rotation_step.is_finite() {
            self.rotation_step = defaults.rotation_step;
        }
        if !(self.canvas_width > 0.0) || !(self.canvas_height > 0.0) {
            self.canvas_width = defaults.canvas_width;
            self.canvas_height = defaults.canvas_height;
        }
        self
    }
}

/// Keeps zoom inside `[MIN_ZOOM, MAX_ZOOM]`. Non-finite input resets to 1.
pub fn clamp_zoom(zoom: f64) -> f64 {
    if !zoom.is_finite() {
        return 1.0;
    }
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}
