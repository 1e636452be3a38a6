// src/error.rs

use std::path::PathBuf;

use thiserror::Error;

/// Failures at the layout persistence / registry boundary.
///
/// The editor core never sees these directly; they are reported to the
/// operator and the in-memory layout is left untouched.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed layout data: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("layout store rejected the request: {0}")]
    Store(String),

    #[error("a save is already in progress")]
    SaveInFlight,

    #[error("no floor plan is open")]
    NoDocument,
}

impl LayoutError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LayoutError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, LayoutError::NoDocument)
    }
}

/// Failures while reading the editor configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
