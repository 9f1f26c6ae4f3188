//! Error types for figmentdb
//!
//! Provides a unified error type for all store operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using FigmentError
pub type Result<T> = std::result::Result<T, FigmentError>;

/// Unified error type for figmentdb operations
#[derive(Debug, Error)]
pub enum FigmentError {
    // -------------------------------------------------------------------------
    // Startup Errors
    // -------------------------------------------------------------------------
    /// The backing file could not be created or opened
    #[error("Storage unavailable at {}: {source}", .path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Read failure: {0}")]
    ReadFailure(#[source] io::Error),

    /// A non-blank line did not decode to a well-formed record.
    /// `line` is 1-based and counts blank lines.
    #[error("Parse error at line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    // -------------------------------------------------------------------------
    // Write Errors
    // -------------------------------------------------------------------------
    #[error("Write failure: {0}")]
    WriteFailure(#[source] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Compaction was requested before the log file was loaded
    #[error("Store not loaded: call load() before compacting")]
    NotLoaded,

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl FigmentError {
    /// Build a `StorageUnavailable` for `path`
    pub(crate) fn unavailable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        FigmentError::StorageUnavailable {
            path: path.into(),
            source,
        }
    }

    /// True for errors that leave the store unusable until re-initialized
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            FigmentError::StorageUnavailable { .. }
                | FigmentError::ReadFailure(_)
                | FigmentError::Parse { .. }
        )
    }
}
