//! Error types for the command line tools

use std::path::PathBuf;
use thiserror::Error;
use venue_backend::BackendError;
use venue_sheets::SheetError;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors surfaced by a CLI command
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration could not be loaded or shown
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message
        message: String,
    },

    /// Backend or endpoint call failed
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Spreadsheet could not be read or written
    #[error(transparent)]
    Sheet(#[from] SheetError),

    /// Domain rule rejected the input
    #[error(transparent)]
    Core(#[from] venue_core::Error),

    /// Output file could not be written
    #[error("Failed to write {path}: {source}")]
    Write {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Unknown table name on the command line
    #[error("Unknown table: {0}")]
    UnknownTable(String),
}

impl CliError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}
