//! Error types for svcman operations.
//!
//! Provides a common `Error` type and `Result<T>` alias used across both
//! svcman crates. Uses `thiserror` for derive macros.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur in svcman operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error with the path that caused it.
    #[error("I/O error at {path}: {source}")]
    IoAt {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A command manifest failed to parse.
    #[error("Manifest error at {path}: {detail}")]
    Manifest { path: PathBuf, detail: String },

    /// Something requested was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid data or shape.
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a manifest error for a given file.
    pub fn manifest(path: impl Into<PathBuf>, detail: impl Into<String>) -> Self {
        Self::Manifest {
            path: path.into(),
            detail: detail.into(),
        }
    }

    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an invalid data error.
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        Self::InvalidData(msg.into())
    }

    /// Wrap an I/O error together with the path it concerns.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Self::IoAt {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

/// Result type alias using svcman's Error type.
pub type Result<T> = std::result::Result<T, Error>;
