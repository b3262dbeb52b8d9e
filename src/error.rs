//! Error types for brrr-scrub.
//!
//! The transform itself is infallible. Errors only arise at the edges:
//! reading scripts, writing output and loading configuration.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::ConfigError;

// ---------------------------------------------------------------------------
// Exit codes
// ---------------------------------------------------------------------------

/// Process exit codes for the brrr-scrub CLI.
pub mod exit_code {
    /// Script processed.
    pub const SUCCESS: i32 = 0;
    /// Configuration error (bad config file, invalid CLI args).
    pub const CONFIG_ERROR: i32 = 2;
    /// I/O error (file not found, permission denied, etc.).
    pub const IO_ERROR: i32 = 3;
    /// Internal error (bug in brrr-scrub itself).
    pub const INTERNAL_ERROR: i32 = 4;
}

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum ScrubError {
    /// IO operation failed (without path context, e.g. stdin/stdout)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// IO operation failed with path context
    #[error("IO error at {path}: {error}")]
    IoWithPath {
        error: std::io::Error,
        path: PathBuf,
    },

    /// Refusing to overwrite an existing file
    #[error("{0} already exists. Use --force to overwrite.")]
    AlreadyExists(PathBuf),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Convenience type alias for Results using ScrubError.
pub type Result<T> = std::result::Result<T, ScrubError>;

impl ScrubError {
    /// Create an IO error with path context.
    #[inline]
    pub fn io_with_path(error: std::io::Error, path: impl AsRef<Path>) -> Self {
        ScrubError::IoWithPath {
            error,
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ScrubError::Io(_) | ScrubError::IoWithPath { .. } => exit_code::IO_ERROR,
            ScrubError::AlreadyExists(_) | ScrubError::Config(_) => exit_code::CONFIG_ERROR,
            ScrubError::Serde(_) => exit_code::INTERNAL_ERROR,
        }
    }
}
