//! CLI error types.

use std::path::PathBuf;
use thiserror::Error;

/// CLI errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// The schema document could not be read.
    #[error("failed to read schema '{}': {source}", path.display())]
    ReadSchema {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The manifest could not be written.
    #[error("failed to write manifest '{}': {source}", path.display())]
    WriteManifest {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Generation failed.
    #[error(transparent)]
    Core(#[from] dtoforge_core::Error),

    /// The manifest could not be encoded.
    #[error("failed to encode manifest: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
