//! Common error types for asarprobe.

use thiserror::Error;

/// Common error type for asarprobe operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unsupported operating system: {0}. This tool only works on macOS and Windows.")]
    UnsupportedOs(String),

    #[error("Cannot start scan of {root}: {reason}")]
    ScanRoot { root: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias using common Error.
pub type Result<T> = std::result::Result<T, Error>;
