//! Error types for gazeview-core
//!
//! Defines crate-wide error types using thiserror for clear error
//! propagation. Parsers that can degrade gracefully (time strings, table
//! rows, subtitle blocks) do not use these at all; only hard failures
//! (unreadable tensor headers, unsupported element types, bad config)
//! surface as errors.

use thiserror::Error;

/// Main error type for gazeview-core
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file loading or validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Tensor file too short or structurally invalid
    #[error("Tensor format error: {0}")]
    TensorFormat(String),

    /// Tensor element descriptor outside the supported set
    #[error("Unsupported tensor dtype: {0}")]
    UnsupportedDtype(String),

    /// File I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Convenience Result type using gazeview-core Error
pub type Result<T> = std::result::Result<T, Error>;
