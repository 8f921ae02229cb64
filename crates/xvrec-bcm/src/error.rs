//! Error types for BCM files.

use thiserror::Error;

/// Errors that can occur when reading or writing BCM files.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Codec error (bad signature, truncated entry table).
    #[error("{0}")]
    Common(#[from] xvrec_common::Error),
}

/// Result type for BCM operations.
pub type Result<T> = std::result::Result<T, Error>;
