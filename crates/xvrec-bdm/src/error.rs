//! Error types for BDM files.

use thiserror::Error;

/// Errors that can occur when reading or writing BDM files.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Codec error (bad signature, entry table fits neither layout).
    #[error("{0}")]
    Common(#[from] xvrec_common::Error),
}

/// Result type for BDM operations.
pub type Result<T> = std::result::Result<T, Error>;
