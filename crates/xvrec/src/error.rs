//! Error types for kind-agnostic container access.

use thiserror::Error;

/// Errors from [`AnyContainer`](crate::AnyContainer).
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The data does not start with any known signature.
    #[error("unrecognized container signature {magic:?}")]
    UnknownKind { magic: Vec<u8> },

    #[error("BCM: {0}")]
    Bcm(#[from] xvrec_bcm::Error),

    #[error("BDM: {0}")]
    Bdm(#[from] xvrec_bdm::Error),

    #[error("BSA: {0}")]
    Bsa(#[from] xvrec_bsa::Error),
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, Error>;
