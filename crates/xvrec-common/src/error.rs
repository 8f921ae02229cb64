//! Error types for xvrec-common.

use thiserror::Error;

use crate::FieldKind;

/// Common error type for record codec operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The buffer is shorter than the declared layout demands.
    #[error("layout overrun: needed {needed} bytes but only {available} available")]
    Layout { needed: usize, available: usize },

    /// The file does not start with the expected signature.
    #[error("invalid signature: expected {expected:?}, got {actual:?}")]
    InvalidMagic {
        expected: Vec<u8>,
        actual: Vec<u8>,
    },

    /// A value list does not match the layout it is packed against.
    #[error("value mismatch at field {index}: expected {expected:?}, got {actual:?}")]
    ValueMismatch {
        index: usize,
        expected: Option<FieldKind>,
        actual: Option<FieldKind>,
    },

    /// An offset stored in the file does not fit the platform or the file.
    #[error("offset {offset:#x} out of range")]
    OffsetOutOfRange { offset: u64 },

    /// A live count does not fit its on-disk field.
    #[error("count {count} does not fit in its header field")]
    CountOverflow { count: usize },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error is a layout overrun.
    ///
    /// Overruns are the only failure that lets a reader retry with an
    /// alternate layout.
    pub fn is_layout(&self) -> bool {
        matches!(self, Error::Layout { .. })
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
