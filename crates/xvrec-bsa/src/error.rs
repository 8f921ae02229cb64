//! Error types for BSA files.

use thiserror::Error;

use crate::ItemType;

/// Errors that can occur when reading or writing BSA files.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Codec error (bad signature, truncated section, offset out of range).
    #[error("{0}")]
    Common(#[from] xvrec_common::Error),

    /// A sub-entry carries a type tag outside the known item set.
    #[error("unknown sub-entry item type {tag}")]
    UnknownItemType { tag: u16 },

    /// A sub-entry holds an item of a different type than its own.
    #[error("sub-entry of type {expected} holds a {found} item")]
    MixedItemTypes { expected: ItemType, found: ItemType },
}

/// Result type for BSA operations.
pub type Result<T> = std::result::Result<T, Error>;
