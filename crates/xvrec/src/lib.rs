//! xvrec - Xenoverse record file codecs.
//!
//! This crate bundles the xvrec format crates behind one interface and adds
//! [`AnyContainer`] for working with a file whose kind is not known up front.
//!
//! # Crates
//!
//! - [`xvrec_common`] - Byte-order aware record codec, container header, comment sidecars
//! - [`xvrec_bcm`] - BCM character command files (flat 112-byte entries)
//! - [`xvrec_bdm`] - BDM damage files (canonical and legacy entry layouts)
//! - [`xvrec_bsa`] - BSA skill attack files (nested typed sub-entries)
//!
//! # Features
//!
//! - `json` - derive `serde` traits on every record, for JSON export
//!
//! # Example
//!
//! ```no_run
//! use xvrec::prelude::*;
//!
//! let mut container = AnyContainer::open("skill.bdm")?;
//! println!("{}: {} entries", container.kind(), container.entry_count());
//!
//! // Saves are always little-endian.
//! container.save("skill_out.bdm")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod container;
mod error;

pub use xvrec_bcm as bcm;
pub use xvrec_bdm as bdm;
pub use xvrec_bsa as bsa;
pub use xvrec_common as common;

pub use container::{AnyContainer, ContainerKind};
pub use error::{Error, Result};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{AnyContainer, ContainerKind};
    pub use xvrec_bcm::{BcmEntry, BcmEntryData, BcmFile};
    pub use xvrec_bdm::{BdmEntry, BdmFile, BdmLayout, BdmSubEntry};
    pub use xvrec_bsa::{BsaEntry, BsaFile, Item, ItemPayload, ItemType, SubEntry};
    pub use xvrec_common::comment::Commented;
    pub use xvrec_common::{ContainerHeader, Endian, FixedRecord};
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
