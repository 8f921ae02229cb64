//! BSA (skill attack) file codec.
//!
//! BSA files describe projectiles and other spawned attacks. Unlike BCM and
//! BDM, entries are variable-length trees:
//!
//! - 4 bytes: Magic (`#BSA`)
//! - 12 bytes: [`ContainerHeader`](xvrec_common::ContainerHeader)
//! - `num_entries` × u32 absolute entry offsets from the data start (0 for an
//!   empty slot)
//! - the entries, each a [`BsaEntryHeader`] followed by its collisions,
//!   expirations and [`SubEntry`] groups of typed [`Item`]s
//!
//! Every offset inside an entry is relative: section offsets to the entry
//! header, item and duration offsets to the sub-entry header. All of them are
//! recomputed when the file is written.
//!
//! # Example
//!
//! ```no_run
//! use xvrec_bsa::{BsaFile, ItemPayload};
//!
//! let bsa = BsaFile::open("skill.bsa")?;
//! for (index, entry) in bsa.entries().iter().enumerate() {
//!     let Some(entry) = entry else { continue };
//!     for sub_entry in &entry.sub_entries {
//!         for item in &sub_entry.items {
//!             if let ItemPayload::Hitbox(hitbox) = item.payload {
//!                 println!("{index}: hitbox -> BDM {}", hitbox.bdm_entry_id);
//!             }
//!         }
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod entry;
mod error;
mod file;
mod sub_entry;
pub mod types;

pub use entry::{BsaEntry, BsaEntryHeader, Collision, Expiration, BSA_ENTRY_HEADER_SIZE};
pub use error::{Error, Result};
pub use file::{BsaFile, BSA_SIGNATURE};
pub use sub_entry::{SubEntry, SubEntryHeader, SUB_ENTRY_HEADER_SIZE};
pub use types::{
    Deflection, Duration, Effect, EntryPassing, Hitbox, Item, ItemPayload, ItemType, Movement,
    Sound, Type2, Type8,
};
