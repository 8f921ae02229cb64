//! BDM (damage) file codec.
//!
//! BDM files hold the damage tables that hitboxes refer to by id. Each entry
//! is a `u32` id followed by ten damage sub-entries. Files from older games
//! use a shorter sub-entry layout; those are detected on load and upgraded to
//! the current layout, which is the only one ever written.
//!
//! # Layout Detection
//!
//! The whole entry table is first decoded with the canonical layout. If that
//! runs past the end of the file, everything decoded so far is dropped and
//! the table is decoded again from the data start with the legacy layout.
//! There is no per-entry mixing.
//!
//! # Example
//!
//! ```no_run
//! use xvrec_bdm::{BdmFile, BdmLayout};
//!
//! let mut bdm = BdmFile::open("skill.bdm")?;
//! if bdm.source_layout() == BdmLayout::Legacy {
//!     println!("upgraded {} legacy entries", bdm.entry_count());
//! }
//! bdm.save("skill.bdm")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod entry;
mod error;
mod file;

pub use entry::{
    BdmEntry, BdmSubEntry, LegacyBdmEntry, LegacyBdmSubEntry, BDM_ENTRY_SIZE,
    BDM_SUB_ENTRY_COUNT, LEGACY_BDM_ENTRY_SIZE,
};
pub use error::{Error, Result};
pub use file::{BdmFile, BdmLayout, BDM_SIGNATURE};
