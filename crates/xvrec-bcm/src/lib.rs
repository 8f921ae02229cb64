//! BCM (character command) file codec.
//!
//! BCM files map controller input and gameplay conditions to animation
//! entries. The format is a flat table of fixed-size records:
//!
//! - 4 bytes: Magic (`#BCM`)
//! - 12 bytes: [`ContainerHeader`](xvrec_common::ContainerHeader)
//! - `num_entries` × 112-byte [`BcmEntryData`] records from the data start
//!
//! Entries link to each other (sibling, child, parent, root) by absolute
//! address, so each loaded entry remembers where it came from and is written
//! back to the same place.
//!
//! # Example
//!
//! ```no_run
//! use xvrec_bcm::BcmFile;
//!
//! let mut bcm = BcmFile::open("skill.bcm")?;
//! bcm.load_comments("skill.bcm");
//!
//! for (index, entry) in bcm.entries().iter().enumerate() {
//!     use xvrec_common::comment::Commented;
//!     println!("{index}: primary {}{}", entry.data.bac_entry_primary, entry.display_comment());
//! }
//!
//! bcm.save("skill_out.bcm")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod entry;
mod error;
mod file;

pub use entry::{address_to_index, index_to_address, BcmEntry, BcmEntryData, BCM_ENTRY_SIZE};
pub use error::{Error, Result};
pub use file::{BcmFile, BCM_SIGNATURE};
