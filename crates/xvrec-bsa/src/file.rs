//! BSA file handling.

use std::fs;
use std::path::Path;

use tracing::debug;
use xvrec_common::header::{read_preamble, write_preamble, DATA_START};
use xvrec_common::{ContainerHeader, Endian};

use crate::entry::BsaEntry;
use crate::sub_entry::distance;
use crate::Result;

/// Signature at the start of every BSA file.
pub const BSA_SIGNATURE: &[u8; 4] = b"#BSA";

/// A BSA file.
///
/// Entries are addressed through an offset table; a slot whose offset is 0
/// holds no entry and is kept as `None`.
#[derive(Debug, Clone, Default)]
pub struct BsaFile {
    header: ContainerHeader,
    endian: Endian,
    entries: Vec<Option<BsaEntry>>,
}

impl BsaFile {
    /// Create an empty BSA file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a BSA file from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read(path)?;
        Self::parse(&data)
    }

    /// Parse BSA data from bytes.
    ///
    /// Any failure (bad signature, unknown item type, truncated section)
    /// fails the whole file.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let (mut reader, header) = read_preamble(data, BSA_SIGNATURE)?;
        let count = header.num_entries as usize;
        let offsets: Vec<u32> = reader.read_records(count)?;

        let mut entries = Vec::with_capacity(count);
        for offset in offsets {
            if offset == 0 {
                entries.push(None);
                continue;
            }
            reader.seek_to(offset)?;
            entries.push(Some(BsaEntry::read(&mut reader)?));
        }

        debug!(
            slots = entries.len(),
            entries = entries.iter().flatten().count(),
            endian = reader.endian().name(),
            "parsed BSA"
        );

        Ok(Self {
            header,
            endian: reader.endian(),
            entries,
        })
    }

    /// Encode the file.
    ///
    /// The output is always little-endian with data starting at 16, even if
    /// this file was loaded from a big-endian source. The offset table is
    /// reserved first and backfilled once every entry has been placed; all
    /// section offsets are recomputed.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut header = self.header;
        let mut writer = write_preamble(BSA_SIGNATURE, &mut header, self.entries.len())?;

        let table_start = DATA_START as usize;
        writer.seek(table_start + self.entries.len() * 4);

        let mut offsets = Vec::with_capacity(self.entries.len());
        for slot in &self.entries {
            match slot {
                Some(entry) => {
                    offsets.push(distance(0, writer.position())?);
                    entry.write(&mut writer)?;
                }
                None => offsets.push(0),
            }
        }

        writer.seek(table_start);
        writer.write_records(&offsets)?;
        Ok(writer.into_inner())
    }

    /// Write the file to disk (little-endian, see [`to_bytes`](Self::to_bytes)).
    ///
    /// The write is not atomic. On success the in-memory headers reflect what
    /// was written.
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let data = self.to_bytes()?;
        fs::write(path, data)?;

        self.header.canonicalize(self.entries.len())?;
        self.endian = Endian::Little;
        for entry in self.entries.iter_mut().flatten() {
            entry.header = entry.layout()?;
        }
        Ok(())
    }

    /// The header as loaded (or as last saved).
    pub fn header(&self) -> &ContainerHeader {
        &self.header
    }

    /// Byte order of the source file.
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Get the entry slots.
    pub fn entries(&self) -> &[Option<BsaEntry>] {
        &self.entries
    }

    /// Get mutable access to the entry slots.
    pub fn entries_mut(&mut self) -> &mut Vec<Option<BsaEntry>> {
        &mut self.entries
    }

    /// Get an entry by slot index. Empty slots return `None`.
    pub fn entry(&self, index: usize) -> Option<&BsaEntry> {
        self.entries.get(index).and_then(Option::as_ref)
    }

    /// Get the number of slots, empty ones included.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}
