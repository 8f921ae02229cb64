//! BCM file handling.

use std::fs;
use std::path::Path;

use tracing::debug;
use xvrec_common::header::{read_preamble, write_preamble, DATA_START};
use xvrec_common::{comment, ContainerHeader, Endian};

use crate::entry::{index_to_address, BcmEntry, BCM_ENTRY_SIZE};
use crate::Result;

/// Signature at the start of every BCM file.
pub const BCM_SIGNATURE: &[u8; 4] = b"#BCM";

/// Kind name used for the comment sidecar (`<name>_BCM.cmnt`).
const COMMENT_KIND: &str = "BCM";

/// A BCM file.
#[derive(Debug, Clone, Default)]
pub struct BcmFile {
    header: ContainerHeader,
    endian: Endian,
    entries: Vec<BcmEntry>,
    has_comments: bool,
}

impl BcmFile {
    /// Create an empty BCM file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a BCM file from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read(path)?;
        Self::parse(&data)
    }

    /// Parse BCM data from bytes.
    ///
    /// Nothing is returned unless every entry decodes.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let (mut reader, header) = read_preamble(data, BCM_SIGNATURE)?;
        let count = header.num_entries as usize;

        let mut entries = Vec::with_capacity(count.min(reader.remaining() / BCM_ENTRY_SIZE));
        for index in 0..count {
            let address = if index == 0 { 0 } else { reader.position() };
            entries.push(BcmEntry::read(&mut reader, address)?);
        }

        debug!(entries = entries.len(), endian = reader.endian().name(), "parsed BCM");

        Ok(Self {
            header,
            endian: reader.endian(),
            entries,
            has_comments: false,
        })
    }

    /// Encode the file.
    ///
    /// The output is always little-endian with data starting at 16, even if
    /// this file was loaded from a big-endian source. Entry 0 is written at
    /// the data start; every other entry goes back to its recorded address,
    /// or to the address its index implies if it has none.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut header = self.header;
        let mut writer = write_preamble(BCM_SIGNATURE, &mut header, self.entries.len())?;

        for (index, entry) in self.entries.iter().enumerate() {
            let position = match (index, entry.address) {
                (0, _) => DATA_START as usize,
                (_, 0) => index_to_address(index),
                (_, address) => address,
            };
            writer.seek(position);
            writer.write_record(&entry.data)?;
        }

        Ok(writer.into_inner())
    }

    /// Write the file to disk (little-endian, see [`to_bytes`](Self::to_bytes)).
    ///
    /// The write is not atomic. On success the in-memory header reflects what
    /// was written.
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let data = self.to_bytes()?;
        fs::write(path, data)?;

        self.header.canonicalize(self.entries.len())?;
        self.endian = Endian::Little;
        Ok(())
    }

    /// Load entry comments from the sidecar next to `path`.
    ///
    /// Failures are logged, never returned.
    pub fn load_comments<P: AsRef<Path>>(&mut self, path: P) {
        if comment::load(path.as_ref(), COMMENT_KIND, &mut self.entries) {
            self.has_comments = true;
        }
    }

    /// Save entry comments next to `path`, if any were loaded or enabled.
    ///
    /// Failures are logged, never returned.
    pub fn save_comments<P: AsRef<Path>>(&self, path: P) {
        if self.has_comments {
            comment::save(path.as_ref(), COMMENT_KIND, &self.entries);
        }
    }

    /// Whether comments were loaded or enabled.
    pub fn has_comments(&self) -> bool {
        self.has_comments
    }

    /// Enable or disable writing comments in [`save_comments`](Self::save_comments).
    pub fn set_has_comments(&mut self, has_comments: bool) {
        self.has_comments = has_comments;
    }

    /// The header as loaded (or as last saved).
    pub fn header(&self) -> &ContainerHeader {
        &self.header
    }

    /// Byte order of the source file.
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Get the entries.
    pub fn entries(&self) -> &[BcmEntry] {
        &self.entries
    }

    /// Get mutable access to the entries.
    pub fn entries_mut(&mut self) -> &mut Vec<BcmEntry> {
        &mut self.entries
    }

    /// Get an entry by index.
    pub fn entry(&self, index: usize) -> Option<&BcmEntry> {
        self.entries.get(index)
    }

    /// Get the number of entries.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}
