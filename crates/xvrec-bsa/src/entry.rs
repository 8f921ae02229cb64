//! BSA entries and their nested sections.
//!
//! An entry on disk is laid out as:
//!
//! ```text
//! header (52) | collisions (16 each) | expirations (8 each)
//!             | sub-entry headers (16 each) | per sub-entry: durations, payloads
//! ```
//!
//! Section offsets in the header are relative to the header itself and are
//! recomputed from the live lists on every write.

use tracing::debug;
use xvrec_common::{fixed_record, BinaryReader, BinaryWriter, FixedRecord};

use crate::sub_entry::{SubEntry, SubEntryHeader, SUB_ENTRY_HEADER_SIZE};
use crate::Result;

/// Size of an entry header on disk.
pub const BSA_ENTRY_HEADER_SIZE: usize = BsaEntryHeader::SIZE;

fixed_record! {
    /// On-disk entry header.
    ///
    /// The count and offset fields describe the sections as they were read;
    /// [`BsaEntry::layout`] recomputes them from the live lists.
    pub struct BsaEntryHeader {
        pub i_00: u32,
        pub collision_count: u16,
        pub expiration_count: u16,
        pub collision_offset: u32,
        pub expiration_offset: u32,
        pub impact_properties: u8, // 0x10
        pub i_17: u8,
        pub i_18: u32,
        pub lifetime: u16, // 0x16
        pub i_24: u16,
        pub expires: u16,
        pub impact_projectile: u16,
        pub impact_enemy: u16,
        pub impact_ground: u16,
        pub sub_entry_count: u16,
        pub sub_entry_offset: u32, // 0x24
        pub i_40: u32,
        pub i_44: u32,
        pub i_48: u32,
    }
}

fixed_record! {
    /// Collision record (16 bytes).
    pub struct Collision {
        pub i_00: u16,
        pub i_02: u16,
        pub i_04: u32,
        pub i_08: u32,
        pub i_12: u32,
    }
}

fixed_record! {
    /// Expiration record (8 bytes).
    pub struct Expiration {
        pub i_00: u16,
        pub i_02: u16,
        pub i_04: u16,
        pub i_06: u16,
    }
}

/// A BSA entry with its collisions, expirations and sub-entries.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BsaEntry {
    pub header: BsaEntryHeader,
    pub collisions: Vec<Collision>,
    pub expirations: Vec<Expiration>,
    pub sub_entries: Vec<SubEntry>,
}

impl BsaEntry {
    /// Create an entry with no sections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of items across all sub-entries.
    pub fn item_count(&self) -> usize {
        self.sub_entries.iter().map(|s| s.items.len()).sum()
    }

    /// Read the entry whose header starts at the reader's position.
    pub(crate) fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let header: BsaEntryHeader = reader.read_record()?;
        let collisions = reader.read_records(usize::from(header.collision_count))?;
        let expirations = reader.read_records(usize::from(header.expiration_count))?;

        let count = usize::from(header.sub_entry_count);
        let mut sub_headers = Vec::with_capacity(count);
        for _ in 0..count {
            let position = reader.position();
            let sub_header: SubEntryHeader = reader.read_record()?;
            sub_headers.push((position, sub_header));
        }

        let mut sub_entries = Vec::with_capacity(count);
        for (position, sub_header) in &sub_headers {
            sub_entries.push(SubEntry::read(reader, *position, sub_header)?);
        }

        Ok(Self {
            header,
            collisions,
            expirations,
            sub_entries,
        })
    }

    /// The header as it will be written: counts and offsets recomputed from
    /// the live lists, every other field kept.
    ///
    /// Offsets run on from the end of the header; empty sections get 0.
    pub fn layout(&self) -> Result<BsaEntryHeader> {
        let mut header = self.header;
        header.collision_count = section_count(self.collisions.len())?;
        header.expiration_count = section_count(self.expirations.len())?;
        header.sub_entry_count = section_count(self.sub_entries.len())?;

        let mut offset = BSA_ENTRY_HEADER_SIZE;
        header.collision_offset = section_offset(offset, self.collisions.len())?;
        offset += self.collisions.len() * Collision::SIZE;
        header.expiration_offset = section_offset(offset, self.expirations.len())?;
        offset += self.expirations.len() * Expiration::SIZE;
        header.sub_entry_offset = section_offset(offset, self.sub_entries.len())?;
        Ok(header)
    }

    /// Write the entry at the writer's position, leaving the writer at the
    /// end of the entry's data.
    pub(crate) fn write(&self, writer: &mut BinaryWriter) -> Result<()> {
        writer.write_record(&self.layout()?)?;
        writer.write_records(&self.collisions)?;
        writer.write_records(&self.expirations)?;
        if self.sub_entries.is_empty() {
            return Ok(());
        }

        let block_start = writer.position();
        writer.seek(block_start + self.sub_entries.len() * SUB_ENTRY_HEADER_SIZE);

        let mut sub_headers = Vec::with_capacity(self.sub_entries.len());
        for (index, sub_entry) in self.sub_entries.iter().enumerate() {
            let own_offset = block_start + index * SUB_ENTRY_HEADER_SIZE;
            sub_headers.push(sub_entry.write_items(writer, own_offset)?);
        }

        let data_end = writer.position();
        writer.seek(block_start);
        writer.write_records(&sub_headers)?;
        writer.seek(data_end);

        debug!(
            sub_entries = sub_headers.len(),
            bytes = data_end - block_start,
            "wrote BSA sub-entry block"
        );
        Ok(())
    }
}

fn section_count(count: usize) -> Result<u16> {
    u16::try_from(count).map_err(|_| xvrec_common::Error::CountOverflow { count }.into())
}

fn section_offset(offset: usize, count: usize) -> Result<u32> {
    if count == 0 {
        return Ok(0);
    }
    u32::try_from(offset).map_err(|_| {
        xvrec_common::Error::OffsetOutOfRange {
            offset: offset as u64,
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Hitbox, Item, ItemPayload, ItemType};
    use crate::Error;
    use xvrec_common::Endian;

    fn hitbox(bdm_entry_id: u16) -> ItemPayload {
        ItemPayload::Hitbox(Hitbox {
            bdm_entry_id,
            position_y: 1.5,
            size: 0.75,
            amount: 1,
            ..Default::default()
        })
    }

    fn sample_entry() -> BsaEntry {
        let mut sub_entry = SubEntry::new(ItemType::Hitbox);
        sub_entry.i_02 = 2;
        sub_entry.items = vec![
            Item::new(hitbox(30), 0, 10),
            Item::new(hitbox(31), 10, 25),
            Item::new(hitbox(32), 25, 60),
        ];

        BsaEntry {
            header: BsaEntryHeader {
                i_00: 7,
                lifetime: 120,
                impact_properties: 2,
                // Stale values from some other layout; must be ignored.
                collision_offset: 999,
                expiration_offset: 999,
                ..Default::default()
            },
            collisions: vec![
                Collision {
                    i_00: 1,
                    i_04: 0x10,
                    ..Default::default()
                },
                Collision {
                    i_00: 2,
                    i_12: 0x20,
                    ..Default::default()
                },
            ],
            expirations: Vec::new(),
            sub_entries: vec![sub_entry],
        }
    }

    fn encode(entry: &BsaEntry) -> Vec<u8> {
        let mut writer = BinaryWriter::new(Endian::Little);
        entry.write(&mut writer).unwrap();
        writer.into_inner()
    }

    #[test]
    fn test_record_sizes() {
        assert_eq!(BSA_ENTRY_HEADER_SIZE, 52);
        assert_eq!(Collision::SIZE, 16);
        assert_eq!(Expiration::SIZE, 8);
    }

    #[test]
    fn test_section_offsets_are_recomputed() {
        let entry = sample_entry();
        let bytes = encode(&entry);

        let header = entry.layout().unwrap();
        assert_eq!(header.collision_count, 2);
        assert_eq!(header.expiration_count, 0);
        assert_eq!(header.sub_entry_count, 1);
        assert_eq!(header.expiration_offset, 0);
        assert_eq!(header.collision_offset, 52);
        assert_eq!(header.sub_entry_offset, 52 + 2 * 16);
        assert_eq!(bytes.len(), 52 + 2 * 16 + 16 + 3 * 4 + 3 * 32);

        let mut reader = BinaryReader::new_at(&bytes, 84, Endian::Little);
        let sub_header: SubEntryHeader = reader.read_record().unwrap();
        assert_eq!(sub_header.count, 3);
        assert_eq!(sub_header.duration_offset, 16);
        assert_eq!(sub_header.item_offset, 16 + 3 * 4);
    }

    #[test]
    fn test_read_reproduces_items_and_durations() {
        let mut entry = sample_entry();
        let bytes = encode(&entry);

        let mut reader = BinaryReader::new(&bytes, Endian::Little);
        let read = BsaEntry::read(&mut reader).unwrap();
        assert_eq!(read.header.collision_offset, 52);
        entry.header = entry.layout().unwrap();
        assert_eq!(read, entry);
        assert_eq!(read.item_count(), 3);

        let durations: Vec<_> = read.sub_entries[0]
            .items
            .iter()
            .map(|i| (i.duration.start_time, i.duration.end_time))
            .collect();
        assert_eq!(durations, [(0, 10), (10, 25), (25, 60)]);
    }

    #[test]
    fn test_empty_entry_has_zero_offsets() {
        let entry = BsaEntry::new();
        let bytes = encode(&entry);
        assert_eq!(bytes.len(), BSA_ENTRY_HEADER_SIZE);

        let header = entry.layout().unwrap();
        assert_eq!(header.collision_offset, 0);
        assert_eq!(header.expiration_offset, 0);
        assert_eq!(header.sub_entry_offset, 0);
    }

    #[test]
    fn test_reserved_item_tag_aborts_read() {
        let mut bytes = encode(&sample_entry());
        // Sub-entry header at 84 starts with its type tag.
        bytes[84..86].copy_from_slice(&5u16.to_le_bytes());

        let mut reader = BinaryReader::new(&bytes, Endian::Little);
        let err = BsaEntry::read(&mut reader).unwrap_err();
        assert!(matches!(err, Error::UnknownItemType { tag: 5 }));
    }

    #[test]
    fn test_truncated_items_fail() {
        let bytes = encode(&sample_entry());

        let mut reader = BinaryReader::new(&bytes[..bytes.len() - 4], Endian::Little);
        let err = BsaEntry::read(&mut reader).unwrap_err();
        assert!(matches!(err, Error::Common(ref e) if e.is_layout()));
    }
}
