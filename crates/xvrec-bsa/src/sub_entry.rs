//! BSA sub-entries: typed item groups with relative section offsets.

use xvrec_common::{fixed_record, BinaryReader, BinaryWriter, FixedRecord};

use crate::types::{Duration, Item, ItemType};
use crate::{Error, Result};

/// Size of a sub-entry header on disk.
pub const SUB_ENTRY_HEADER_SIZE: usize = SubEntryHeader::SIZE;

fixed_record! {
    /// On-disk sub-entry header.
    ///
    /// Both offsets are relative to the start of this header, not to the
    /// file or the owning entry.
    pub struct SubEntryHeader {
        pub item_type: u16,
        pub i_02: u16,
        pub i_04: u16,
        pub count: u16,
        pub duration_offset: u32,
        pub item_offset: u32,
    }
}

/// A sub-entry: a group of items that all share one type.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubEntry {
    pub item_type: ItemType,
    pub i_02: u16,
    pub i_04: u16,
    pub items: Vec<Item>,
}

impl SubEntry {
    /// Create an empty sub-entry of the given type.
    pub fn new(item_type: ItemType) -> Self {
        Self {
            item_type,
            i_02: 0,
            i_04: 0,
            items: Vec::new(),
        }
    }

    /// Read the items of a sub-entry whose header sits at `own_offset`.
    ///
    /// The type tag is resolved first, so an unknown tag fails even when the
    /// sub-entry is empty. Payloads are read before durations.
    pub(crate) fn read(
        reader: &mut BinaryReader<'_>,
        own_offset: usize,
        header: &SubEntryHeader,
    ) -> Result<Self> {
        let item_type = ItemType::from_tag(header.item_type)?;
        let count = usize::from(header.count);

        let mut items = Vec::with_capacity(count);
        if count > 0 {
            reader.seek(relative(own_offset, header.item_offset)?);
            let mut payloads = Vec::with_capacity(count);
            for _ in 0..count {
                payloads.push(item_type.read_payload(reader)?);
            }

            reader.seek(relative(own_offset, header.duration_offset)?);
            let durations: Vec<Duration> = reader.read_records(count)?;

            items.extend(
                payloads
                    .into_iter()
                    .zip(durations)
                    .map(|(payload, duration)| Item { duration, payload }),
            );
        }

        Ok(Self {
            item_type,
            i_02: header.i_02,
            i_04: header.i_04,
            items,
        })
    }

    /// Write the duration block, then the payload block, at the writer's
    /// position and return the header describing them.
    ///
    /// `own_offset` is where the header will be backfilled.
    pub(crate) fn write_items(
        &self,
        writer: &mut BinaryWriter,
        own_offset: usize,
    ) -> Result<SubEntryHeader> {
        if let Some(item) = self.items.iter().find(|i| i.item_type() != self.item_type) {
            return Err(Error::MixedItemTypes {
                expected: self.item_type,
                found: item.item_type(),
            });
        }
        let count = u16::try_from(self.items.len()).map_err(|_| {
            xvrec_common::Error::CountOverflow {
                count: self.items.len(),
            }
        })?;

        let duration_offset = distance(own_offset, writer.position())?;
        writer.write_records(self.items.iter().map(|item| &item.duration))?;

        let item_offset = distance(own_offset, writer.position())?;
        for item in &self.items {
            item.payload.write(writer)?;
        }

        Ok(SubEntryHeader {
            item_type: self.item_type.tag(),
            i_02: self.i_02,
            i_04: self.i_04,
            count,
            duration_offset,
            item_offset,
        })
    }
}

/// Resolve an offset relative to `base` into an absolute position.
pub(crate) fn relative(base: usize, offset: u32) -> Result<usize> {
    usize::try_from(offset)
        .ok()
        .and_then(|offset| base.checked_add(offset))
        .ok_or_else(|| {
            xvrec_common::Error::OffsetOutOfRange {
                offset: u64::from(offset),
            }
            .into()
        })
}

/// Distance from `base` to `position`, as stored in the file.
pub(crate) fn distance(base: usize, position: usize) -> Result<u32> {
    let offset = position.saturating_sub(base);
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
    use crate::types::{ItemPayload, Sound};
    use xvrec_common::Endian;

    fn sound(cue_id: u16) -> ItemPayload {
        ItemPayload::Sound(Sound {
            acb_type: 3,
            cue_id,
            ..Default::default()
        })
    }

    #[test]
    fn test_header_size() {
        assert_eq!(SUB_ENTRY_HEADER_SIZE, 16);
    }

    #[test]
    fn test_offsets_are_relative_to_own_header() {
        let mut sub_entry = SubEntry::new(ItemType::Sound);
        sub_entry.items.push(Item::new(sound(10), 0, 5));
        sub_entry.items.push(Item::new(sound(11), 5, 20));

        let mut writer = BinaryWriter::new(Endian::Little);
        writer.seek(100 + SUB_ENTRY_HEADER_SIZE);
        let header = sub_entry.write_items(&mut writer, 100).unwrap();
        writer.seek(100);
        writer.write_record(&header).unwrap();

        assert_eq!(header.count, 2);
        assert_eq!(header.duration_offset, 16);
        assert_eq!(header.item_offset, 16 + 2 * 4);
        assert_eq!(writer.len(), 100 + 16 + 2 * 4 + 2 * 8);

        let bytes = writer.into_inner();
        let mut reader = BinaryReader::new(&bytes, Endian::Little);
        reader.seek(100);
        let header: SubEntryHeader = reader.read_record().unwrap();
        let read = SubEntry::read(&mut reader, 100, &header).unwrap();
        assert_eq!(read, sub_entry);
    }

    #[test]
    fn test_mixed_items_fail_to_write() {
        let mut sub_entry = SubEntry::new(ItemType::Sound);
        sub_entry.items.push(Item::new(sound(1), 0, 1));
        sub_entry
            .items
            .push(Item::new(ItemPayload::Type8(Default::default()), 0, 1));

        let mut writer = BinaryWriter::new(Endian::Little);
        let err = sub_entry.write_items(&mut writer, 0).unwrap_err();
        assert!(matches!(
            err,
            Error::MixedItemTypes {
                expected: ItemType::Sound,
                found: ItemType::Type8
            }
        ));
    }

    #[test]
    fn test_reserved_tag_fails_even_when_empty() {
        let header = SubEntryHeader {
            item_type: 5,
            ..Default::default()
        };
        let mut reader = BinaryReader::new(&[], Endian::Little);
        let err = SubEntry::read(&mut reader, 0, &header).unwrap_err();
        assert!(matches!(err, Error::UnknownItemType { tag: 5 }));
    }

    #[test]
    fn test_relative_offsets() {
        assert_eq!(relative(40, 12).unwrap(), 52);
        assert_eq!(distance(40, 52).unwrap(), 12);
        assert!(relative(usize::MAX, 1).is_err());
    }
}
