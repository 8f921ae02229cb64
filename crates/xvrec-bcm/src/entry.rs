//! BCM entry records.

use xvrec_common::comment::Commented;
use xvrec_common::{fixed_record, header, BinaryReader, Result};

/// Size of one BCM entry on disk.
pub const BCM_ENTRY_SIZE: usize = 112;

fixed_record! {
    /// The on-disk fields of a BCM entry, in file order.
    ///
    /// Link fields (`sibling`, `child`, `parent`, `root`) hold absolute entry
    /// addresses; see [`index_to_address`].
    pub struct BcmEntryData {
        pub u_00: u32,
        pub directional_input: u32,
        pub button_input: u32,
        pub hold_down_conditions: u32,
        pub opponent_size_conditions: u32, // 0x10
        pub minimum_loop_duration: i16,
        pub maximum_loop_duration: i16,
        pub primary_activator_conditions: u32, // 0x18
        pub activator_state: u32, // 0x1C
        pub bac_entry_primary: u16, // 0x20
        pub bac_entry_charge: u16, // 0x22
        pub u_24: u16,
        pub bac_entry_user_connect: u16, // 0x26
        pub bac_entry_victim_connect: u16,
        pub bac_entry_airborne: u16,
        pub bac_entry_unknown: u16,
        pub random_flag: u16,
        pub sibling: u32,
        pub child: u32,
        pub parent: u32,
        pub root: u32,
        pub ki_cost: u32,
        pub u_44: u32,
        pub u_48: u32,
        pub receiver_link_id: u32,
        pub u_50: u32,
        pub stamina_cost: u32,
        pub u_58: u32,
        pub ki_required: u32, // 0x5C
        pub health_required: f32, // 0x60
        pub trans_stage: i16, // 0x64
        pub cus_aura: i16, // 0x66
        pub u_68: u16,
        pub u_6a: u16,
        pub u_6c: u32,
    }
}

/// A BCM entry: its fields plus the address it was loaded from.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BcmEntry {
    /// Absolute file offset of the entry, or 0.
    ///
    /// Entry 0 always has address 0, meaning "at the data start". Entries
    /// created in memory also start at 0 and are placed by index on save.
    pub address: usize,
    /// The on-disk fields.
    pub data: BcmEntryData,
    comment: String,
}

impl BcmEntry {
    /// Create an entry that has no file address yet.
    pub fn new(data: BcmEntryData) -> Self {
        Self {
            address: 0,
            data,
            comment: String::new(),
        }
    }

    /// Read the entry at the reader's position, tagging it with `address`.
    pub(crate) fn read(reader: &mut BinaryReader<'_>, address: usize) -> Result<Self> {
        Ok(Self {
            address,
            data: reader.read_record()?,
            comment: String::new(),
        })
    }
}

impl Commented for BcmEntry {
    fn comment(&self) -> &str {
        &self.comment
    }

    fn set_comment(&mut self, comment: &str) {
        self.comment = comment.trim_end().to_string();
    }
}

/// Translate an entry index into its absolute file address (0 for index 0).
pub const fn index_to_address(index: usize) -> usize {
    header::index_to_address(index, BCM_ENTRY_SIZE)
}

/// Translate an absolute file address into an entry index (0 for address 0).
pub const fn address_to_index(address: usize) -> usize {
    header::address_to_index(address, BCM_ENTRY_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use xvrec_common::{Endian, FixedRecord};

    #[test]
    fn test_entry_size() {
        assert_eq!(BcmEntryData::SIZE, BCM_ENTRY_SIZE);
        assert_eq!(BcmEntryData::LAYOUT.len(), 35);
    }

    #[test]
    fn test_field_offsets() {
        let data = BcmEntryData {
            bac_entry_primary: 0x1111,
            ki_required: 0x2222_2222,
            health_required: 1.0,
            u_6c: 0x3333_3333,
            ..Default::default()
        };
        let bytes = data.encode(Endian::Little).unwrap();

        assert_eq!(&bytes[0x20..0x22], &[0x11, 0x11]);
        assert_eq!(&bytes[0x5C..0x60], &[0x22; 4]);
        assert_eq!(&bytes[0x60..0x64], &1.0f32.to_le_bytes());
        assert_eq!(&bytes[0x6C..0x70], &[0x33; 4]);
    }

    #[test]
    fn test_address_index() {
        assert_eq!(index_to_address(0), 0);
        assert_eq!(index_to_address(2), 240);
        assert_eq!(address_to_index(240), 2);
        assert_eq!(address_to_index(0), 0);
        for index in 0..256 {
            assert_eq!(address_to_index(index_to_address(index)), index);
        }
    }
}
