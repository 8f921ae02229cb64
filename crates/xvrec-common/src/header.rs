//! Shared container preamble.
//!
//! Every record file starts with the same 16 bytes:
//!
//! ```text
//! 0x00  [u8; 4]  signature ("#BCM", "#BDM", "#BSA")
//! 0x04  u16      endianness check (bytes FE FF = little-endian)
//! 0x06  u16      unknown
//! 0x08  u32      entry count
//! 0x0C  u32      data start
//! ```
//!
//! The header proper is the 12 bytes after the signature; it is decoded in
//! the byte order selected by its own first two bytes.

use crate::{fixed_record, BinaryReader, BinaryWriter, Endian, Error, Result};

/// Length of the signature in bytes.
pub const MAGIC_LEN: usize = 4;

/// Size of [`ContainerHeader`] on disk.
pub const HEADER_SIZE: usize = 12;

/// Data start written on every save.
pub const DATA_START: u32 = (MAGIC_LEN + HEADER_SIZE) as u32;

/// Endianness check value that encodes as `FE FF` in little-endian.
pub const ENDIANNESS_CHECK: u16 = 0xFFFE;

fixed_record! {
    /// The 12-byte header following the signature.
    pub struct ContainerHeader {
        /// Raw endianness marker, decoded as a u16.
        pub endianness_check: u16,
        pub u_06: u16,
        /// Number of entries in the container.
        pub num_entries: u32,
        /// Absolute offset of the first entry (or of the entry table).
        pub data_start: u32,
    }
}

impl ContainerHeader {
    /// Prepare the header for writing `num_entries` entries.
    ///
    /// Saves are always little-endian with data starting at 16, whatever the
    /// source file used, so the marker and data start are reset here. A
    /// big-endian source therefore comes back little-endian after a save.
    pub fn canonicalize(&mut self, num_entries: usize) -> Result<()> {
        self.num_entries =
            u32::try_from(num_entries).map_err(|_| Error::CountOverflow { count: num_entries })?;
        self.endianness_check = ENDIANNESS_CHECK;
        self.data_start = DATA_START;
        Ok(())
    }
}

/// Check the signature, select the byte order and decode the header.
///
/// Returns a reader positioned at the header's data start.
pub fn read_preamble<'a>(
    data: &'a [u8],
    magic: &[u8; MAGIC_LEN],
) -> Result<(BinaryReader<'a>, ContainerHeader)> {
    let mut reader = BinaryReader::new(data, Endian::Little);
    reader.expect_magic(magic)?;
    let endian = Endian::from_marker(reader.read_array::<2>()?);

    let mut reader = BinaryReader::new_at(data, MAGIC_LEN, endian);
    let header: ContainerHeader = reader.read_record()?;
    reader.seek_to(header.data_start)?;

    Ok((reader, header))
}

/// Start a little-endian output buffer with the signature and header.
///
/// `header` is canonicalized for `num_entries` before being written; the
/// returned writer is positioned at [`DATA_START`].
pub fn write_preamble(
    magic: &[u8; MAGIC_LEN],
    header: &mut ContainerHeader,
    num_entries: usize,
) -> Result<BinaryWriter> {
    header.canonicalize(num_entries)?;

    let mut writer = BinaryWriter::new(Endian::Little);
    writer.write_bytes(magic);
    writer.write_record(header)?;
    writer.seek(DATA_START as usize);
    Ok(writer)
}

/// Translate an entry index into its absolute file address.
///
/// Index 0 maps to the 0 sentinel, which stands for "the data start".
pub const fn index_to_address(index: usize, entry_size: usize) -> usize {
    if index == 0 {
        0
    } else {
        index * entry_size + (HEADER_SIZE + MAGIC_LEN)
    }
}

/// Translate an absolute file address back into an entry index.
///
/// Address 0 maps to index 0.
pub const fn address_to_index(address: usize, entry_size: usize) -> usize {
    if address == 0 {
        0
    } else {
        address.saturating_sub(HEADER_SIZE + MAGIC_LEN) / entry_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FixedRecord;

    #[test]
    fn test_header_size() {
        assert_eq!(ContainerHeader::SIZE, HEADER_SIZE);
    }

    #[test]
    fn test_read_preamble_big_endian() {
        let mut data = b"#BCM".to_vec();
        data.extend_from_slice(&[0xFF, 0xFE, 0x00, 0x00]);
        data.extend_from_slice(&[0x00, 0x00, 0x00, 0x03]);
        data.extend_from_slice(&[0x00, 0x00, 0x00, 0x14]);

        let (reader, header) = read_preamble(&data, b"#BCM").unwrap();
        assert_eq!(reader.endian(), Endian::Big);
        assert_eq!(reader.position(), 0x14);
        assert_eq!(header.num_entries, 3);
        assert_eq!(header.data_start, 0x14);
    }

    #[test]
    fn test_read_preamble_rejects_wrong_magic() {
        let data = b"#BDM\xFE\xFF\0\0\0\0\0\0\x10\0\0\0";
        let err = read_preamble(data, b"#BCM").unwrap_err();
        assert!(matches!(err, Error::InvalidMagic { .. }));
    }

    #[test]
    fn test_write_preamble_canonicalizes() {
        let mut header = ContainerHeader {
            endianness_check: 0x1234,
            u_06: 7,
            num_entries: 99,
            data_start: 0x40,
        };

        let writer = write_preamble(b"#BSA", &mut header, 2).unwrap();
        assert_eq!(writer.position(), 16);
        assert_eq!(
            writer.as_bytes(),
            b"#BSA\xFE\xFF\x07\x00\x02\x00\x00\x00\x10\x00\x00\x00"
        );
        assert_eq!(header.num_entries, 2);
        assert_eq!(header.data_start, DATA_START);
    }

    #[test]
    fn test_address_index_sentinel() {
        assert_eq!(index_to_address(0, 112), 0);
        assert_eq!(address_to_index(0, 112), 0);
        assert_eq!(index_to_address(1, 112), 128);
        assert_eq!(address_to_index(128, 112), 1);
    }

    #[test]
    fn test_address_index_inverse() {
        for index in 0..500 {
            let address = index_to_address(index, 112);
            assert_eq!(address_to_index(address, 112), index);
            assert_eq!(index_to_address(address_to_index(address, 112), 112), address);
        }
    }
}
