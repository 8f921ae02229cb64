//! Byte-order aware reader over an in-memory file.
//!
//! Record files are small, so containers read the whole file up front and
//! decode from a [`BinaryReader`] positioned at absolute file offsets.

use crate::{unpack, Endian, Error, FieldKind, FixedRecord, Result, Value};

/// A cursor over a byte slice that decodes records in a fixed byte order.
///
/// # Example
///
/// ```
/// use xvrec_common::{BinaryReader, Endian};
///
/// let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
/// let mut reader = BinaryReader::new(&data, Endian::Big);
///
/// assert_eq!(reader.read_u32().unwrap(), 0x01020304);
/// assert_eq!(reader.read_u32().unwrap(), 0x05060708);
/// assert!(reader.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
    endian: Endian,
}

impl<'a> BinaryReader<'a> {
    /// Create a new reader from a byte slice.
    #[inline]
    pub const fn new(data: &'a [u8], endian: Endian) -> Self {
        Self {
            data,
            position: 0,
            endian,
        }
    }

    /// Create a new reader starting at a specific position.
    #[inline]
    pub const fn new_at(data: &'a [u8], position: usize, endian: Endian) -> Self {
        Self {
            data,
            position,
            endian,
        }
    }

    /// The byte order used for every decode.
    #[inline]
    pub const fn endian(&self) -> Endian {
        self.endian
    }

    /// Get the current position in the buffer.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Get the total length of the underlying buffer.
    #[inline]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Get the number of bytes remaining to read.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Check if there are no more bytes to read.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Seek to an absolute position.
    ///
    /// Seeking past the end is allowed; the next read reports the overrun.
    #[inline]
    pub fn seek(&mut self, position: usize) {
        self.position = position;
    }

    /// Seek to an absolute position stored in the file as a `u32`.
    #[inline]
    pub fn seek_to(&mut self, offset: u32) -> Result<()> {
        let position = usize::try_from(offset).map_err(|_| Error::OffsetOutOfRange {
            offset: u64::from(offset),
        })?;
        self.seek(position);
        Ok(())
    }

    /// Get the remaining bytes as a slice.
    #[inline]
    pub fn remaining_bytes(&self) -> &'a [u8] {
        &self.data[self.position.min(self.data.len())..]
    }

    /// Peek at bytes without advancing the position.
    #[inline]
    pub fn peek_bytes(&self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(Error::Layout {
                needed: count,
                available: self.remaining(),
            });
        }
        Ok(&self.data[self.position..self.position + count])
    }

    /// Read bytes and advance the position.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_bytes(count)?;
        self.position += count;
        Ok(bytes)
    }

    /// Read a fixed-size byte array.
    #[inline]
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Read a u32 in the reader's byte order.
    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_record::<u32>()
    }

    /// Decode values for an ad-hoc layout and advance past them.
    pub fn read_values(&mut self, layout: &[FieldKind]) -> Result<Vec<Value>> {
        let values = unpack(self.remaining_bytes(), layout, self.endian)?;
        self.position += crate::layout_size(layout);
        Ok(values)
    }

    /// Read one fixed-size record.
    #[inline]
    pub fn read_record<T: FixedRecord>(&mut self) -> Result<T> {
        let record = T::decode(self.remaining_bytes(), self.endian)?;
        self.position += T::SIZE;
        Ok(record)
    }

    /// Read `count` consecutive records.
    pub fn read_records<T: FixedRecord>(&mut self, count: usize) -> Result<Vec<T>> {
        let needed = count.saturating_mul(T::SIZE);
        if self.remaining() < needed {
            return Err(Error::Layout {
                needed,
                available: self.remaining(),
            });
        }

        let mut records = Vec::with_capacity(count);
        for _ in 0..count {
            records.push(self.read_record()?);
        }
        Ok(records)
    }

    /// Expect specific magic bytes.
    pub fn expect_magic(&mut self, expected: &[u8]) -> Result<()> {
        let actual = self.peek_bytes(expected.len()).unwrap_or(self.remaining_bytes());
        if actual != expected {
            return Err(Error::InvalidMagic {
                expected: expected.to_vec(),
                actual: actual.to_vec(),
            });
        }
        self.position += expected.len();
        Ok(())
    }
}

/// Single primitives are one-field records.
macro_rules! impl_primitive_record {
    ($($ty:ty),*) => {
        $(
            impl FixedRecord for $ty {
                const LAYOUT: &'static [FieldKind] = &[<$ty as crate::Primitive>::KIND];

                fn from_values(values: &[Value]) -> Result<Self> {
                    crate::record::take_field(values, 0)
                }

                fn to_values(&self) -> Vec<Value> {
                    vec![crate::Primitive::into_value(*self)]
                }
            }
        )*
    };
}

impl_primitive_record!(u8, u16, u32, i8, i16, i32, f32);

#[cfg(test)]
mod tests {
    use super::*;

    crate::fixed_record! {
        struct Pair {
            a: u16,
            b: u16,
        }
    }

    #[test]
    fn test_read_records_in_file_order() {
        let data = [0x00, 0x01, 0x00, 0x02, 0x00, 0x03, 0x00, 0x04];
        let mut reader = BinaryReader::new(&data, Endian::Big);

        let pairs: Vec<Pair> = reader.read_records(2).unwrap();
        assert_eq!(pairs[0], Pair { a: 1, b: 2 });
        assert_eq!(pairs[1], Pair { a: 3, b: 4 });
        assert!(reader.is_empty());
    }

    #[test]
    fn test_read_records_overrun_does_not_advance() {
        let data = [0u8; 6];
        let mut reader = BinaryReader::new(&data, Endian::Little);

        let err = reader.read_records::<Pair>(2).unwrap_err();
        assert!(err.is_layout());
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_seek_past_end_reports_overrun() {
        let data = [0u8; 4];
        let mut reader = BinaryReader::new(&data, Endian::Little);
        reader.seek(10);

        assert_eq!(reader.remaining(), 0);
        assert!(reader.read_u32().unwrap_err().is_layout());
    }

    #[test]
    fn test_read_values_ad_hoc_layout() {
        let data = [0x02, 0xFF, 0xFF, 0x00, 0x00, 0x80, 0x3F];
        let mut reader = BinaryReader::new(&data, Endian::Little);

        let values = reader
            .read_values(&[FieldKind::U8, FieldKind::I16, FieldKind::F32])
            .unwrap();
        assert_eq!(values, [Value::U8(2), Value::I16(-1), Value::F32(1.0)]);
        assert!(reader.is_empty());

        reader.seek(4);
        let err = reader.read_values(&[FieldKind::U32]).unwrap_err();
        assert!(err.is_layout());
        assert_eq!(reader.position(), 4);
    }

    #[test]
    fn test_expect_magic() {
        let mut reader = BinaryReader::new(b"#BCM\xFE\xFF", Endian::Little);
        reader.expect_magic(b"#BCM").unwrap();
        assert_eq!(reader.position(), 4);

        let mut reader = BinaryReader::new(b"#BD", Endian::Little);
        let err = reader.expect_magic(b"#BCM").unwrap_err();
        assert!(matches!(err, Error::InvalidMagic { ref actual, .. } if actual == b"#BD"));
    }
}
