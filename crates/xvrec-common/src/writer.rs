//! Seekable in-memory writer.
//!
//! Containers are assembled in memory and written to disk in one call. The
//! writer can seek anywhere, including past the end, which is what the
//! reserve-then-backfill layouts need: skip over a block whose contents are
//! not known yet, emit what follows, then seek back and fill it in.

use crate::{Endian, FixedRecord, Result};

/// A growable byte buffer with a movable write position.
#[derive(Debug, Clone, Default)]
pub struct BinaryWriter {
    data: Vec<u8>,
    position: usize,
    endian: Endian,
}

impl BinaryWriter {
    /// Create an empty writer.
    pub fn new(endian: Endian) -> Self {
        Self {
            data: Vec::new(),
            position: 0,
            endian,
        }
    }

    /// The byte order used for every encode.
    #[inline]
    pub const fn endian(&self) -> Endian {
        self.endian
    }

    /// Current write position.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Length of the data written so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether nothing has been written.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Move the write position. Gaps left behind are zero-filled on the next write.
    #[inline]
    pub fn seek(&mut self, position: usize) {
        self.position = position;
    }

    /// Write raw bytes at the current position, overwriting or extending.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        let end = self.position + bytes.len();
        if self.data.len() < end {
            self.data.resize(end, 0);
        }
        self.data[self.position..end].copy_from_slice(bytes);
        self.position = end;
    }

    /// Write a u32 in the writer's byte order.
    #[inline]
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.write_record(&value)
    }

    /// Write one fixed-size record.
    pub fn write_record<T: FixedRecord>(&mut self, record: &T) -> Result<()> {
        let bytes = record.encode(self.endian)?;
        self.write_bytes(&bytes);
        Ok(())
    }

    /// Write consecutive records.
    pub fn write_records<'r, T, I>(&mut self, records: I) -> Result<()>
    where
        T: FixedRecord + 'r,
        I: IntoIterator<Item = &'r T>,
    {
        for record in records {
            self.write_record(record)?;
        }
        Ok(())
    }

    /// Borrow the data written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the writer, returning the data.
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }
}
