//! Common utilities for xvrec.
//!
//! This crate provides the foundational codec layer shared by every record
//! container format:
//!
//! - [`Endian`], [`FieldKind`], [`Value`] and [`pack`]/[`unpack`] - the
//!   primitive codec driven by an ordered field layout
//! - [`FixedRecord`] and [`fixed_record!`] - plain structs with a layout
//!   descriptor derived from their field declarations
//! - [`BinaryReader`] / [`BinaryWriter`] - byte-order aware cursors over
//!   in-memory buffers
//! - [`ContainerHeader`] and the [`header`] helpers - signature, endianness
//!   marker and the shared 12-byte header
//! - [`comment`] - the per-entry comment sidecar files

mod error;
mod primitive;
mod reader;
mod record;
mod writer;

pub mod comment;
pub mod header;

pub use error::{Error, Result};
pub use header::ContainerHeader;
pub use primitive::{layout_size, pack, pack_into, unpack, Endian, FieldKind, Primitive, Value};
pub use reader::BinaryReader;
pub use record::FixedRecord;
pub use writer::BinaryWriter;

#[doc(hidden)]
pub mod __private {
    pub use crate::record::take_field;
}
