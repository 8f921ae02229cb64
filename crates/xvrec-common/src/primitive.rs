//! Primitive field codec.
//!
//! A record layout is an ordered slice of [`FieldKind`]s. [`unpack`] turns a
//! byte buffer into one [`Value`] per field and [`pack`] does the reverse, both
//! in the byte order chosen at runtime for the file being processed.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::{Error, Result};

/// Byte order of a record file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Endian {
    /// Little-endian, the only order ever written.
    #[default]
    Little,
    /// Big-endian, accepted on read only.
    Big,
}

impl Endian {
    /// Marker bytes identifying a little-endian file.
    pub const LITTLE_MARKER: [u8; 2] = [0xFE, 0xFF];

    /// Select the byte order from the two marker bytes at offset 4.
    ///
    /// Anything other than `FE FF` is big-endian.
    pub fn from_marker(marker: [u8; 2]) -> Self {
        if marker == Self::LITTLE_MARKER {
            Endian::Little
        } else {
            Endian::Big
        }
    }

    /// Short human-readable name.
    pub const fn name(&self) -> &'static str {
        match self {
            Endian::Little => "little",
            Endian::Big => "big",
        }
    }
}

/// A primitive field type in a record layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    U8,
    U16,
    U32,
    I8,
    I16,
    I32,
    F32,
}

impl FieldKind {
    /// Encoded size in bytes.
    pub const fn size(&self) -> usize {
        match self {
            FieldKind::U8 | FieldKind::I8 => 1,
            FieldKind::U16 | FieldKind::I16 => 2,
            FieldKind::U32 | FieldKind::I32 | FieldKind::F32 => 4,
        }
    }
}

/// One decoded field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    U8(u8),
    U16(u16),
    U32(u32),
    I8(i8),
    I16(i16),
    I32(i32),
    F32(f32),
}

impl Value {
    /// The field kind this value encodes as.
    pub const fn kind(&self) -> FieldKind {
        match self {
            Value::U8(_) => FieldKind::U8,
            Value::U16(_) => FieldKind::U16,
            Value::U32(_) => FieldKind::U32,
            Value::I8(_) => FieldKind::I8,
            Value::I16(_) => FieldKind::I16,
            Value::I32(_) => FieldKind::I32,
            Value::F32(_) => FieldKind::F32,
        }
    }
}

/// Rust types that map one-to-one onto a [`FieldKind`].
pub trait Primitive: Copy + Default {
    /// The layout tag for this type.
    const KIND: FieldKind;

    /// Wrap into a [`Value`].
    fn into_value(self) -> Value;

    /// Unwrap from a [`Value`], or `None` if the kind differs.
    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! impl_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Primitive for $ty {
                const KIND: FieldKind = FieldKind::$variant;

                #[inline]
                fn into_value(self) -> Value {
                    Value::$variant(self)
                }

                #[inline]
                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_primitive! {
    u8 => U8,
    u16 => U16,
    u32 => U32,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    f32 => F32,
}

/// Total encoded size of a layout.
pub const fn layout_size(layout: &[FieldKind]) -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < layout.len() {
        total += layout[i].size();
        i += 1;
    }
    total
}

/// Decode one value per layout field from the start of `bytes`.
///
/// Fails with [`Error::Layout`] if `bytes` is shorter than the layout.
/// Trailing bytes are ignored.
pub fn unpack(bytes: &[u8], layout: &[FieldKind], endian: Endian) -> Result<Vec<Value>> {
    let needed = layout_size(layout);
    if bytes.len() < needed {
        return Err(Error::Layout {
            needed,
            available: bytes.len(),
        });
    }

    Ok(match endian {
        Endian::Little => unpack_with::<LittleEndian>(bytes, layout),
        Endian::Big => unpack_with::<BigEndian>(bytes, layout),
    })
}

fn unpack_with<B: ByteOrder>(bytes: &[u8], layout: &[FieldKind]) -> Vec<Value> {
    let mut values = Vec::with_capacity(layout.len());
    let mut pos = 0;

    for kind in layout {
        let field = &bytes[pos..pos + kind.size()];
        values.push(match kind {
            FieldKind::U8 => Value::U8(field[0]),
            FieldKind::I8 => Value::I8(field[0] as i8),
            FieldKind::U16 => Value::U16(B::read_u16(field)),
            FieldKind::I16 => Value::I16(B::read_i16(field)),
            FieldKind::U32 => Value::U32(B::read_u32(field)),
            FieldKind::I32 => Value::I32(B::read_i32(field)),
            FieldKind::F32 => Value::F32(B::read_f32(field)),
        });
        pos += kind.size();
    }

    values
}

/// Encode `values` against `layout` into a fresh buffer.
pub fn pack(values: &[Value], layout: &[FieldKind], endian: Endian) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(layout_size(layout));
    pack_into(&mut out, values, layout, endian)?;
    Ok(out)
}

/// Encode `values` against `layout`, appending to `out`.
///
/// The whole value list is checked before anything is appended, so on error
/// `out` is left untouched.
pub fn pack_into(
    out: &mut Vec<u8>,
    values: &[Value],
    layout: &[FieldKind],
    endian: Endian,
) -> Result<()> {
    check_values(values, layout)?;

    let start = out.len();
    out.resize(start + layout_size(layout), 0);
    let buf = &mut out[start..];

    match endian {
        Endian::Little => pack_with::<LittleEndian>(buf, values),
        Endian::Big => pack_with::<BigEndian>(buf, values),
    }
    Ok(())
}

fn check_values(values: &[Value], layout: &[FieldKind]) -> Result<()> {
    for index in 0..values.len().max(layout.len()) {
        let expected = layout.get(index).copied();
        let actual = values.get(index).map(Value::kind);
        if expected != actual {
            return Err(Error::ValueMismatch {
                index,
                expected,
                actual,
            });
        }
    }
    Ok(())
}

fn pack_with<B: ByteOrder>(buf: &mut [u8], values: &[Value]) {
    let mut pos = 0;

    for value in values {
        let field = &mut buf[pos..pos + value.kind().size()];
        match *value {
            Value::U8(v) => field[0] = v,
            Value::I8(v) => field[0] = v as u8,
            Value::U16(v) => B::write_u16(field, v),
            Value::I16(v) => B::write_i16(field, v),
            Value::U32(v) => B::write_u32(field, v),
            Value::I32(v) => B::write_i32(field, v),
            Value::F32(v) => B::write_f32(field, v),
        }
        pos += value.kind().size();
    }
}
