//! Fixed-size records.
//!
//! A [`FixedRecord`] is a plain struct whose on-disk shape is an ordered list
//! of primitive fields. The [`fixed_record!`](crate::fixed_record) macro
//! declares the struct and derives its layout from the field types, so the
//! in-memory representation stays a normal struct with named fields while the
//! codec only ever sees the layout descriptor.

use crate::{layout_size, pack_into, unpack, Endian, Error, FieldKind, Primitive, Result, Value};

/// A record that is read and written atomically as one fixed-size block.
pub trait FixedRecord: Sized {
    /// Ordered field layout.
    const LAYOUT: &'static [FieldKind];

    /// Encoded size in bytes.
    const SIZE: usize = layout_size(Self::LAYOUT);

    /// Build the record from one value per layout field.
    fn from_values(values: &[Value]) -> Result<Self>;

    /// Flatten the record into one value per layout field.
    fn to_values(&self) -> Vec<Value>;

    /// Decode from the start of `bytes`.
    fn decode(bytes: &[u8], endian: Endian) -> Result<Self> {
        Self::from_values(&unpack(bytes, Self::LAYOUT, endian)?)
    }

    /// Encode, appending to `out`.
    fn encode_into(&self, out: &mut Vec<u8>, endian: Endian) -> Result<()> {
        pack_into(out, &self.to_values(), Self::LAYOUT, endian)
    }

    /// Encode into a fresh buffer.
    fn encode(&self, endian: Endian) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(Self::SIZE);
        self.encode_into(&mut out, endian)?;
        Ok(out)
    }
}

/// Pull field `index` out of a decoded value list as `T`.
pub fn take_field<T: Primitive>(values: &[Value], index: usize) -> Result<T> {
    let value = values.get(index).copied();
    value.and_then(T::from_value).ok_or(Error::ValueMismatch {
        index,
        expected: Some(T::KIND),
        actual: value.map(|v| v.kind()),
    })
}

/// Declare a plain record struct and implement [`FixedRecord`] for it.
///
/// Fields are laid out on disk in declaration order with no padding. Every
/// field type must implement [`Primitive`].
///
/// ```
/// use xvrec_common::{fixed_record, Endian, FixedRecord};
///
/// fixed_record! {
///     /// A start/end pair.
///     pub struct Span {
///         pub start: u16,
///         pub end: u16,
///     }
/// }
///
/// assert_eq!(Span::SIZE, 4);
/// let span = Span::decode(&[1, 0, 2, 0], Endian::Little)?;
/// assert_eq!(span, Span { start: 1, end: 2 });
/// # Ok::<(), xvrec_common::Error>(())
/// ```
#[macro_export]
macro_rules! fixed_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $ty,
            )*
        }

        impl $crate::FixedRecord for $name {
            const LAYOUT: &'static [$crate::FieldKind] = &[
                $( <$ty as $crate::Primitive>::KIND ),*
            ];

            #[allow(unused_assignments)]
            fn from_values(values: &[$crate::Value]) -> $crate::Result<Self> {
                let mut index = 0usize;
                Ok(Self {
                    $(
                        $field: {
                            let value = $crate::__private::take_field::<$ty>(values, index)?;
                            index += 1;
                            value
                        },
                    )*
                })
            }

            fn to_values(&self) -> ::std::vec::Vec<$crate::Value> {
                ::std::vec![ $( $crate::Primitive::into_value(self.$field) ),* ]
            }
        }
    };
}
