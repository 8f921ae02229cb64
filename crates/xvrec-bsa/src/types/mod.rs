//! Typed sub-entry items.
//!
//! Every sub-entry holds items of a single type, selected by the sub-entry's
//! type tag. The set of types is closed:
//!
//! | Tag | Type            | Payload |
//! |-----|-----------------|---------|
//! | 0   | [`EntryPassing`] | 16     |
//! | 1   | [`Movement`]    | 28      |
//! | 2   | [`Type2`]       | 20      |
//! | 3   | [`Hitbox`]      | 32      |
//! | 4   | [`Deflection`]  | 24      |
//! | 6   | [`Effect`]      | 36      |
//! | 7   | [`Sound`]       | 8       |
//! | 8   | [`Type8`]       | 12      |
//!
//! Tag 5 does not exist. Each item also owns a [`Duration`], stored apart
//! from the payloads in the file.

mod combat;
mod generic;
mod motion;
mod presentation;

use xvrec_common::{fixed_record, BinaryReader, BinaryWriter, FixedRecord};

use crate::{Error, Result};

pub use combat::{Deflection, Hitbox};
pub use generic::{Type2, Type8};
pub use motion::{EntryPassing, Movement};
pub use presentation::{Effect, Sound};

fixed_record! {
    /// Active window of an item, in frames.
    pub struct Duration {
        pub start_time: u16,
        pub end_time: u16,
    }
}

/// Item type, keyed by the sub-entry type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum ItemType {
    EntryPassing = 0,
    Movement = 1,
    Type2 = 2,
    Hitbox = 3,
    Deflection = 4,
    Effect = 6,
    Sound = 7,
    Type8 = 8,
}

impl ItemType {
    /// Get all item types in tag order.
    pub const fn all() -> [ItemType; 8] {
        [
            ItemType::EntryPassing,
            ItemType::Movement,
            ItemType::Type2,
            ItemType::Hitbox,
            ItemType::Deflection,
            ItemType::Effect,
            ItemType::Sound,
            ItemType::Type8,
        ]
    }

    /// Look up a type tag.
    ///
    /// Unknown tags (including the unused 5) are fatal: the size of the
    /// items that follow cannot be known.
    pub fn from_tag(tag: u16) -> Result<Self> {
        Ok(match tag {
            0 => ItemType::EntryPassing,
            1 => ItemType::Movement,
            2 => ItemType::Type2,
            3 => ItemType::Hitbox,
            4 => ItemType::Deflection,
            6 => ItemType::Effect,
            7 => ItemType::Sound,
            8 => ItemType::Type8,
            _ => return Err(Error::UnknownItemType { tag }),
        })
    }

    /// The on-disk type tag.
    pub const fn tag(&self) -> u16 {
        *self as u16
    }

    /// Get the name of this item type.
    pub const fn name(&self) -> &'static str {
        match self {
            ItemType::EntryPassing => "EntryPassing",
            ItemType::Movement => "Movement",
            ItemType::Type2 => "Type2",
            ItemType::Hitbox => "Hitbox",
            ItemType::Deflection => "Deflection",
            ItemType::Effect => "Effect",
            ItemType::Sound => "Sound",
            ItemType::Type8 => "Type8",
        }
    }

    /// Encoded size of one payload of this type.
    pub const fn payload_size(&self) -> usize {
        match self {
            ItemType::EntryPassing => EntryPassing::SIZE,
            ItemType::Movement => Movement::SIZE,
            ItemType::Type2 => Type2::SIZE,
            ItemType::Hitbox => Hitbox::SIZE,
            ItemType::Deflection => Deflection::SIZE,
            ItemType::Effect => Effect::SIZE,
            ItemType::Sound => Sound::SIZE,
            ItemType::Type8 => Type8::SIZE,
        }
    }

    /// Read one payload of this type.
    pub(crate) fn read_payload(&self, reader: &mut BinaryReader<'_>) -> Result<ItemPayload> {
        Ok(match self {
            ItemType::EntryPassing => ItemPayload::EntryPassing(reader.read_record()?),
            ItemType::Movement => ItemPayload::Movement(reader.read_record()?),
            ItemType::Type2 => ItemPayload::Type2(reader.read_record()?),
            ItemType::Hitbox => ItemPayload::Hitbox(reader.read_record()?),
            ItemType::Deflection => ItemPayload::Deflection(reader.read_record()?),
            ItemType::Effect => ItemPayload::Effect(reader.read_record()?),
            ItemType::Sound => ItemPayload::Sound(reader.read_record()?),
            ItemType::Type8 => ItemPayload::Type8(reader.read_record()?),
        })
    }
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name(), self.tag())
    }
}

/// A typed item payload.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemPayload {
    EntryPassing(EntryPassing),
    Movement(Movement),
    Type2(Type2),
    Hitbox(Hitbox),
    Deflection(Deflection),
    Effect(Effect),
    Sound(Sound),
    Type8(Type8),
}

impl ItemPayload {
    /// The item type this payload belongs to.
    pub const fn item_type(&self) -> ItemType {
        match self {
            ItemPayload::EntryPassing(_) => ItemType::EntryPassing,
            ItemPayload::Movement(_) => ItemType::Movement,
            ItemPayload::Type2(_) => ItemType::Type2,
            ItemPayload::Hitbox(_) => ItemType::Hitbox,
            ItemPayload::Deflection(_) => ItemType::Deflection,
            ItemPayload::Effect(_) => ItemType::Effect,
            ItemPayload::Sound(_) => ItemType::Sound,
            ItemPayload::Type8(_) => ItemType::Type8,
        }
    }

    pub(crate) fn write(&self, writer: &mut BinaryWriter) -> Result<()> {
        match self {
            ItemPayload::EntryPassing(p) => writer.write_record(p)?,
            ItemPayload::Movement(p) => writer.write_record(p)?,
            ItemPayload::Type2(p) => writer.write_record(p)?,
            ItemPayload::Hitbox(p) => writer.write_record(p)?,
            ItemPayload::Deflection(p) => writer.write_record(p)?,
            ItemPayload::Effect(p) => writer.write_record(p)?,
            ItemPayload::Sound(p) => writer.write_record(p)?,
            ItemPayload::Type8(p) => writer.write_record(p)?,
        }
        Ok(())
    }
}

/// One item of a sub-entry: a payload and its active window.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub duration: Duration,
    pub payload: ItemPayload,
}

impl Item {
    /// Create an item active from `start_time` to `end_time`.
    pub fn new(payload: ItemPayload, start_time: u16, end_time: u16) -> Self {
        Self {
            duration: Duration {
                start_time,
                end_time,
            },
            payload,
        }
    }

    /// The item type of the payload.
    pub const fn item_type(&self) -> ItemType {
        self.payload.item_type()
    }
}
