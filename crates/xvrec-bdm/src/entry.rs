//! BDM entry records, canonical and legacy.
//!
//! A BDM entry is an id followed by ten damage sub-entries. Two shapes exist
//! for the sub-entry: the canonical 100-byte layout, and an older 76-byte
//! layout with narrower stumble/camera fields and no ki, stamina or BPE
//! fields. Legacy entries are upgraded with `From` as soon as they are read.

use xvrec_common::comment::Commented;
use xvrec_common::{fixed_record, BinaryReader, BinaryWriter, FixedRecord, Result};

/// Number of damage sub-entries per entry.
pub const BDM_SUB_ENTRY_COUNT: usize = 10;

/// Size of a canonical entry on disk.
pub const BDM_ENTRY_SIZE: usize = 4 + BDM_SUB_ENTRY_COUNT * BdmSubEntry::SIZE;

/// Size of a legacy entry on disk.
pub const LEGACY_BDM_ENTRY_SIZE: usize = 4 + BDM_SUB_ENTRY_COUNT * LegacyBdmSubEntry::SIZE;

fixed_record! {
    /// A damage sub-entry in the canonical layout (100 bytes).
    pub struct BdmSubEntry {
        pub damage_type: u16,
        pub u_02: u16,
        pub damage_amount: u16,
        pub u_06: u16,
        pub acb_type: i16,
        pub cue_id: i16,
        pub effect_id_1: i16,
        pub effect_skill_id_1: i16,
        pub effect_skill_type_1: i16,
        pub effect_id_2: i16,
        pub effect_skill_id_2: i16,
        pub effect_skill_type_2: i16,
        pub effect_id_3: i16,
        pub effect_skill_id_3: i16,
        pub effect_skill_type_3: i16,
        pub u_1e: u16,
        pub pushback_strength: f32, // 0x20
        pub pushback_acceleration: f32,
        pub user_stun: u16, // 0x28
        pub victim_stun: u16,
        pub knockback_duration: u16,
        pub knockback_ground_impact_time: u16,
        pub knockback_recovery_after_impact_time: u16,
        pub knockback_gravity_time: u16,
        pub knockback_strength_x: f32, // 0x34
        pub knockback_strength_y: f32,
        pub knockback_strength_z: f32,
        pub knockback_drag_y: f32,
        pub victim_invincibility_time: u16, // 0x44
        pub u_46: u16,
        pub transformation_type: u16,
        pub u_4a: u16,
        pub stumble_type: u16, // 0x4C
        pub u_4e: u16,
        pub ki_damage: u16, // 0x50
        pub u_52: u16,
        pub stamina_damage: u16,
        pub u_56: u16,
        pub camera_shake_type: u16, // 0x58
        pub camera_shake_time: u16,
        pub user_bpe_id: u16,
        pub victim_bpe_id: u16,
        pub u_60: u32,
    }
}

fixed_record! {
    /// A damage sub-entry in the legacy layout (76 bytes).
    ///
    /// Shares the first 0x44 bytes with [`BdmSubEntry`].
    pub struct LegacyBdmSubEntry {
        pub damage_type: u16,
        pub u_02: u16,
        pub damage_amount: u16,
        pub u_06: u16,
        pub acb_type: i16,
        pub cue_id: i16,
        pub effect_id_1: i16,
        pub effect_skill_id_1: i16,
        pub effect_skill_type_1: i16,
        pub effect_id_2: i16,
        pub effect_skill_id_2: i16,
        pub effect_skill_type_2: i16,
        pub effect_id_3: i16,
        pub effect_skill_id_3: i16,
        pub effect_skill_type_3: i16,
        pub u_1e: u16,
        pub pushback_strength: f32,
        pub pushback_acceleration: f32,
        pub user_stun: u16,
        pub victim_stun: u16,
        pub knockback_duration: u16,
        pub knockback_ground_impact_time: u16,
        pub knockback_recovery_after_impact_time: u16,
        pub knockback_gravity_time: u16,
        pub knockback_strength_x: f32,
        pub knockback_strength_y: f32,
        pub knockback_strength_z: f32,
        pub knockback_drag_y: f32,
        pub victim_invincibility_time: u16, // 0x44
        pub transformation_type: u16,
        pub stumble_type: u8, // 0x48
        pub camera_shake_type: u8,
        pub camera_shake_time: u16,
    }
}

impl From<LegacyBdmSubEntry> for BdmSubEntry {
    fn from(legacy: LegacyBdmSubEntry) -> Self {
        Self {
            damage_type: legacy.damage_type,
            u_02: legacy.u_02,
            damage_amount: legacy.damage_amount,
            u_06: legacy.u_06,
            acb_type: legacy.acb_type,
            cue_id: legacy.cue_id,
            effect_id_1: legacy.effect_id_1,
            effect_skill_id_1: legacy.effect_skill_id_1,
            effect_skill_type_1: legacy.effect_skill_type_1,
            effect_id_2: legacy.effect_id_2,
            effect_skill_id_2: legacy.effect_skill_id_2,
            effect_skill_type_2: legacy.effect_skill_type_2,
            effect_id_3: legacy.effect_id_3,
            effect_skill_id_3: legacy.effect_skill_id_3,
            effect_skill_type_3: legacy.effect_skill_type_3,
            u_1e: legacy.u_1e,
            pushback_strength: legacy.pushback_strength,
            pushback_acceleration: legacy.pushback_acceleration,
            user_stun: legacy.user_stun,
            victim_stun: legacy.victim_stun,
            knockback_duration: legacy.knockback_duration,
            knockback_ground_impact_time: legacy.knockback_ground_impact_time,
            knockback_recovery_after_impact_time: legacy.knockback_recovery_after_impact_time,
            knockback_gravity_time: legacy.knockback_gravity_time,
            knockback_strength_x: legacy.knockback_strength_x,
            knockback_strength_y: legacy.knockback_strength_y,
            knockback_strength_z: legacy.knockback_strength_z,
            knockback_drag_y: legacy.knockback_drag_y,
            victim_invincibility_time: legacy.victim_invincibility_time,
            transformation_type: legacy.transformation_type,
            stumble_type: u16::from(legacy.stumble_type),
            camera_shake_type: u16::from(legacy.camera_shake_type),
            camera_shake_time: legacy.camera_shake_time,
            // Not present in the legacy layout.
            u_46: 0,
            u_4a: 0,
            u_4e: 0,
            ki_damage: 0,
            u_52: 0,
            stamina_damage: 0,
            u_56: 0,
            user_bpe_id: 0,
            victim_bpe_id: 0,
            u_60: 0,
        }
    }
}

/// A BDM entry in canonical form.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BdmEntry {
    /// Entry id referenced by BAC/BSA hitboxes.
    pub id: u32,
    /// The ten damage sub-entries.
    pub sub_entries: [BdmSubEntry; BDM_SUB_ENTRY_COUNT],
    comment: String,
}

impl BdmEntry {
    /// Create an entry with all sub-entries zeroed.
    pub fn new(id: u32) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub(crate) fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let id = reader.read_u32()?;
        let mut sub_entries = [BdmSubEntry::default(); BDM_SUB_ENTRY_COUNT];
        for sub_entry in &mut sub_entries {
            *sub_entry = reader.read_record()?;
        }

        Ok(Self {
            id,
            sub_entries,
            comment: String::new(),
        })
    }

    pub(crate) fn write(&self, writer: &mut BinaryWriter) -> Result<()> {
        writer.write_u32(self.id)?;
        writer.write_records(&self.sub_entries)
    }
}

impl Commented for BdmEntry {
    fn comment(&self) -> &str {
        &self.comment
    }

    fn set_comment(&mut self, comment: &str) {
        self.comment = comment.trim_end().to_string();
    }
}

/// A BDM entry in the legacy layout. Only exists between read and upgrade.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegacyBdmEntry {
    pub id: u32,
    pub sub_entries: [LegacyBdmSubEntry; BDM_SUB_ENTRY_COUNT],
}

impl LegacyBdmEntry {
    pub(crate) fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let id = reader.read_u32()?;
        let mut sub_entries = [LegacyBdmSubEntry::default(); BDM_SUB_ENTRY_COUNT];
        for sub_entry in &mut sub_entries {
            *sub_entry = reader.read_record()?;
        }

        Ok(Self { id, sub_entries })
    }
}

impl From<LegacyBdmEntry> for BdmEntry {
    fn from(legacy: LegacyBdmEntry) -> Self {
        Self {
            id: legacy.id,
            sub_entries: legacy.sub_entries.map(BdmSubEntry::from),
            comment: String::new(),
        }
    }
}
