//! Items that only affect what the player sees and hears.

use xvrec_common::fixed_record;

fixed_record! {
    /// Type 6: spawn an EEPK effect.
    pub struct Effect {
        pub eepk_type: u16,
        pub skill_id: u16,
        pub effect_id: u16,
        pub i_06: u16,
        pub position_x: f32,
        pub position_y: f32,
        pub position_z: f32,
        pub rotation_x: f32,
        pub rotation_y: f32,
        pub rotation_z: f32,
        pub spawn_flags: u32,
    }
}

fixed_record! {
    /// Type 7: play an ACB cue.
    pub struct Sound {
        pub acb_type: u16,
        pub i_02: u16,
        pub cue_id: u16,
        pub i_06: u16,
    }
}
