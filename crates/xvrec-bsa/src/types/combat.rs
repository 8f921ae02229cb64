//! Items that deal or absorb damage.

use xvrec_common::fixed_record;

fixed_record! {
    /// Type 3: a damage volume referring to a BDM entry.
    pub struct Hitbox {
        pub matrix_flags: u16,
        pub i_02: u16,
        pub bdm_entry_id: u16,
        pub i_06: u16,
        pub bdm_skill_type: u16,
        pub i_0a: u16,
        pub position_x: f32,
        pub position_y: f32,
        pub position_z: f32,
        pub size: f32,
        pub amount: u16,
        pub i_1e: u16,
    }
}

fixed_record! {
    /// Type 4: deflection behaviour.
    pub struct Deflection {
        pub i_00: u32,
        pub f_04: f32,
        pub f_08: f32,
        pub f_0c: f32,
        pub i_10: u32,
        pub f_14: f32,
    }
}
