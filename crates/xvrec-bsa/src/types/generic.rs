//! Item types whose meaning is unknown; kept as raw fields.

use xvrec_common::fixed_record;

fixed_record! {
    /// Type 2.
    pub struct Type2 {
        pub i_00: u16,
        pub i_02: u16,
        pub f_04: f32,
        pub f_08: f32,
        pub f_0c: f32,
        pub f_10: f32,
    }
}

fixed_record! {
    /// Type 8.
    pub struct Type8 {
        pub i_00: u16,
        pub i_02: u16,
        pub i_04: u32,
        pub i_08: u32,
    }
}
