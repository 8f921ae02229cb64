//! Items that move the user or hand control to another entry.

use xvrec_common::fixed_record;

fixed_record! {
    /// Type 0: jump to another BSA entry when the condition is met.
    pub struct EntryPassing {
        pub condition: u32,
        pub skill_type: u16,
        pub skill_id: u16,
        pub entry_id: u16,
        pub i_0a: u16,
        pub i_0c: u32,
    }
}

fixed_record! {
    /// Type 1: projectile motion.
    pub struct Movement {
        pub flags: u32,
        pub velocity_x: f32,
        pub velocity_y: f32,
        pub velocity_z: f32,
        pub acceleration_x: f32,
        pub acceleration_y: f32,
        pub acceleration_z: f32,
    }
}
