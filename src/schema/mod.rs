//! # Opcode Schema Registry
//!
//! Static, declarative layouts of the game messages the comparator knows.
//!
//! ## Layouts
//! ```text
//! 0x03 ObjCreateTeam  [op][owner_slot:u8][team_id:u8][ship_blob:var]        min 3
//! 0x07 StartFiring    [op][event_obj_id:i32][event_data:var]                 min 5
//! 0x08 StopFiring     (as StartFiring)                                       min 5
//! 0x0A SubsysStatus   (as StartFiring)                                       min 5
//! 0x0E StartCloak     [op][object_id:i32]                                    exact 5
//! 0x0F StopCloak      (as StartCloak)                                        exact 5
//! 0x14 DestroyObject  (as StartCloak)                                        exact 5
//! 0x19 TorpedoFire    [op][shooter_id:i32][subsys:u8][flags:u8][vel:cv3]     min 10 + flag trailing
//! 0x1A BeamFire       [op][shooter_id:i32][flags:u8][dir:cv3][more_flags:u8] min 10 + flag trailing
//! 0x1C StateUpdate    [op][object_id:i32][time:f32][dirty:u8][field_data:var] min 10
//! 0x29 Explosion      [op][object_id:i32][impact:cv4][damage:cf16][radius:cf16] exact 14
//! ```
//!
//! ## Components
//! - **Registry**: the opcode → schema table, length rules and field walks
//! - **Field**: encodings, field specs and decoded values
//! - **Trailing**: tagged variants for flag-dependent trailing data
//! - **Dirty**: state-update dirty flags
//! - **Messages**: strict typed decoders for the opcodes with extra rules

pub mod dirty;
pub mod field;
pub mod messages;
pub mod registry;
pub mod trailing;

pub use dirty::DirtyFlags;
pub use field::{Encoding, FieldSpec, FieldValue};
pub use registry::{
    lookup, opcode_name, opcodes, FieldBreakdown, LengthRule, OpcodeSchema, Semantics, REGISTRY,
};
pub use trailing::{BeamTrailing, TorpedoMode, TorpedoTrailing, TrailingLen};
