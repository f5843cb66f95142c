use crate::core::reader::WireReader;
use crate::schema::field::{decode_field, Encoding, FieldSpec, FieldValue};
use serde::Serialize;
use std::fmt;

/// Opcode bytes of the messages the registry knows, plus the checksum response.
pub mod opcodes {
    pub const OBJ_CREATE_TEAM: u8 = 0x03;
    pub const START_FIRING: u8 = 0x07;
    pub const STOP_FIRING: u8 = 0x08;
    pub const SUBSYS_STATUS: u8 = 0x0A;
    pub const START_CLOAK: u8 = 0x0E;
    pub const STOP_CLOAK: u8 = 0x0F;
    pub const DESTROY_OBJECT: u8 = 0x14;
    pub const TORPEDO_FIRE: u8 = 0x19;
    pub const BEAM_FIRE: u8 = 0x1A;
    pub const STATE_UPDATE: u8 = 0x1C;
    pub const CHECKSUM_RESPONSE: u8 = 0x21;
    pub const EXPLOSION: u8 = 0x29;
}

/// Payload length constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LengthRule {
    Exact(usize),
    Minimum(usize),
}

impl LengthRule {
    pub fn accepts(self, len: usize) -> bool {
        match self {
            LengthRule::Exact(n) => len == n,
            LengthRule::Minimum(n) => len >= n,
        }
    }

    pub fn bytes(self) -> usize {
        match self {
            LengthRule::Exact(n) | LengthRule::Minimum(n) => n,
        }
    }
}

/// Opcode-specific rule set applied after the generic field walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Semantics {
    Plain,
    BeamFire,
    TorpedoFire,
    Explosion,
    StateUpdate,
}

/// Declarative layout of one message type.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct OpcodeSchema {
    pub opcode: u8,
    pub name: &'static str,
    pub fields: &'static [FieldSpec],
    pub length: LengthRule,
    pub semantics: Semantics,
}

impl OpcodeSchema {
    /// Fixed fields with their byte offsets, stopping at the first variable field.
    pub fn fixed_fields(&self) -> impl Iterator<Item = (usize, &'static FieldSpec)> {
        self.fields
            .iter()
            .take_while(|f| !f.is_variable())
            .scan(0usize, |offset, f| {
                let at = *offset;
                *offset += f.width();
                Some((at, f))
            })
    }

    /// Total width of the fixed fields.
    pub fn fixed_len(&self) -> usize {
        self.fields.iter().map(FieldSpec::width).sum()
    }

    pub fn has_variable_tail(&self) -> bool {
        self.fields.last().is_some_and(FieldSpec::is_variable)
    }

    /// Annotated per-field view of `payload`.
    pub fn breakdown(&self, payload: &[u8]) -> Vec<FieldBreakdown> {
        let mut reader = WireReader::new(payload);
        let mut out = Vec::with_capacity(self.fields.len());
        for field in self.fields {
            let offset = reader.position();
            match decode_field(&mut reader, field) {
                Ok(value) => out.push(FieldBreakdown {
                    name: field.name,
                    encoding: field.encoding,
                    offset,
                    value: Some(value),
                }),
                Err(_) => {
                    out.push(FieldBreakdown {
                        name: field.name,
                        encoding: field.encoding,
                        offset,
                        value: None,
                    });
                    break;
                }
            }
        }
        out
    }
}

/// One line of a field breakdown; `value` is `None` where the payload ran out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldBreakdown {
    pub name: &'static str,
    pub encoding: Encoding,
    pub offset: usize,
    pub value: Option<FieldValue>,
}

impl fmt::Display for FieldBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(v) => write!(f, "[{:>3}] {} ({}) = {v}", self.offset, self.name, self.encoding),
            None => write!(f, "[{:>3}] {} ({}) <TRUNCATED>", self.offset, self.name, self.encoding),
        }
    }
}

const fn field(name: &'static str, encoding: Encoding) -> FieldSpec {
    FieldSpec::new(name, encoding)
}

const OPCODE: FieldSpec = field("opcode", Encoding::U8);

const OBJ_CREATE_TEAM_FIELDS: &[FieldSpec] = &[
    OPCODE,
    field("owner_slot", Encoding::U8),
    field("team_id", Encoding::U8),
    field("ship_blob", Encoding::Var),
];

const EVENT_FIELDS: &[FieldSpec] = &[
    OPCODE,
    field("event_obj_id", Encoding::I32),
    field("event_data", Encoding::Var),
];

const OBJECT_FIELDS: &[FieldSpec] = &[OPCODE, field("object_id", Encoding::I32)];

const TORPEDO_FIRE_FIELDS: &[FieldSpec] = &[
    OPCODE,
    field("shooter_id", Encoding::I32),
    field("subsys_index", Encoding::U8),
    field("flags", Encoding::U8),
    field("velocity", Encoding::Cv3),
];

const BEAM_FIRE_FIELDS: &[FieldSpec] = &[
    OPCODE,
    field("shooter_id", Encoding::I32),
    field("flags", Encoding::U8),
    field("direction", Encoding::Cv3),
    field("more_flags", Encoding::U8),
];

const STATE_UPDATE_FIELDS: &[FieldSpec] = &[
    OPCODE,
    field("object_id", Encoding::I32),
    field("game_time", Encoding::F32),
    field("dirty_flags", Encoding::U8),
    field("field_data", Encoding::Var),
];

const EXPLOSION_FIELDS: &[FieldSpec] = &[
    OPCODE,
    field("object_id", Encoding::I32),
    field("impact", Encoding::Cv4),
    field("damage", Encoding::Cf16),
    field("radius", Encoding::Cf16),
];

const fn schema(
    opcode: u8,
    name: &'static str,
    fields: &'static [FieldSpec],
    length: LengthRule,
    semantics: Semantics,
) -> OpcodeSchema {
    OpcodeSchema {
        opcode,
        name,
        fields,
        length,
        semantics,
    }
}

/// Every registered schema, ascending by opcode.
pub static REGISTRY: [OpcodeSchema; 11] = [
    schema(
        opcodes::OBJ_CREATE_TEAM,
        "ObjCreateTeam",
        OBJ_CREATE_TEAM_FIELDS,
        LengthRule::Minimum(3),
        Semantics::Plain,
    ),
    schema(
        opcodes::START_FIRING,
        "StartFiring",
        EVENT_FIELDS,
        LengthRule::Minimum(5),
        Semantics::Plain,
    ),
    schema(
        opcodes::STOP_FIRING,
        "StopFiring",
        EVENT_FIELDS,
        LengthRule::Minimum(5),
        Semantics::Plain,
    ),
    schema(
        opcodes::SUBSYS_STATUS,
        "SubsysStatus",
        EVENT_FIELDS,
        LengthRule::Minimum(5),
        Semantics::Plain,
    ),
    schema(
        opcodes::START_CLOAK,
        "StartCloak",
        OBJECT_FIELDS,
        LengthRule::Exact(5),
        Semantics::Plain,
    ),
    schema(
        opcodes::STOP_CLOAK,
        "StopCloak",
        OBJECT_FIELDS,
        LengthRule::Exact(5),
        Semantics::Plain,
    ),
    schema(
        opcodes::DESTROY_OBJECT,
        "DestroyObject",
        OBJECT_FIELDS,
        LengthRule::Exact(5),
        Semantics::Plain,
    ),
    schema(
        opcodes::TORPEDO_FIRE,
        "TorpedoFire",
        TORPEDO_FIRE_FIELDS,
        LengthRule::Minimum(10),
        Semantics::TorpedoFire,
    ),
    schema(
        opcodes::BEAM_FIRE,
        "BeamFire",
        BEAM_FIRE_FIELDS,
        LengthRule::Minimum(10),
        Semantics::BeamFire,
    ),
    schema(
        opcodes::STATE_UPDATE,
        "StateUpdate",
        STATE_UPDATE_FIELDS,
        LengthRule::Minimum(10),
        Semantics::StateUpdate,
    ),
    schema(
        opcodes::EXPLOSION,
        "Explosion",
        EXPLOSION_FIELDS,
        LengthRule::Exact(14),
        Semantics::Explosion,
    ),
];

/// Schema registered for `opcode`.
pub fn lookup(opcode: u8) -> Option<&'static OpcodeSchema> {
    REGISTRY
        .binary_search_by_key(&opcode, |s| s.opcode)
        .ok()
        .map(|i| &REGISTRY[i])
}

pub fn is_known(opcode: u8) -> bool {
    lookup(opcode).is_some()
}

/// Display name of an opcode, `"Unknown"` when unregistered.
pub fn opcode_name(opcode: u8) -> &'static str {
    match opcode {
        opcodes::CHECKSUM_RESPONSE => "ChecksumResponse",
        _ => lookup(opcode).map_or("Unknown", |s| s.name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_sorted_and_unique() {
        assert!(REGISTRY.windows(2).all(|w| w[0].opcode < w[1].opcode));
    }

    #[test]
    fn test_var_field_is_last() {
        for s in &REGISTRY {
            let var_positions: Vec<usize> = s
                .fields
                .iter()
                .enumerate()
                .filter(|(_, f)| f.is_variable())
                .map(|(i, _)| i)
                .collect();
            assert!(var_positions.len() <= 1, "{}", s.name);
            if let Some(&i) = var_positions.first() {
                assert_eq!(i, s.fields.len() - 1, "{}", s.name);
            }
        }
    }

    #[test]
    fn test_fixed_len_agrees_with_length_rule() {
        for s in &REGISTRY {
            match s.length {
                LengthRule::Exact(n) => {
                    assert!(!s.has_variable_tail());
                    assert_eq!(s.fixed_len(), n, "{}", s.name);
                }
                LengthRule::Minimum(n) => assert_eq!(s.fixed_len(), n, "{}", s.name),
            }
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(lookup(0x29).map(|s| s.name), Some("Explosion"));
        assert_eq!(lookup(0x1A).map(|s| s.semantics), Some(Semantics::BeamFire));
        assert!(lookup(0x21).is_none());
        assert_eq!(opcode_name(0x21), "ChecksumResponse");
        assert_eq!(opcode_name(0xEE), "Unknown");
    }

    #[test]
    fn test_fixed_field_offsets() {
        let beam = lookup(opcodes::BEAM_FIRE);
        let offsets: Vec<(usize, &str)> = beam
            .into_iter()
            .flat_map(|s| s.fixed_fields())
            .map(|(o, f)| (o, f.name))
            .collect();
        assert_eq!(
            offsets,
            vec![
                (0, "opcode"),
                (1, "shooter_id"),
                (5, "flags"),
                (6, "direction"),
                (9, "more_flags")
            ]
        );
    }

    #[test]
    fn test_breakdown_marks_truncation() {
        let Some(s) = lookup(opcodes::EXPLOSION) else {
            panic!("explosion registered");
        };
        let rows = s.breakdown(&[0x29, 1, 0, 0, 0, 0x1D]);
        assert_eq!(rows.len(), 3);
        assert!(rows[1].value.is_some());
        assert!(rows[2].value.is_none());
        assert!(rows[2].to_string().contains("<TRUNCATED>"));
    }
}
