//! Typed views of the messages with opcode-specific rules.
//!
//! Each decoder is strict: a payload that does not fit the layout (including
//! flag-dependent trailing data) yields [`WireError::SchemaMismatch`].

use crate::core::compressed::{self, Vec3};
use crate::core::reader::{ShortRead, WireReader};
use crate::error::{constants, Result, WireError};
use crate::schema::dirty::DirtyFlags;
use crate::schema::registry::opcodes;
use crate::schema::trailing::{BeamTrailing, TorpedoMode, TorpedoTrailing, FIRE_HEADER_LEN};
use serde::{Deserialize, Serialize};

fn mismatch(opcode: u8, detail: impl Into<String>) -> WireError {
    WireError::SchemaMismatch {
        opcode,
        detail: detail.into(),
    }
}

fn short(opcode: u8) -> impl Fn(ShortRead) -> WireError {
    move |e| mismatch(opcode, format!("{}: {e}", constants::ERR_PAYLOAD_TOO_SHORT))
}

fn expect_opcode(reader: &mut WireReader<'_>, opcode: u8) -> Result<()> {
    let found = reader.read_u8().map_err(|_| mismatch(opcode, constants::ERR_EMPTY_PAYLOAD))?;
    if found != opcode {
        return Err(mismatch(opcode, format!("opcode byte is 0x{found:02X}")));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamFire {
    pub shooter_id: i32,
    pub flags: u8,
    pub direction: Vec3,
    pub more_flags: u8,
    pub trailing: BeamTrailing,
}

impl BeamFire {
    pub fn decode(payload: &[u8]) -> Result<Self> {
        let op = opcodes::BEAM_FIRE;
        let mut r = WireReader::new(payload);
        expect_opcode(&mut r, op)?;
        let shooter_id = r.read_i32().map_err(short(op))?;
        let flags = r.read_u8().map_err(short(op))?;
        let direction = compressed::read_cv3(&mut r).map_err(short(op))?;
        let more_flags = r.read_u8().map_err(short(op))?;
        let rest = r.read_rest();
        let trailing = BeamTrailing::decode(more_flags, rest).ok_or_else(|| {
            mismatch(
                op,
                format!(
                    "more_flags 0x{more_flags:02X} expects {} trailing, found {}B",
                    BeamTrailing::expected(more_flags),
                    rest.len()
                ),
            )
        })?;
        Ok(Self {
            shooter_id,
            flags,
            direction,
            more_flags,
            trailing,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TorpedoFire {
    pub shooter_id: i32,
    pub subsys_index: u8,
    pub flags: u8,
    pub velocity: Vec3,
    pub trailing: TorpedoTrailing,
}

impl TorpedoFire {
    pub fn decode(payload: &[u8]) -> Result<Self> {
        let op = opcodes::TORPEDO_FIRE;
        let mut r = WireReader::new(payload);
        expect_opcode(&mut r, op)?;
        let shooter_id = r.read_i32().map_err(short(op))?;
        let subsys_index = r.read_u8().map_err(short(op))?;
        let flags = r.read_u8().map_err(short(op))?;
        let velocity = compressed::read_cv3(&mut r).map_err(short(op))?;
        let rest = r.read_rest();
        let trailing = TorpedoTrailing::decode(flags, rest).ok_or_else(|| {
            let mode = TorpedoMode::from_flags(flags);
            mismatch(
                op,
                format!(
                    "flags {mode} expect {} trailing, found {}B",
                    mode.expected(),
                    rest.len()
                ),
            )
        })?;
        Ok(Self {
            shooter_id,
            subsys_index,
            flags,
            velocity,
            trailing,
        })
    }

    pub fn mode(&self) -> TorpedoMode {
        TorpedoMode::from_flags(self.flags)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    pub object_id: i32,
    pub impact: Vec3,
    pub damage: f32,
    pub radius: f32,
}

impl Explosion {
    pub const LEN: usize = 14;

    pub fn decode(payload: &[u8]) -> Result<Self> {
        let op = opcodes::EXPLOSION;
        if payload.len() != Self::LEN {
            return Err(mismatch(
                op,
                format!("expected {} bytes, found {}", Self::LEN, payload.len()),
            ));
        }
        let mut r = WireReader::new(payload);
        expect_opcode(&mut r, op)?;
        Ok(Self {
            object_id: r.read_i32().map_err(short(op))?,
            impact: compressed::read_cv4(&mut r).map_err(short(op))?,
            damage: compressed::read_cf16(&mut r).map_err(short(op))?,
            radius: compressed::read_cf16(&mut r).map_err(short(op))?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateUpdate {
    pub object_id: i32,
    pub game_time: f32,
    pub dirty: DirtyFlags,
    pub field_data: Vec<u8>,
}

impl StateUpdate {
    /// Offset of the dirty-flags byte.
    pub const DIRTY_OFFSET: usize = 9;

    pub fn decode(payload: &[u8]) -> Result<Self> {
        let op = opcodes::STATE_UPDATE;
        let mut r = WireReader::new(payload);
        expect_opcode(&mut r, op)?;
        let object_id = r.read_i32().map_err(short(op))?;
        let game_time = r.read_f32().map_err(short(op))?;
        let dirty = DirtyFlags(r.read_u8().map_err(short(op))?);
        let field_data = r.read_rest().to_vec();
        if field_data.len() < dirty.min_field_bytes() {
            return Err(mismatch(
                op,
                format!(
                    "dirty flags {dirty} need at least {}B of field data, found {}B",
                    dirty.min_field_bytes(),
                    field_data.len()
                ),
            ));
        }
        Ok(Self {
            object_id,
            game_time,
            dirty,
            field_data,
        })
    }

    /// Position, when the POS flag is set and the field data holds it.
    pub fn position(&self) -> Option<Vec3> {
        if !self.dirty.contains(DirtyFlags::POS) {
            return None;
        }
        let mut r = WireReader::new(&self.field_data);
        Some(Vec3::new(
            r.read_f32().ok()?,
            r.read_f32().ok()?,
            r.read_f32().ok()?,
        ))
    }
}

/// Trailing bytes after the fixed fire-message header.
pub fn fire_trailing(payload: &[u8]) -> Option<&[u8]> {
    payload.get(FIRE_HEADER_LEN..)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const BEAM_REF: [u8; 14] = [
        0x1A, 0x77, 0x00, 0x00, 0x40, 0x02, 0x75, 0x0E, 0xD2, 0x03, 0x68, 0x00, 0x08, 0x40,
    ];
    const EXPLOSION_REF: [u8; 14] = [
        0x29, 0xFF, 0xFF, 0xFF, 0x3F, 0x1D, 0x7A, 0x0C, 0x95, 0x61, 0x1B, 0x57, 0xE2, 0x78,
    ];

    #[test]
    fn test_beam_with_target() {
        let beam = BeamFire::decode(&BEAM_REF).unwrap();
        assert_eq!(beam.shooter_id, 0x4000_0077);
        assert_eq!(beam.more_flags, 0x03);
        assert_eq!(
            beam.trailing,
            BeamTrailing::Target {
                target_id: 0x4008_0068
            }
        );
    }

    #[test]
    fn test_beam_without_target() {
        let mut p = BEAM_REF[..10].to_vec();
        p[9] = 0x02;
        let beam = BeamFire::decode(&p).unwrap();
        assert_eq!(beam.trailing, BeamTrailing::NoTarget);

        // Target bit set but no target bytes.
        p[9] = 0x03;
        assert!(matches!(
            BeamFire::decode(&p),
            Err(WireError::SchemaMismatch { opcode: 0x1A, .. })
        ));
    }

    #[test]
    fn test_explosion() {
        let e = Explosion::decode(&EXPLOSION_REF).unwrap();
        assert_eq!(e.object_id, 0x3FFF_FFFF);
        assert!((e.damage - 50.0).abs() < 0.05);
        assert!((e.radius - 5997.8).abs() < 0.5);
        assert!(Explosion::decode(&EXPLOSION_REF[..13]).is_err());
    }

    #[test]
    fn test_torpedo_arc_reference() {
        let p = [
            0x19, 0x0D, 0x00, 0x00, 0x40, 0x02, 0x01, 0xDF, 0x87, 0x11, 0xFF, 0xFF, 0x03, 0x40,
            0x00, 0x88, 0xD8, 0x5C,
        ];
        let t = TorpedoFire::decode(&p).unwrap();
        assert_eq!(t.subsys_index, 0x02);
        assert!(t.mode().has_arc && !t.mode().has_target);
        assert_eq!(t.trailing, TorpedoTrailing::Arc { len: 8 });
    }

    #[test]
    fn test_state_update_position() {
        let mut p = vec![0x1C, 0x05, 0x00, 0x00, 0x40];
        p.extend_from_slice(&12.5f32.to_le_bytes());
        p.push(DirtyFlags::POS);
        for v in [1.0f32, -2.0, 3.5] {
            p.extend_from_slice(&v.to_le_bytes());
        }
        let s = StateUpdate::decode(&p).unwrap();
        assert_eq!(s.game_time, 12.5);
        assert_eq!(s.position(), Some(Vec3::new(1.0, -2.0, 3.5)));

        p.truncate(15);
        assert!(StateUpdate::decode(&p).is_err());
    }

    #[test]
    fn test_wrong_opcode() {
        assert!(matches!(
            Explosion::decode(&[0x28; 14]),
            Err(WireError::SchemaMismatch { opcode: 0x29, .. })
        ));
    }
}
