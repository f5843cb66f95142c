//! Flag-dependent trailing data of fire messages.
//!
//! Beam-fire and torpedo-fire messages have a fixed 10-byte header; flag bits
//! inside that header decide what (if anything) follows. Each mode is a
//! variant here so the expected trailing size can be derived from the flags
//! alone, independent of any comparison logic.

use crate::core::compressed::{self, Vec3};
use crate::core::reader::WireReader;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed header size shared by both fire messages.
pub const FIRE_HEADER_LEN: usize = 10;

/// Target identifier (i32) plus cv4 impact.
pub const TORPEDO_TARGET_LEN: usize = 9;

/// Target identifier (i32).
pub const BEAM_TARGET_LEN: usize = 4;

/// Offset of the beam-fire `more_flags` byte.
pub const BEAM_MORE_FLAGS_OFFSET: usize = 9;

/// Offset of the torpedo-fire `flags` byte.
pub const TORPEDO_FLAGS_OFFSET: usize = 6;

/// Trailing byte count a flag combination calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrailingLen {
    Exact(usize),
    AtLeast(usize),
    /// Layout not known; any count is accepted
    Any,
}

impl TrailingLen {
    pub fn accepts(self, n: usize) -> bool {
        match self {
            TrailingLen::Exact(e) => n == e,
            TrailingLen::AtLeast(e) => n >= e,
            TrailingLen::Any => true,
        }
    }
}

impl fmt::Display for TrailingLen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrailingLen::Exact(n) => write!(f, "{n}B"),
            TrailingLen::AtLeast(n) => write!(f, ">={n}B"),
            TrailingLen::Any => f.write_str("any"),
        }
    }
}

/// Trailing data of a beam-fire message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BeamTrailing {
    NoTarget,
    Target { target_id: i32 },
}

impl BeamTrailing {
    /// `more_flags` bit announcing a target.
    pub const HAS_TARGET: u8 = 0x01;

    pub fn has_target(more_flags: u8) -> bool {
        more_flags & Self::HAS_TARGET != 0
    }

    pub fn expected(more_flags: u8) -> TrailingLen {
        if Self::has_target(more_flags) {
            TrailingLen::Exact(BEAM_TARGET_LEN)
        } else {
            TrailingLen::Exact(0)
        }
    }

    /// Decode the trailing bytes for the given flags, `None` if their length is wrong.
    pub fn decode(more_flags: u8, trailing: &[u8]) -> Option<Self> {
        if !Self::expected(more_flags).accepts(trailing.len()) {
            return None;
        }
        if Self::has_target(more_flags) {
            let target_id = WireReader::new(trailing).read_i32().ok()?;
            Some(BeamTrailing::Target { target_id })
        } else {
            Some(BeamTrailing::NoTarget)
        }
    }
}

/// Flag mode of a torpedo-fire message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TorpedoMode {
    pub has_arc: bool,
    pub has_target: bool,
}

impl TorpedoMode {
    pub const HAS_ARC: u8 = 0x01;
    pub const HAS_TARGET: u8 = 0x02;

    pub fn from_flags(flags: u8) -> Self {
        Self {
            has_arc: flags & Self::HAS_ARC != 0,
            has_target: flags & Self::HAS_TARGET != 0,
        }
    }

    pub fn expected(self) -> TrailingLen {
        match (self.has_arc, self.has_target) {
            (false, false) => TrailingLen::Exact(0),
            (false, true) => TrailingLen::Exact(TORPEDO_TARGET_LEN),
            (true, false) => TrailingLen::Any,
            (true, true) => TrailingLen::AtLeast(TORPEDO_TARGET_LEN),
        }
    }
}

impl fmt::Display for TorpedoMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::with_capacity(2);
        if self.has_arc {
            parts.push("has_arc");
        }
        if self.has_target {
            parts.push("has_target");
        }
        write!(f, "[{}]", parts.join(","))
    }
}

/// Trailing data of a torpedo-fire message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TorpedoTrailing {
    None,
    /// Arc parameters whose layout is not decoded
    Arc { len: usize },
    Target { target_id: i32, impact: Vec3 },
    /// Target data first, arc parameters after it
    ArcAndTarget {
        target_id: i32,
        impact: Vec3,
        arc_len: usize,
    },
}

impl TorpedoTrailing {
    /// Decode the trailing bytes for the given flags, `None` if their length is wrong.
    pub fn decode(flags: u8, trailing: &[u8]) -> Option<Self> {
        let mode = TorpedoMode::from_flags(flags);
        if !mode.expected().accepts(trailing.len()) {
            return None;
        }

        let mut reader = WireReader::new(trailing);
        Some(match (mode.has_arc, mode.has_target) {
            (false, false) => TorpedoTrailing::None,
            (true, false) => TorpedoTrailing::Arc {
                len: trailing.len(),
            },
            (false, true) => TorpedoTrailing::Target {
                target_id: reader.read_i32().ok()?,
                impact: compressed::read_cv4(&mut reader).ok()?,
            },
            (true, true) => TorpedoTrailing::ArcAndTarget {
                target_id: reader.read_i32().ok()?,
                impact: compressed::read_cv4(&mut reader).ok()?,
                arc_len: reader.remaining(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beam_expected() {
        assert_eq!(BeamTrailing::expected(0x00), TrailingLen::Exact(0));
        assert_eq!(BeamTrailing::expected(0x41), TrailingLen::Exact(4));
    }

    #[test]
    fn test_beam_decode() {
        assert_eq!(BeamTrailing::decode(0x00, &[]), Some(BeamTrailing::NoTarget));
        assert_eq!(
            BeamTrailing::decode(0x01, &[0x08, 0x40, 0x00, 0x00]),
            Some(BeamTrailing::Target { target_id: 0x4008 })
        );
        assert_eq!(BeamTrailing::decode(0x01, &[]), None);
        assert_eq!(BeamTrailing::decode(0x00, &[1, 2, 3, 4]), None);
    }

    #[test]
    fn test_torpedo_modes() {
        assert_eq!(TorpedoMode::from_flags(0).expected(), TrailingLen::Exact(0));
        assert_eq!(TorpedoMode::from_flags(2).expected(), TrailingLen::Exact(9));
        assert_eq!(TorpedoMode::from_flags(1).expected(), TrailingLen::Any);
        assert_eq!(TorpedoMode::from_flags(3).expected(), TrailingLen::AtLeast(9));
        assert_eq!(TorpedoMode::from_flags(3).to_string(), "[has_arc,has_target]");
    }

    #[test]
    fn test_torpedo_decode_target() {
        let trailing = [0x05, 0x00, 0x00, 0x40, 0x1D, 0x7A, 0x0C, 0x95, 0x61];
        match TorpedoTrailing::decode(0x02, &trailing) {
            Some(TorpedoTrailing::Target { target_id, impact }) => {
                assert_eq!(target_id, 0x4000_0005);
                assert!((impact.y - 181.6).abs() < 0.3);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(TorpedoTrailing::decode(0x02, &trailing[..8]), None);
    }

    #[test]
    fn test_torpedo_decode_arc() {
        let arc = [0xFF, 0xFF, 0x03, 0x40, 0x00, 0x88, 0xD8, 0x5C];
        assert_eq!(
            TorpedoTrailing::decode(0x01, &arc),
            Some(TorpedoTrailing::Arc { len: 8 })
        );
        let mut both = vec![0u8; 9];
        both.extend_from_slice(&arc);
        assert!(matches!(
            TorpedoTrailing::decode(0x03, &both),
            Some(TorpedoTrailing::ArcAndTarget { arc_len: 8, .. })
        ));
    }
}
