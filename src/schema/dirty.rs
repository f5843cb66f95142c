//! Dirty-flag bitmask carried by state-update messages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which parts of an object's state a state update carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DirtyFlags(pub u8);

/// `(bit, name, fixed field-data bytes)`; 0 bytes means variable length.
const FLAG_TABLE: [(u8, &str, usize); 8] = [
    (DirtyFlags::POS, "POS", 12),
    (DirtyFlags::DELTA, "DELTA", 5),
    (DirtyFlags::FWD, "FWD", 3),
    (DirtyFlags::UP, "UP", 3),
    (DirtyFlags::SPD, "SPD", 2),
    (DirtyFlags::SUBSYS, "SUBSYS", 0),
    (DirtyFlags::CLK, "CLK", 1),
    (DirtyFlags::WPN, "WPN", 0),
];

impl DirtyFlags {
    /// Absolute position, three f32
    pub const POS: u8 = 0x01;
    /// Position delta, cv4
    pub const DELTA: u8 = 0x02;
    /// Forward vector, cv3
    pub const FWD: u8 = 0x04;
    /// Up vector, cv3
    pub const UP: u8 = 0x08;
    /// Speed, cf16
    pub const SPD: u8 = 0x10;
    /// Subsystem health, variable
    pub const SUBSYS: u8 = 0x20;
    /// Cloak state, u8
    pub const CLK: u8 = 0x40;
    /// Weapon state, variable
    pub const WPN: u8 = 0x80;

    #[inline]
    pub fn contains(self, bit: u8) -> bool {
        self.0 & bit != 0
    }

    /// Names of the set flags in bit order.
    pub fn names(self) -> Vec<&'static str> {
        FLAG_TABLE
            .iter()
            .filter(|(bit, _, _)| self.contains(*bit))
            .map(|(_, name, _)| *name)
            .collect()
    }

    /// Field-data bytes required by the fixed-size flags that are set.
    pub fn min_field_bytes(self) -> usize {
        FLAG_TABLE
            .iter()
            .filter(|(bit, _, _)| self.contains(*bit))
            .map(|(_, _, size)| size)
            .sum()
    }

    /// Whether any set flag has a variable-length field.
    pub fn has_variable_fields(self) -> bool {
        self.contains(Self::SUBSYS) || self.contains(Self::WPN)
    }
}

impl fmt::Display for DirtyFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X} = [{}]", self.0, self.names().join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_and_sizes() {
        let flags = DirtyFlags(DirtyFlags::POS | DirtyFlags::FWD | DirtyFlags::SPD);
        assert_eq!(flags.names(), vec!["POS", "FWD", "SPD"]);
        assert_eq!(flags.min_field_bytes(), 12 + 3 + 2);
        assert!(!flags.has_variable_fields());
        assert_eq!(flags.to_string(), "0x15 = [POS FWD SPD]");
    }

    #[test]
    fn test_variable_flags_count_zero() {
        let flags = DirtyFlags(DirtyFlags::SUBSYS | DirtyFlags::WPN | DirtyFlags::CLK);
        assert_eq!(flags.min_field_bytes(), 1);
        assert!(flags.has_variable_fields());
    }

    #[test]
    fn test_empty() {
        assert_eq!(DirtyFlags(0).to_string(), "0x00 = []");
        assert_eq!(DirtyFlags(0).min_field_bytes(), 0);
    }
}
