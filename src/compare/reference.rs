use crate::error::{constants, Result, WireError};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Ground-truth payload captured from the retail game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferencePayload {
    pub opcode: u8,
    pub bytes: Bytes,
    /// Where the bytes came from
    pub provenance: String,
    /// Full payload length when only a prefix is stored
    pub full_len: Option<usize>,
}

impl ReferencePayload {
    pub fn new(bytes: impl Into<Bytes>, provenance: impl Into<String>) -> Result<Self> {
        let bytes = bytes.into();
        let opcode = *bytes
            .first()
            .ok_or_else(|| WireError::Custom(constants::ERR_EMPTY_PAYLOAD.to_string()))?;
        Ok(Self {
            opcode,
            bytes,
            provenance: provenance.into(),
            full_len: None,
        })
    }

    /// Mark the stored bytes as a prefix of a longer payload.
    pub fn truncated_from(mut self, full_len: usize) -> Self {
        self.full_len = Some(full_len);
        self
    }

    /// Whether the stored bytes are the whole payload.
    pub fn is_complete(&self) -> bool {
        self.full_len.map_or(true, |n| n == self.bytes.len())
    }

    /// Bytes usable for comparison; whole-payload length checks need [`is_complete`].
    ///
    /// [`is_complete`]: ReferencePayload::is_complete
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

/// First reference registered for `opcode`.
pub fn find(references: &[ReferencePayload], opcode: u8) -> Option<&ReferencePayload> {
    references.iter().find(|r| r.opcode == opcode)
}

const BEAM_FIRE: &[u8] = &[
    0x1A, 0x77, 0x00, 0x00, 0x40, 0x02, 0x75, 0x0E, 0xD2, 0x03, 0x68, 0x00, 0x08, 0x40,
];

const TORPEDO_FIRE: &[u8] = &[
    0x19, 0x0D, 0x00, 0x00, 0x40, 0x02, 0x01, 0xDF, 0x87, 0x11, 0xFF, 0xFF, 0x03, 0x40, 0x00,
    0x88, 0xD8, 0x5C,
];

const EXPLOSION: &[u8] = &[
    0x29, 0xFF, 0xFF, 0xFF, 0x3F, 0x1D, 0x7A, 0x0C, 0x95, 0x61, 0x1B, 0x57, 0xE2, 0x78,
];

const OBJ_CREATE_TEAM_PREFIX: &[u8] = &[
    0x03, 0x00, 0x02, 0x08, 0x80, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0x3F, 0x01, 0x00, 0x00, 0xB0,
    0x42, 0x00, 0x00, 0x84, 0xC2, 0x00, 0x00, 0x92, 0xC2,
];
const OBJ_CREATE_TEAM_FULL_LEN: usize = 111;

const START_FIRING: &[u8] = &[
    0x07, 0x28, 0x81, 0x00, 0x00, 0xD8, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x05, 0x00,
    0x00, 0x40, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

const STOP_FIRING: &[u8] = &[
    0x08, 0x01, 0x01, 0x00, 0x00, 0xDA, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x05, 0x00,
    0x00, 0x40,
];

fn builtin(bytes: &'static [u8], provenance: &str) -> ReferencePayload {
    ReferencePayload {
        opcode: bytes[0],
        bytes: Bytes::from_static(bytes),
        provenance: provenance.to_string(),
        full_len: None,
    }
}

/// Reference payloads extracted from a decrypted retail session log.
pub fn builtin_references() -> Vec<ReferencePayload> {
    vec![
        builtin(
            OBJ_CREATE_TEAM_PREFIX,
            "retail log line 527: team=2 owner=0, first 24 bytes",
        )
        .truncated_from(OBJ_CREATE_TEAM_FULL_LEN),
        builtin(START_FIRING, "retail log line 2182: obj=0x00008128, 20B event data"),
        builtin(STOP_FIRING, "retail log line 2253: obj=0x00000101, 12B event data"),
        builtin(
            TORPEDO_FIRE,
            "retail log line 12322: obj=0x4000000D subsys=2 flags=0x01, 8B arc data",
        ),
        builtin(
            BEAM_FIRE,
            "retail log line 634686: obj=0x40000077 flags=0x02 target=0x40080068",
        ),
        builtin(
            EXPLOSION,
            "retail log line 46666: obj=0x3FFFFFFF impact=(43.2,181.6,17.9) dmg=50.0 radius=5997.8",
        ),
    ]
}
