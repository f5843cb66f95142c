use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Size of the fixed header preceding every record payload.
pub const RECORD_HEADER_LEN: usize = 8;

/// Which way a captured message travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Sent,
    Received,
}

impl Direction {
    /// Wire code of the direction (`S` or `R`).
    pub fn code(self) -> u8 {
        match self {
            Direction::Sent => b'S',
            Direction::Received => b'R',
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            b'S' => Some(Direction::Sent),
            b'R' => Some(Direction::Received),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Sent => "sent",
            Direction::Received => "received",
        })
    }
}

/// One framed entry of a trace capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceRecord {
    pub tick: u32,
    pub direction: Direction,
    pub slot: u8,
    pub payload: Bytes,
}

impl TraceRecord {
    pub fn new(tick: u32, direction: Direction, slot: u8, payload: impl Into<Bytes>) -> Self {
        Self {
            tick,
            direction,
            slot,
            payload: payload.into(),
        }
    }

    /// First payload byte, `None` for an empty payload.
    #[inline]
    pub fn opcode(&self) -> Option<u8> {
        self.payload.first().copied()
    }

    /// Header plus payload size on the wire.
    pub fn encoded_len(&self) -> usize {
        RECORD_HEADER_LEN + self.payload.len()
    }
}

impl fmt::Display for TraceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.opcode() {
            Some(op) => write!(
                f,
                "tick={} {} slot={} op=0x{op:02X} len={}",
                self.tick,
                self.direction,
                self.slot,
                self.payload.len()
            ),
            None => write!(
                f,
                "tick={} {} slot={} <empty>",
                self.tick, self.direction, self.slot
            ),
        }
    }
}
