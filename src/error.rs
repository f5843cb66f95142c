//! # Error Types
//!
//! Error handling for capture parsing, schema decoding, checksum decoding and
//! manifest construction.
//!
//! Most conditions in this crate are *local*: a truncated capture ends the
//! record sequence, a short payload becomes a failing check, a missing round
//! directory becomes an absent round. Only a few conditions surface as `Err`
//! to the caller.
//!
//! ## Error Categories
//! - **I/O Errors**: reading captures, game files and config files
//! - **Capture Errors**: bad magic token, malformed record headers
//! - **Schema Errors**: unknown opcodes, payloads too short for a typed decode
//! - **Checksum Errors**: bad response header, rejected or unresolved tree grammar
//! - **Configuration Errors**: invalid or unreadable configuration
//!
//! All errors implement `std::error::Error` for interoperability.
//!
//! ## Example Usage
//! ```rust
//! use wirecheck::error::{WireError, Result};
//! use wirecheck::trace::TraceCapture;
//!
//! fn load(bytes: &[u8]) -> Result<usize> {
//!     let capture = TraceCapture::parse(bytes)?;
//!     Ok(capture.len())
//! }
//!
//! assert!(matches!(load(b"NOTATRACE"), Err(WireError::BadMagic { .. })));
//! ```

use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

/// Error message constants to reduce allocations in error paths.
pub mod constants {
    /// Capture errors
    pub const ERR_CAPTURE_TOO_SHORT: &str = "Capture shorter than magic token";
    pub const ERR_UNKNOWN_DIRECTION: &str = "Unknown record direction code";

    /// Schema errors
    pub const ERR_EMPTY_PAYLOAD: &str = "Payload is empty";
    pub const ERR_PAYLOAD_TOO_SHORT: &str = "Payload too short for layout";

    /// Checksum errors
    pub const ERR_RESPONSE_TOO_SHORT: &str = "Checksum response shorter than its header";
    pub const ERR_RESPONSE_OPCODE: &str = "Not a checksum response opcode";
    pub const ERR_TREE_TOO_DEEP: &str = "Directory tree nesting exceeds limit";
    pub const ERR_NO_VARIANTS: &str = "No grammar variants configured";

    /// Manifest errors
    pub const ERR_NOT_A_DIRECTORY: &str = "Round path is not a directory";
}

/// Primary error type for all wirecheck operations
#[derive(Error, Debug, Serialize, Deserialize)]
pub enum WireError {
    #[error("I/O error: {0}")]
    #[serde(skip_serializing, skip_deserializing)]
    Io(#[from] io::Error),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Deserialize error: {0}")]
    DeserializeError(String),

    #[error("Bad capture magic: found {found:02X?}")]
    BadMagic { found: Vec<u8> },

    #[error("Malformed capture: {0}")]
    MalformedCapture(String),

    #[error("Record payload too large to frame: {0} bytes")]
    OversizedPayload(usize),

    #[error("Unknown opcode: 0x{0:02X}")]
    UnknownOpcode(u8),

    #[error("Schema mismatch for opcode 0x{opcode:02X}: {detail}")]
    SchemaMismatch { opcode: u8, detail: String },

    #[error("Bad checksum response header: {0}")]
    BadChecksumHeader(String),

    #[error("Grammar {variant} rejected at offset {offset}")]
    GrammarRejected { variant: String, offset: usize },

    #[error("No grammar variant consumed the response exactly (diverged at offset {offset}): {detail}")]
    UnresolvedGrammar { offset: usize, detail: String },

    #[error("Missing directory: {0}")]
    MissingDirectory(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Custom error: {0}")]
    Custom(String),
}

/// Type alias for Results using WireError
pub type Result<T> = std::result::Result<T, WireError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_formats_hex_opcode() {
        assert_eq!(
            WireError::UnknownOpcode(0x1A).to_string(),
            "Unknown opcode: 0x1A"
        );
        let err = WireError::SchemaMismatch {
            opcode: 0x29,
            detail: "need 14 bytes".into(),
        };
        assert_eq!(
            err.to_string(),
            "Schema mismatch for opcode 0x29: need 14 bytes"
        );
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_serializable_variants_roundtrip_json() {
        let err = WireError::UnresolvedGrammar {
            offset: 266,
            detail: "overrun".into(),
        };
        let json = serde_json::to_string(&err).unwrap();
        let back: WireError = serde_json::from_str(&json).unwrap();
        assert!(matches!(back, WireError::UnresolvedGrammar { offset: 266, .. }));
    }
}
