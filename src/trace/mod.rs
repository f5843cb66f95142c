//! # Trace Captures
//!
//! Reading and writing the framed capture format produced by the packet
//! logger.
//!
//! ## Format
//! ```text
//! [magic:8 = "OBCTRACE"]
//! repeated: [tick:u32le][direction:u8 'S'|'R'][slot:u8][len:u16le][payload:len]
//! ```
//!
//! Records are grouped by their first payload byte (the opcode). Zero-length
//! records carry no opcode and are counted but not kept.

pub mod capture;
pub mod codec;
pub mod record;
pub mod writer;

pub use capture::TraceCapture;
pub use codec::TraceCodec;
pub use record::{Direction, TraceRecord, RECORD_HEADER_LEN};
pub use writer::{encode_capture, TraceWriter};
