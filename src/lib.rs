//! # wirecheck
//!
//! Verification toolkit for a proprietary game's binary wire protocol.
//!
//! ## Components
//! - **Trace**: framed packet-capture parsing, indexed by opcode
//! - **Schema**: declarative per-opcode payload layouts
//! - **Compare**: structural checks of captured payloads against schemas and
//!   ground-truth references
//! - **Checksum**: the file-integrity exchange (hash engine, expected
//!   manifest, response decoding and validation)
//! - **Core**: bounds-checked reader, compressed number codecs, export formats
//! - **Utils**: logging setup, metrics, hex rendering
//!
//! ## Example
//! ```no_run
//! use wirecheck::compare::{builtin_references, compare_capture, CompareOptions};
//! use wirecheck::trace::TraceCapture;
//!
//! let capture = TraceCapture::from_file("session.trace")?;
//! let report = compare_capture(&capture, &builtin_references(), &CompareOptions::default());
//! println!("{report}");
//! # Ok::<(), wirecheck::error::WireError>(())
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod checksum;
pub mod compare;
pub mod config;
pub mod core;
pub mod error;
pub mod schema;
pub mod trace;
pub mod utils;

pub use checksum::{
    content_hash, decode_response, name_hash, validate_response, ChecksumDecoder, ChecksumVerdict,
    DecodedResponse, GrammarVariant, Manifest,
};
pub use compare::{compare_capture, CheckResult, CompareOptions, ComparisonReport};
pub use config::WirecheckConfig;
pub use error::{Result, WireError};
pub use trace::{Direction, TraceCapture, TraceRecord};
