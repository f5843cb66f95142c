//! # Checksum Exchange
//!
//! The file-integrity challenge a server runs against connecting clients.
//!
//! ## Components
//! - **Hash**: name hash (four-lane Pearson) and content hash (rotate-XOR)
//! - **Manifest**: expected answers for the four fixed rounds, built from disk
//! - **Response**: header parsing and grammar-variant tree decoding
//! - **Validate**: verdict for a decoded response against a manifest

pub mod hash;
pub mod manifest;
pub mod response;
mod tables;
pub mod validate;

pub use hash::{content_hash, content_hash_file, name_hash, name_hash_str};
pub use manifest::{DirectoryNode, Drift, DriftKind, FileEntry, Manifest, Round, RoundSpec, ROUNDS};
pub use response::{
    decode_response, encode_response, AttemptOutcome, ChecksumDecoder, DecodedResponse, FileHash,
    GrammarVariant, ResponseHeader, ResponseSubdir, ResponseTree,
};
pub use validate::{validate_response, ChecksumVerdict};
