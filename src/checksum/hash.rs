//! # Hash Engine
//!
//! The two 32-bit digests the checksum exchange is built on.
//!
//! ## Name hash
//! Four parallel Pearson lanes. Every input byte updates each lane through its
//! own substitution table; the four lane bytes are packed big-end first.
//!
//! ## Content hash
//! Rotate-XOR over little-endian 32-bit words. Word index 1 (bytes 4..8) is
//! skipped because compiled script files keep a build timestamp there. The
//! 1..=3 trailing bytes are sign-extended before being folded in.
//!
//! Both functions are pure and must stay bit-exact with the game client.

use crate::checksum::tables::LANE_TABLES;
use crate::error::Result;
use crate::utils::metrics::global_metrics;
use std::path::Path;
use tracing::trace;

/// Word index excluded from the content hash.
pub const SKIPPED_WORD: usize = 1;

/// Name hash of a raw byte string.
pub fn name_hash(bytes: &[u8]) -> u32 {
    let mut lanes = [0u8; 4];
    for &c in bytes {
        for (lane, table) in lanes.iter_mut().zip(LANE_TABLES) {
            *lane = table[(c ^ *lane) as usize];
        }
    }
    u32::from_be_bytes(lanes)
}

/// Name hash of a string, hashed as its raw bytes.
#[inline]
pub fn name_hash_str(name: &str) -> u32 {
    name_hash(name.as_bytes())
}

/// Content hash of a byte buffer.
pub fn content_hash(data: &[u8]) -> u32 {
    let mut h: u32 = 0;
    let mut words = data.chunks_exact(4);

    for (index, word) in words.by_ref().enumerate() {
        if index == SKIPPED_WORD {
            continue;
        }
        let w = u32::from_le_bytes([word[0], word[1], word[2], word[3]]);
        h = (h ^ w).rotate_left(1);
    }

    for &b in words.remainder() {
        // movsx: sign-extend before folding
        let extended = i32::from(b as i8) as u32;
        h = (h ^ extended).rotate_left(1);
    }

    h
}

/// Read a file and return its content hash.
pub fn content_hash_file<P: AsRef<Path>>(path: P) -> Result<u32> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    let hash = content_hash(&data);
    global_metrics().file_hashed(data.len() as u64);
    trace!(path = %path.display(), len = data.len(), hash = format_args!("0x{hash:08X}"), "Hashed file");
    Ok(hash)
}
