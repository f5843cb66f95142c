//! Hex rendering for payload previews and check details.

use std::fmt::Write;

/// Space-separated uppercase hex, e.g. `1A 77 00 00`.
pub fn hex_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{b:02X}");
    }
    out
}

/// Like [`hex_string`] but cut after `max` bytes, with a trailing marker.
pub fn hex_preview(bytes: &[u8], max: usize) -> String {
    if bytes.len() <= max {
        return hex_string(bytes);
    }
    format!("{} ... (+{} bytes)", hex_string(&bytes[..max]), bytes.len() - max)
}
