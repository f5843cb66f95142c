//! Bounds-checked little-endian cursor.
//!
//! Every decoder in the crate (capture framing, payload field walks, checksum
//! tree grammars) reads through [`WireReader`] so that a short buffer is always
//! reported with the exact offset where it ran out, never a panic.

use std::fmt;

/// A read that needed more bytes than the buffer had left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortRead {
    /// Offset the read started at
    pub offset: usize,
    /// Bytes the read wanted
    pub needed: usize,
    /// Bytes left at `offset`
    pub available: usize,
}

impl fmt::Display for ShortRead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "need {} bytes at offset {} but only {} remain",
            self.needed, self.offset, self.available
        )
    }
}

impl std::error::Error for ShortRead {}

/// Little-endian cursor over a borrowed byte slice.
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Start reading at `pos` (clamped to the buffer length).
    pub fn at(data: &'a [u8], pos: usize) -> Self {
        Self {
            data,
            pos: pos.min(data.len()),
        }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Take `len` bytes and advance.
    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8], ShortRead> {
        let available = self.remaining();
        if len > available {
            return Err(ShortRead {
                offset: self.pos,
                needed: len,
                available,
            });
        }
        let out = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(out)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], ShortRead> {
        let bytes = self.read_slice(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, ShortRead> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8, ShortRead> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16, ShortRead> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32, ShortRead> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32, ShortRead> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub fn read_f32(&mut self) -> Result<f32, ShortRead> {
        Ok(f32::from_le_bytes(self.read_array()?))
    }

    /// Everything from the cursor to the end of the buffer.
    pub fn read_rest(&mut self) -> &'a [u8] {
        let out = &self.data[self.pos..];
        self.pos = self.data.len();
        out
    }

    pub fn peek_u8(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_little_endian() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];
        let mut r = WireReader::new(&data);
        assert_eq!(r.read_u8().unwrap(), 0x01);
        assert_eq!(r.read_u16().unwrap(), 0x0302);
        assert_eq!(r.read_u32().unwrap(), 0x0706_0504);
        assert!(r.is_exhausted());
    }

    #[test]
    fn test_short_read_reports_offset() {
        let data = [0xAA, 0xBB, 0xCC];
        let mut r = WireReader::new(&data);
        r.read_u8().unwrap();
        let err = r.read_u32().unwrap_err();
        assert_eq!(
            err,
            ShortRead {
                offset: 1,
                needed: 4,
                available: 2
            }
        );
        // A failed read does not move the cursor.
        assert_eq!(r.position(), 1);
    }

    #[test]
    fn test_read_rest_and_signed() {
        let data = [0xFF, 0xFF, 0xFF, 0x3F, 0x80, 0x09];
        let mut r = WireReader::new(&data);
        assert_eq!(r.read_i32().unwrap(), 0x3FFF_FFFF);
        assert_eq!(r.read_i8().unwrap(), -128);
        assert_eq!(r.read_rest(), &[0x09]);
        assert_eq!(r.read_rest(), &[] as &[u8]);
    }

    #[test]
    fn test_at_clamps() {
        let data = [1u8, 2];
        let r = WireReader::at(&data, 10);
        assert_eq!(r.remaining(), 0);
    }
}
