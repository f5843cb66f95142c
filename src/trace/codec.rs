//! Record framing for trace captures.
//!
//! ```text
//! [tick:u32le][direction:u8][slot:u8][len:u16le][payload:len]
//! ```
//!
//! The decoder returns `Ok(None)` until a whole record is buffered, so a
//! truncated final record simply stays in the buffer. A whole record with an
//! unknown direction code is consumed and reported as `MalformedCapture`, so
//! the caller can skip it and keep decoding.

use crate::error::{constants, Result, WireError};
use crate::trace::record::{Direction, TraceRecord, RECORD_HEADER_LEN};
use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

#[derive(Debug, Default, Clone, Copy)]
pub struct TraceCodec;

impl TraceCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for TraceCodec {
    type Item = TraceRecord;
    type Error = WireError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<TraceRecord>> {
        if src.len() < RECORD_HEADER_LEN {
            return Ok(None);
        }

        let len = u16::from_le_bytes([src[6], src[7]]) as usize;
        if src.len() < RECORD_HEADER_LEN + len {
            src.reserve(RECORD_HEADER_LEN + len - src.len());
            return Ok(None);
        }

        let code = src[4];
        let Some(direction) = Direction::from_code(code) else {
            src.advance(RECORD_HEADER_LEN + len);
            return Err(WireError::MalformedCapture(format!(
                "{} 0x{code:02X}",
                constants::ERR_UNKNOWN_DIRECTION
            )));
        };

        let tick = src.get_u32_le();
        src.advance(1);
        let slot = src.get_u8();
        src.advance(2);
        let payload = src.split_to(len).freeze();

        Ok(Some(TraceRecord {
            tick,
            direction,
            slot,
            payload,
        }))
    }
}

impl Encoder<TraceRecord> for TraceCodec {
    type Error = WireError;

    fn encode(&mut self, item: TraceRecord, dst: &mut BytesMut) -> Result<()> {
        <Self as Encoder<&TraceRecord>>::encode(self, &item, dst)
    }
}

impl<'a> Encoder<&'a TraceRecord> for TraceCodec {
    type Error = WireError;

    fn encode(&mut self, item: &'a TraceRecord, dst: &mut BytesMut) -> Result<()> {
        let len = u16::try_from(item.payload.len())
            .map_err(|_| WireError::OversizedPayload(item.payload.len()))?;

        dst.reserve(item.encoded_len());
        dst.put_u32_le(item.tick);
        dst.put_u8(item.direction.code());
        dst.put_u8(item.slot);
        dst.put_u16_le(len);
        dst.extend_from_slice(&item.payload);
        Ok(())
    }
}
