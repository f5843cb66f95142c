use crate::config::TRACE_MAGIC;
use crate::error::Result;
use crate::trace::codec::TraceCodec;
use crate::trace::record::{Direction, TraceRecord};
use bytes::BytesMut;
use std::io::Write;
use tokio_util::codec::Encoder;

/// Writes records in capture format to any `Write` sink.
pub struct TraceWriter<W: Write> {
    inner: W,
    codec: TraceCodec,
    scratch: BytesMut,
    written: usize,
}

impl<W: Write> TraceWriter<W> {
    /// Write the default magic token and return the writer.
    pub fn new(inner: W) -> Result<Self> {
        Self::with_magic(inner, &TRACE_MAGIC)
    }

    pub fn with_magic(mut inner: W, magic: &[u8; 8]) -> Result<Self> {
        inner.write_all(magic)?;
        Ok(Self {
            inner,
            codec: TraceCodec::new(),
            scratch: BytesMut::with_capacity(256),
            written: 0,
        })
    }

    pub fn write_record(&mut self, record: &TraceRecord) -> Result<()> {
        self.scratch.clear();
        self.codec.encode(record, &mut self.scratch)?;
        self.inner.write_all(&self.scratch)?;
        self.written += 1;
        Ok(())
    }

    pub fn write(&mut self, tick: u32, direction: Direction, slot: u8, payload: &[u8]) -> Result<()> {
        self.write_record(&TraceRecord::new(
            tick,
            direction,
            slot,
            bytes::Bytes::copy_from_slice(payload),
        ))
    }

    /// Records written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(mut self) -> Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Encode a whole capture into memory.
pub fn encode_capture<'a, I>(records: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = &'a TraceRecord>,
{
    let mut writer = TraceWriter::new(Vec::new())?;
    for record in records {
        writer.write_record(record)?;
    }
    writer.into_inner()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::trace::TraceCapture;

    #[test]
    fn test_written_capture_parses_back() {
        let mut w = TraceWriter::new(Vec::new()).unwrap();
        w.write(5, Direction::Sent, 1, &[0x0E, 1, 0, 0, 0]).unwrap();
        w.write(6, Direction::Received, 2, &[]).unwrap();
        w.write(7, Direction::Received, 2, &[0x0F, 1, 0, 0, 0]).unwrap();
        assert_eq!(w.written(), 3);

        let bytes = w.into_inner().unwrap();
        assert_eq!(&bytes[..8], b"OBCTRACE");

        let cap = TraceCapture::parse(&bytes).unwrap();
        assert_eq!(cap.len(), 2);
        assert_eq!(cap.skipped_empty(), 1);
        assert_eq!(cap.records()[1].slot, 2);
    }
}
