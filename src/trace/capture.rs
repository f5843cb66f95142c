use crate::config::TRACE_MAGIC;
use crate::error::{constants, Result, WireError};
use crate::trace::codec::TraceCodec;
use crate::trace::record::{Direction, TraceRecord};
use crate::utils::metrics::{global_metrics, Timer};
use bytes::BytesMut;
use std::collections::BTreeMap;
use std::path::Path;
use tokio_util::codec::Decoder;
use tracing::{debug, warn};

/// A parsed trace capture, records in file order and indexed by opcode.
#[derive(Debug, Clone, Default)]
pub struct TraceCapture {
    records: Vec<TraceRecord>,
    by_opcode: BTreeMap<u8, Vec<usize>>,
    skipped_empty: usize,
    truncated_tail: usize,
    skipped_malformed: usize,
    malformed: Option<String>,
}

impl TraceCapture {
    /// Parse a capture that starts with the default magic token.
    pub fn parse(data: &[u8]) -> Result<Self> {
        Self::parse_with_magic(data, &TRACE_MAGIC)
    }

    /// Parse a capture starting with `magic`.
    ///
    /// A wrong or missing magic token is the only fatal condition. A final
    /// record that is cut short ends parsing (`truncated_tail` holds the
    /// leftover byte count). A record with an unknown direction code is
    /// skipped and parsing continues; `skipped_malformed` counts them and
    /// `malformed` keeps the first reason.
    pub fn parse_with_magic(data: &[u8], magic: &[u8; 8]) -> Result<Self> {
        let _timer = Timer::start("trace_parse");

        if data.len() < magic.len() || &data[..magic.len()] != magic {
            let found = data[..data.len().min(magic.len())].to_vec();
            if data.len() < magic.len() {
                debug!(len = data.len(), "{}", constants::ERR_CAPTURE_TOO_SHORT);
            }
            return Err(WireError::BadMagic { found });
        }

        let mut buf = BytesMut::from(&data[magic.len()..]);
        let mut codec = TraceCodec::new();
        let mut capture = Self::default();
        let mut payload_bytes = 0u64;

        loop {
            match codec.decode(&mut buf) {
                Ok(Some(record)) => {
                    payload_bytes += record.payload.len() as u64;
                    capture.push(record);
                }
                Ok(None) => break,
                Err(e) => {
                    let offset = data.len() - buf.len();
                    warn!(offset, error = %e, "Skipping malformed record");
                    capture.skipped_malformed += 1;
                    if capture.malformed.is_none() {
                        capture.malformed = Some(format!("{e} before offset {offset}"));
                    }
                }
            }
        }
        capture.truncated_tail = buf.len();

        if capture.truncated_tail > 0 {
            warn!(
                records = capture.records.len(),
                leftover = capture.truncated_tail,
                "Capture ends in a truncated record"
            );
        }
        debug!(
            records = capture.records.len(),
            opcodes = capture.by_opcode.len(),
            skipped_empty = capture.skipped_empty,
            skipped_malformed = capture.skipped_malformed,
            "Parsed trace capture"
        );
        global_metrics().capture_parsed(
            capture.records.len() as u64,
            capture.skipped_empty as u64,
            payload_bytes,
            capture.is_truncated() || capture.skipped_malformed > 0,
        );

        Ok(capture)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::parse(&data)
    }

    fn push(&mut self, record: TraceRecord) {
        match record.opcode() {
            Some(op) => {
                self.by_opcode.entry(op).or_default().push(self.records.len());
                self.records.push(record);
            }
            None => self.skipped_empty += 1,
        }
    }

    /// All non-empty records in capture order.
    pub fn records(&self) -> &[TraceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records with the given opcode, in capture order.
    pub fn by_opcode(&self, opcode: u8) -> impl Iterator<Item = &TraceRecord> + '_ {
        self.by_opcode
            .get(&opcode)
            .into_iter()
            .flatten()
            .map(move |&i| &self.records[i])
    }

    /// Opcodes seen, ascending.
    pub fn opcodes(&self) -> impl Iterator<Item = u8> + '_ {
        self.by_opcode.keys().copied()
    }

    pub fn count(&self, opcode: u8) -> usize {
        self.by_opcode.get(&opcode).map_or(0, Vec::len)
    }

    /// Record count per opcode.
    pub fn opcode_counts(&self) -> BTreeMap<u8, usize> {
        self.by_opcode
            .iter()
            .map(|(&op, idx)| (op, idx.len()))
            .collect()
    }

    /// `(sent, received)` counts for one opcode.
    pub fn direction_counts(&self, opcode: u8) -> (usize, usize) {
        self.by_opcode(opcode)
            .fold((0, 0), |(s, r), rec| match rec.direction {
                Direction::Sent => (s + 1, r),
                Direction::Received => (s, r + 1),
            })
    }

    /// First record of `opcode` travelling in `preferred`, else the first of any direction.
    pub fn sample(&self, opcode: u8, preferred: Direction) -> Option<&TraceRecord> {
        self.by_opcode(opcode)
            .find(|r| r.direction == preferred)
            .or_else(|| self.by_opcode(opcode).next())
    }

    /// Zero-length records that were dropped.
    pub fn skipped_empty(&self) -> usize {
        self.skipped_empty
    }

    /// Bytes left over after the last whole record.
    pub fn truncated_tail(&self) -> usize {
        self.truncated_tail
    }

    /// Records dropped for an unknown direction code.
    pub fn skipped_malformed(&self) -> usize {
        self.skipped_malformed
    }

    /// First malformed-record reason, if any record was skipped.
    pub fn malformed(&self) -> Option<&str> {
        self.malformed.as_deref()
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated_tail > 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn capture_bytes(records: &[(u32, u8, &[u8])]) -> Vec<u8> {
        let mut out = TRACE_MAGIC.to_vec();
        for (tick, dir, payload) in records {
            out.extend_from_slice(&tick.to_le_bytes());
            out.push(*dir);
            out.push(0);
            out.extend_from_slice(&(payload.len() as u16).to_le_bytes());
            out.extend_from_slice(payload);
        }
        out
    }

    #[test]
    fn test_groups_by_opcode_in_order() {
        let data = capture_bytes(&[
            (1, b'S', &[0x1A, 1]),
            (2, b'R', &[0x29, 2]),
            (3, b'R', &[0x1A, 3]),
        ]);
        let cap = TraceCapture::parse(&data).unwrap();
        assert_eq!(cap.len(), 3);
        let ticks: Vec<u32> = cap.by_opcode(0x1A).map(|r| r.tick).collect();
        assert_eq!(ticks, vec![1, 3]);
        assert_eq!(cap.direction_counts(0x1A), (1, 1));
        assert_eq!(cap.opcodes().collect::<Vec<_>>(), vec![0x1A, 0x29]);
    }

    #[test]
    fn test_empty_payload_skipped() {
        let data = capture_bytes(&[(1, b'S', &[]), (2, b'S', &[0x14, 0, 0, 0, 0])]);
        let cap = TraceCapture::parse(&data).unwrap();
        assert_eq!(cap.len(), 1);
        assert_eq!(cap.skipped_empty(), 1);
        assert_eq!(cap.opcode_counts().values().sum::<usize>(), cap.len());
    }

    #[test]
    fn test_truncated_tail_is_not_an_error() {
        let mut data = capture_bytes(&[(1, b'S', &[0x0E, 1, 2, 3, 4])]);
        data.extend_from_slice(&[9, 0, 0, 0, b'S', 0, 10, 0, 0x1A]);
        let cap = TraceCapture::parse(&data).unwrap();
        assert_eq!(cap.len(), 1);
        assert_eq!(cap.truncated_tail(), 9);
        assert!(cap.malformed().is_none());
    }

    #[test]
    fn test_bad_magic_is_fatal() {
        assert!(matches!(
            TraceCapture::parse(b"NOTATRACE......"),
            Err(WireError::BadMagic { .. })
        ));
        assert!(matches!(
            TraceCapture::parse(b"OBC"),
            Err(WireError::BadMagic { .. })
        ));
    }

    #[test]
    fn test_unknown_direction_is_skipped() {
        let data = capture_bytes(&[(1, b'S', &[0x14]), (2, b'Q', &[0x14]), (3, b'S', &[0x15])]);
        let cap = TraceCapture::parse(&data).unwrap();
        let ticks: Vec<u32> = cap.records().iter().map(|r| r.tick).collect();
        assert_eq!(ticks, vec![1, 3]);
        assert_eq!(cap.skipped_malformed(), 1);
        assert!(cap.malformed().unwrap().contains("0x51"));
        assert!(!cap.is_truncated());
    }

    #[test]
    fn test_sample_prefers_direction() {
        let data = capture_bytes(&[(1, b'R', &[0x29]), (2, b'S', &[0x29])]);
        let cap = TraceCapture::parse(&data).unwrap();
        assert_eq!(cap.sample(0x29, Direction::Sent).unwrap().tick, 2);
        assert_eq!(cap.sample(0x29, Direction::Received).unwrap().tick, 1);
        assert!(cap.sample(0x03, Direction::Sent).is_none());
    }
}
