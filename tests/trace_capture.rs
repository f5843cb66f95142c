//! Integration tests for trace capture parsing and writing

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::io::Write;
use wirecheck::config::{WirecheckConfig, TRACE_MAGIC};
use wirecheck::error::WireError;
use wirecheck::trace::{encode_capture, Direction, TraceCapture, TraceRecord, TraceWriter};
use wirecheck::utils::metrics::global_metrics;

fn session() -> Vec<TraceRecord> {
    vec![
        TraceRecord::new(100, Direction::Sent, 0, vec![0x03, 0x00, 0x02, 0x08]),
        TraceRecord::new(101, Direction::Received, 1, vec![0x1C, 1, 0, 0, 0x40, 0, 0, 0, 0, 0]),
        TraceRecord::new(102, Direction::Sent, 0, vec![0x29; 14]),
        TraceRecord::new(103, Direction::Received, 1, vec![0x1C, 2, 0, 0, 0x40, 0, 0, 0, 0, 0]),
        TraceRecord::new(104, Direction::Sent, 0, vec![0x21, 0xFF]),
    ]
}

#[test]
fn test_records_kept_in_capture_order() {
    let records = session();
    let capture = TraceCapture::parse(&encode_capture(&records).unwrap()).unwrap();

    assert_eq!(capture.records(), records.as_slice());
    let ticks: Vec<u32> = capture.records().iter().map(|r| r.tick).collect();
    assert!(ticks.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(
        capture.opcode_counts().values().sum::<usize>(),
        capture.len()
    );
}

#[test]
fn test_opcode_index() {
    let capture = TraceCapture::parse(&encode_capture(&session()).unwrap()).unwrap();
    assert_eq!(capture.count(0x1C), 2);
    assert_eq!(capture.direction_counts(0x1C), (0, 2));
    let ticks: Vec<u32> = capture.by_opcode(0x1C).map(|r| r.tick).collect();
    assert_eq!(ticks, vec![101, 103]);
    assert_eq!(capture.count(0x14), 0);
}

#[test]
fn test_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    {
        let mut writer = TraceWriter::new(&mut file).unwrap();
        for r in session() {
            writer.write_record(&r).unwrap();
        }
        assert_eq!(writer.written(), 5);
        writer.into_inner().unwrap();
    }
    file.flush().unwrap();

    let capture = TraceCapture::from_file(file.path()).unwrap();
    assert_eq!(capture.len(), 5);
    assert!(!capture.is_truncated());
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = TraceCapture::from_file(dir.path().join("absent.trace")).unwrap_err();
    assert!(matches!(err, WireError::Io(_)));
}

#[test]
fn test_truncated_payload_keeps_earlier_records() {
    let mut data = encode_capture(&session()).unwrap();
    // Header promising 20 bytes, followed by only 3.
    data.extend_from_slice(&[200, 0, 0, 0, b'R', 0, 20, 0, 0x1A, 0x77, 0x00]);
    let capture = TraceCapture::parse(&data).unwrap();
    assert_eq!(capture.len(), 5);
    assert_eq!(capture.truncated_tail(), 11);
    assert!(capture.is_truncated());
}

#[test]
fn test_truncated_header() {
    let mut data = encode_capture(&session()).unwrap();
    data.extend_from_slice(&[1, 2, 3]);
    let capture = TraceCapture::parse(&data).unwrap();
    assert_eq!(capture.len(), 5);
    assert_eq!(capture.truncated_tail(), 3);
}

#[test]
fn test_magic_only_capture_is_empty() {
    let capture = TraceCapture::parse(&TRACE_MAGIC).unwrap();
    assert!(capture.is_empty());
    assert!(!capture.is_truncated());
}

#[test]
fn test_bad_magic_reports_found_bytes() {
    match TraceCapture::parse(b"PROTxxxx") {
        Err(WireError::BadMagic { found }) => assert_eq!(found, b"PROTxxxx".to_vec()),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_custom_magic_from_config() {
    let config = WirecheckConfig::default_with_overrides(|c| c.trace.magic = "BCTRACE2".into());
    let magic = config.trace.magic_bytes().unwrap();

    let mut writer = TraceWriter::with_magic(Vec::new(), &magic).unwrap();
    writer.write(1, Direction::Sent, 0, &[0x14, 1, 0, 0, 0]).unwrap();
    let data = writer.into_inner().unwrap();

    assert_eq!(TraceCapture::parse_with_magic(&data, &magic).unwrap().len(), 1);
    assert!(TraceCapture::parse(&data).is_err());
}

#[test]
fn test_oversized_record_rejected_by_writer() {
    let mut writer = TraceWriter::new(Vec::new()).unwrap();
    let big = vec![0x1C; usize::from(u16::MAX) + 1];
    assert!(matches!(
        writer.write(1, Direction::Sent, 0, &big),
        Err(WireError::OversizedPayload(_))
    ));
}

#[test]
fn test_parse_updates_metrics() {
    let before = global_metrics().snapshot();
    TraceCapture::parse(&encode_capture(&session()).unwrap()).unwrap();
    let after = global_metrics().snapshot();
    assert!(after.captures_parsed > before.captures_parsed);
    assert!(after.records_parsed >= before.records_parsed + 5);
}
