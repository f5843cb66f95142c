#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! Boundary conditions and error paths across captures, schemas, codecs and
//! the checksum exchange

use wirecheck::checksum::{decode_response, Manifest, ResponseHeader};
use wirecheck::compare::{builtin_references, compare, compare_capture, CompareOptions};
use wirecheck::config::TRACE_MAGIC;
use wirecheck::core::compressed::{decode_cf16, encode_cf16, encode_cv3, Vec3};
use wirecheck::core::reader::WireReader;
use wirecheck::core::serialization::{MultiFormat, SerializationFormat};
use wirecheck::error::WireError;
use wirecheck::schema::messages::{BeamFire, Explosion, StateUpdate, TorpedoFire};
use wirecheck::schema::{opcodes, TorpedoMode};
use wirecheck::trace::{Direction, TraceCapture, TraceWriter};
use wirecheck::utils::hex::hex_preview;

// ============================================================================
// CAPTURE EDGE CASES
// ============================================================================

#[test]
fn test_empty_input_is_bad_magic() {
    match TraceCapture::parse(&[]) {
        Err(WireError::BadMagic { found }) => assert!(found.is_empty()),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_partial_magic_is_bad_magic() {
    assert!(matches!(
        TraceCapture::parse(&TRACE_MAGIC[..5]),
        Err(WireError::BadMagic { .. })
    ));
}

#[test]
fn test_records_after_unknown_direction_survive() {
    let mut w = TraceWriter::new(Vec::new()).unwrap();
    w.write(1, Direction::Sent, 0, &[0x14, 1, 0, 0, 0]).unwrap();
    let mut data = w.into_inner().unwrap();
    data.extend_from_slice(&[2, 0, 0, 0, b'X', 0, 1, 0, 0x14]);
    data.extend_from_slice(&[3, 0, 0, 0, 0x00, 0, 2, 0, 0x1A, 0x01]);
    let mut w = TraceWriter::new(Vec::new()).unwrap();
    w.write(4, Direction::Received, 1, &[0x29, 0xAA]).unwrap();
    data.extend_from_slice(&w.into_inner().unwrap()[TRACE_MAGIC.len()..]);

    let capture = TraceCapture::parse(&data).unwrap();
    let ticks: Vec<u32> = capture.records().iter().map(|r| r.tick).collect();
    assert_eq!(ticks, vec![1, 4]);
    assert_eq!(capture.skipped_malformed(), 2);
    assert!(capture.malformed().unwrap().contains("0x58"));
    assert_eq!(capture.truncated_tail(), 0);
    assert_eq!(capture.count(0x29), 1);

    let report = compare_capture(&capture, &builtin_references(), &CompareOptions::default());
    assert_eq!(report.skipped_malformed, 2);
    assert!(report.to_string().contains("2 malformed records skipped"));
}

#[test]
fn test_unknown_direction_in_truncated_tail() {
    let mut w = TraceWriter::new(Vec::new()).unwrap();
    w.write(1, Direction::Sent, 0, &[0x14, 1, 0, 0, 0]).unwrap();
    let mut data = w.into_inner().unwrap();
    data.extend_from_slice(&[2, 0, 0, 0, b'X', 0, 9, 0, 0x14]);

    let capture = TraceCapture::parse(&data).unwrap();
    assert_eq!(capture.len(), 1);
    assert_eq!(capture.skipped_malformed(), 0);
    assert!(capture.malformed().is_none());
    assert_eq!(capture.truncated_tail(), 9);
}

#[test]
fn test_only_empty_records() {
    let mut w = TraceWriter::new(Vec::new()).unwrap();
    for tick in 0..3 {
        w.write(tick, Direction::Received, 2, &[]).unwrap();
    }
    let capture = TraceCapture::parse(&w.into_inner().unwrap()).unwrap();
    assert!(capture.is_empty());
    assert_eq!(capture.skipped_empty(), 3);
    assert!(capture.sample(opcodes::STATE_UPDATE, Direction::Sent).is_none());
}

#[test]
fn test_sample_falls_back_to_other_direction() {
    let mut w = TraceWriter::new(Vec::new()).unwrap();
    w.write(7, Direction::Received, 1, &[0x0E, 1, 0, 0, 0]).unwrap();
    w.write(8, Direction::Received, 1, &[0x0E, 2, 0, 0, 0]).unwrap();
    let capture = TraceCapture::parse(&w.into_inner().unwrap()).unwrap();

    let sample = capture.sample(0x0E, Direction::Sent).unwrap();
    assert_eq!(sample.tick, 7);
    assert_eq!(sample.direction, Direction::Received);
}

#[test]
fn test_max_length_record() {
    let payload = vec![0x1C; usize::from(u16::MAX)];
    let mut w = TraceWriter::new(Vec::new()).unwrap();
    w.write(1, Direction::Sent, 0, &payload).unwrap();
    let capture = TraceCapture::parse(&w.into_inner().unwrap()).unwrap();
    assert_eq!(capture.records()[0].payload.len(), usize::from(u16::MAX));
}

// ============================================================================
// SCHEMA AND COMPARATOR EDGE CASES
// ============================================================================

#[test]
fn test_compare_rejects_empty_and_unknown() {
    assert!(matches!(compare(&[], None), Err(WireError::Custom(_))));
    assert!(matches!(
        compare(&[0x60, 0x00], None),
        Err(WireError::UnknownOpcode(0x60))
    ));
}

#[test]
fn test_compare_with_mismatched_reference_length() {
    let payload = [0x14, 0x05, 0x00, 0x00, 0x40];
    let checks = compare(&payload, Some(&[0x14, 0x05])).unwrap();
    let ref_len = checks.iter().find(|c| c.label == "Ref length match").unwrap();
    assert!(!ref_len.passed);
    // Fields missing from the reference are described without it.
    let field = checks.iter().find(|c| c.label == "object_id @ offset 1").unwrap();
    assert!(field.passed);
    assert!(field.detail.starts_with("present"));
}

#[test]
fn test_strict_decoders_reject_bad_layouts() {
    let err = Explosion::decode(&[0x29; 15]).unwrap_err();
    assert!(matches!(err, WireError::SchemaMismatch { opcode: 0x29, .. }));

    let err = BeamFire::decode(&[0x1A, 0, 0, 0]).unwrap_err();
    assert!(matches!(err, WireError::SchemaMismatch { opcode: 0x1A, .. }));

    let err = StateUpdate::decode(&[0x29, 0, 0, 0, 0, 0, 0, 0, 0, 0]).unwrap_err();
    assert!(err.to_string().contains("0x29"));

    assert!(TorpedoFire::decode(&[]).is_err());
}

#[test]
fn test_beam_target_flag_without_target_bytes() {
    let beam = [0x1A, 0x77, 0x00, 0x00, 0x40, 0x02, 0x75, 0x0E, 0xD2, 0x01];
    assert!(matches!(
        BeamFire::decode(&beam),
        Err(WireError::SchemaMismatch { .. })
    ));
}

#[test]
fn test_torpedo_mode_from_all_flag_bits() {
    let mode = TorpedoMode::from_flags(0xFF);
    assert!(mode.has_arc);
    assert!(mode.has_target);
    let mode = TorpedoMode::from_flags(0x00);
    assert!(!mode.has_arc);
    assert!(!mode.has_target);
}

// ============================================================================
// COMPRESSED NUMBER EDGE CASES
// ============================================================================

#[test]
fn test_cf16_extremes() {
    assert_eq!(decode_cf16(0), 0.0);
    let top = encode_cf16(f32::INFINITY);
    assert_eq!(top, encode_cf16(1.0e30));
    assert_eq!(top & 0x8000, 0);
    assert_eq!(encode_cf16(f32::NEG_INFINITY), top | 0x8000);
    assert!(decode_cf16(top) > 9_999.0);
}

#[test]
fn test_cv3_degenerate_vectors() {
    assert_eq!(encode_cv3(Vec3::ZERO), [0, 0, 0]);
    assert_eq!(encode_cv3(Vec3::new(f32::NAN, 0.0, 0.0)), [0, 0, 0]);
}

#[test]
fn test_reader_past_end() {
    let data = [1u8, 2, 3];
    let mut r = WireReader::at(&data, 10);
    assert_eq!(r.position(), 3);
    assert!(r.is_exhausted());
    let err = r.read_u8().unwrap_err();
    assert_eq!(err.offset, 3);
    assert_eq!(err.needed, 1);
    assert_eq!(err.available, 0);

    let mut r = WireReader::new(&data);
    assert!(r.read_u32().is_err());
    assert_eq!(r.position(), 0);
}

// ============================================================================
// CHECKSUM EDGE CASES
// ============================================================================

#[test]
fn test_response_header_boundaries() {
    assert!(matches!(
        ResponseHeader::parse(&[]),
        Err(WireError::BadChecksumHeader(_))
    ));
    // Round 0 needs the extra version hash.
    assert!(ResponseHeader::parse(&[0x21, 0x00, 1, 2, 3, 4]).is_err());
    assert!(ResponseHeader::parse(&[0x21, 0x01, 1, 2, 3, 4]).is_ok());
}

#[test]
fn test_header_only_response() {
    // No tree at all: every grammar runs out of bytes reading the file count.
    let err = decode_response(&[0x21, 0x01, 0xB0, 0xDC, 0x2B, 0x12]).unwrap_err();
    match err {
        WireError::UnresolvedGrammar { offset, .. } => assert_eq!(offset, 6),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_empty_tree_response() {
    let decoded = decode_response(&[0x21, 0x01, 0xB0, 0xDC, 0x2B, 0x12, 0, 0, 0]).unwrap();
    assert!(decoded.tree.files.is_empty());
    assert!(decoded.tree.subdirs.is_empty());
    assert_eq!(decoded.tree.depth(), 1);
}

#[test]
fn test_manifest_of_missing_game_dir() {
    let dir = tempfile::tempdir().unwrap();
    let err = Manifest::build(dir.path().join("nope"), "60").unwrap_err();
    assert!(matches!(err, WireError::MissingDirectory(_)));
}

#[test]
fn test_manifest_of_empty_game_dir() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = Manifest::build(dir.path(), "60").unwrap();
    assert_eq!(manifest.present_rounds(), 0);
    assert_eq!(manifest.rounds.len(), 4);
}

#[test]
fn test_export_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("manifest.json");
    let manifest = Manifest::default();
    manifest.export_to_file(&path, SerializationFormat::Json).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    let back = Manifest::deserialize_format(&bytes, SerializationFormat::Json).unwrap();
    assert_eq!(back, manifest);
}

#[test]
fn test_deserialize_garbage() {
    assert!(matches!(
        Manifest::deserialize_with_header(&[]),
        Err(WireError::DeserializeError(_))
    ));
    assert!(matches!(
        Manifest::deserialize_with_header(&[0xEE, 1, 2]),
        Err(WireError::DeserializeError(_))
    ));
}

#[test]
fn test_hex_preview_zero_width() {
    assert_eq!(hex_preview(&[0xAB], 0), " ... (+1 bytes)");
    assert_eq!(hex_preview(&[], 0), "");
}
