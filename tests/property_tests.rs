//! Property-based tests using proptest
//!
//! These tests check capture framing, hashing, response grammars and the
//! comparator against a wide range of generated inputs.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use proptest::prelude::*;
use wirecheck::checksum::{
    content_hash, encode_response, ChecksumDecoder, FileHash, GrammarVariant, ResponseHeader,
    ResponseSubdir, ResponseTree,
};
use wirecheck::compare::compare_payload;
use wirecheck::config::TRACE_MAGIC;
use wirecheck::schema::REGISTRY;
use wirecheck::trace::{encode_capture, Direction, TraceCapture, TraceRecord};

fn record() -> impl Strategy<Value = TraceRecord> {
    (
        any::<u32>(),
        any::<bool>(),
        any::<u8>(),
        prop::collection::vec(any::<u8>(), 0..64),
    )
        .prop_map(|(tick, sent, slot, payload)| {
            let direction = if sent {
                Direction::Sent
            } else {
                Direction::Received
            };
            TraceRecord::new(tick, direction, slot, payload)
        })
}

fn tree() -> impl Strategy<Value = ResponseTree> {
    let file = (any::<u32>(), any::<u32>()).prop_map(|(name_hash, content_hash)| FileHash {
        name_hash,
        content_hash,
    });
    let leaf = prop::collection::vec(file.clone(), 0..4).prop_map(|files| ResponseTree {
        files,
        subdirs: Vec::new(),
    });
    leaf.prop_recursive(3, 24, 3, move |inner| {
        (
            prop::collection::vec(file.clone(), 0..4),
            prop::collection::vec((any::<u32>(), inner), 0..3),
        )
            .prop_map(|(files, subdirs)| ResponseTree {
                files,
                subdirs: subdirs
                    .into_iter()
                    .map(|(name_hash, tree)| ResponseSubdir { name_hash, tree })
                    .collect(),
            })
    })
}

fn variant() -> impl Strategy<Value = GrammarVariant> {
    prop_oneof![
        Just(GrammarVariant::Interleaved),
        Just(GrammarVariant::NamesFirst)
    ]
}

// Property: non-empty records come back in capture order, empty ones are counted
proptest! {
    #[test]
    fn prop_capture_preserves_order(records in prop::collection::vec(record(), 0..40)) {
        let data = encode_capture(&records).unwrap();
        let capture = TraceCapture::parse(&data).unwrap();

        let kept: Vec<TraceRecord> = records.iter().filter(|r| !r.payload.is_empty()).cloned().collect();
        prop_assert_eq!(capture.records(), kept.as_slice());
        prop_assert_eq!(capture.skipped_empty(), records.len() - kept.len());
        prop_assert_eq!(capture.opcode_counts().values().sum::<usize>(), capture.len());
        prop_assert!(!capture.is_truncated());
    }
}

// Property: any bytes after a valid magic parse without error
proptest! {
    #[test]
    fn prop_capture_body_never_fatal(body in prop::collection::vec(any::<u8>(), 0..512)) {
        let mut data = TRACE_MAGIC.to_vec();
        data.extend_from_slice(&body);

        let capture = TraceCapture::parse(&data).unwrap();
        let consumed: usize = capture.records().iter().map(TraceRecord::encoded_len).sum();
        prop_assert!(consumed + capture.truncated_tail() <= body.len());
    }
}

// Property: cutting a capture anywhere keeps a prefix of its records
proptest! {
    #[test]
    fn prop_truncated_capture_is_prefix(
        records in prop::collection::vec(record(), 1..20),
        cut in any::<prop::sample::Index>(),
    ) {
        let data = encode_capture(&records).unwrap();
        let full = TraceCapture::parse(&data).unwrap();
        let end = TRACE_MAGIC.len() + cut.index(data.len() - TRACE_MAGIC.len() + 1);

        let partial = TraceCapture::parse(&data[..end]).unwrap();
        prop_assert!(partial.len() <= full.len());
        prop_assert_eq!(partial.records(), &full.records()[..partial.len()]);
    }
}

// Property: the second little-endian word never affects the content hash
proptest! {
    #[test]
    fn prop_content_hash_ignores_second_word(
        mut data in prop::collection::vec(any::<u8>(), 8..256),
        word in any::<[u8; 4]>(),
    ) {
        let before = content_hash(&data);
        data[4..8].copy_from_slice(&word);
        prop_assert_eq!(content_hash(&data), before);
    }
}

// Property: a variant decodes its own encoding exactly and rejects trailing bytes
proptest! {
    #[test]
    fn prop_grammar_exact_consumption(
        tree in tree(),
        variant in variant(),
        round in 1u8..=3,
        dir_hash in any::<u32>(),
        suffix in prop::collection::vec(any::<u8>(), 1..8),
    ) {
        let header = ResponseHeader { round, ref_hash: None, dir_hash };
        let mut buf = encode_response(&header, &tree, variant).unwrap();
        let decoder = ChecksumDecoder::default();

        let decoded = decoder.decode_with(&buf, variant).unwrap();
        prop_assert_eq!(&decoded.tree, &tree);

        buf.extend_from_slice(&suffix);
        prop_assert!(decoder.decode_with(&buf, variant).is_err());
    }
}

// Property: whatever the decoder accepts re-encodes to the same bytes
proptest! {
    #[test]
    fn prop_accepted_response_reencodes(body in prop::collection::vec(any::<u8>(), 0..96)) {
        let mut buf = vec![0x21, 0x02, 0x15, 0xD3, 0x31, 0xB8];
        buf.extend_from_slice(&body);

        if let Ok(decoded) = ChecksumDecoder::default().decode(&buf) {
            let again = encode_response(&decoded.header, &decoded.tree, decoded.variant).unwrap();
            prop_assert_eq!(again, buf);
        }
    }
}

// Property: every registered schema yields checks for arbitrary payloads
proptest! {
    #[test]
    fn prop_comparator_total_on_arbitrary_payloads(
        which in any::<prop::sample::Index>(),
        tail in prop::collection::vec(any::<u8>(), 0..48),
        reference in prop::option::of(prop::collection::vec(any::<u8>(), 0..48)),
    ) {
        let schema = &REGISTRY[which.index(REGISTRY.len())];
        let mut payload = vec![schema.opcode];
        payload.extend_from_slice(&tail);
        let reference = reference.map(|mut r| {
            r.insert(0, schema.opcode);
            r
        });

        let checks = compare_payload(&payload, schema, reference.as_deref());
        prop_assert_eq!(checks[0].label.as_str(), "Opcode byte");
        prop_assert!(checks[0].passed);
        prop_assert!(checks.len() >= 2);
    }
}
