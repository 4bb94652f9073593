//! Edge case integration tests for the RDB decoder.
//!
//! Three groups:
//!
//! - **Error kinds**: every fatal error is reachable from a byte stream,
//!   is reported exactly once, and nothing is emitted after it.
//! - **Lifecycle**: `finish` semantics, input after a failure, input after
//!   the end, empty chunks.
//! - **Boundaries**: zero-length strings, empty collections, the widest
//!   length encodings, the configured length cap.

use rdb_decoder::{DecodeError, DecoderConfig, ErrorKind, EventCollector, RdbDecoder};
use rdb_tests::SnapshotBuilder;
use rdb_tests::encoding::{self, ZipEntry};
use rdb_types::{Entity, ScoredMember, Value};
use rdb_wire::tags::record_type;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn run(bytes: &[u8]) -> EventCollector {
    let mut decoder = RdbDecoder::new(EventCollector::new());
    decoder.feed(bytes);
    decoder.finish();
    decoder.into_sink()
}

/// Decode `bytes` and return the kind of the single reported error, after
/// checking that it is the last event.
fn error_kind(bytes: &[u8]) -> ErrorKind {
    let sink = run(bytes);
    let err = sink
        .error()
        .unwrap_or_else(|| panic!("expected an error, got {:?}", sink.events()));
    assert!(
        matches!(sink.events().last(), Some(rdb_decoder::DecoderEvent::Error(_))),
        "error must be the final event"
    );
    assert!(!sink.ended());
    err.kind()
}

// ── Error kinds ───────────────────────────────────────────────────────────────

#[test]
fn corrupted_header() {
    let bytes = SnapshotBuilder::new()
        .header(b"REDIS0003")
        .string("k", "v")
        .encode()
        .unwrap();
    let sink = run(&bytes);
    assert_eq!(sink.events().len(), 1);
    assert_eq!(sink.error().map(DecodeError::kind), Some(ErrorKind::UnsupportedFormat));
}

#[test]
fn header_mismatch_detail_names_found_bytes() {
    let sink = run(b"RADIS0002\xFF");
    let message = sink.error().unwrap().to_string();
    assert!(message.contains("RADIS0002"), "{message}");
}

#[test]
fn unknown_record_type() {
    let bytes = SnapshotBuilder::new()
        .string("before", "ok")
        .raw(&[0x07])
        .raw(&encoding::raw_string(b"mystery"))
        .raw(&encoding::raw_string(b"payload"))
        .encode()
        .unwrap();
    let sink = run(&bytes);
    assert_eq!(sink.entities().count(), 1);
    match sink.error() {
        Some(DecodeError::UnknownType { type_id: 7, key }) => assert_eq!(key, "mystery"),
        other => panic!("expected UnknownType, got {other:?}"),
    }
}

#[test]
fn unknown_string_encoding() {
    let bytes = SnapshotBuilder::new()
        .raw(&[record_type::STRING])
        .raw(&encoding::raw_string(b"k"))
        .raw(&[encoding::special(9)])
        .encode()
        .unwrap();
    assert_eq!(error_kind(&bytes), ErrorKind::UnknownEncoding);
}

#[test]
fn unsupported_ziplist_integer_width() {
    // Header, prevlen 0, integer entry with width bits 11, end.
    let mut payload = vec![0u8; 10];
    payload.extend_from_slice(&[0x00, 0xF0, 0x00, 0xFF]);
    let bytes = SnapshotBuilder::new()
        .compact_raw(record_type::LIST_ZIPLIST, "l", &payload)
        .encode()
        .unwrap();
    assert_eq!(error_kind(&bytes), ErrorKind::UnsupportedEncoding);
}

#[test]
fn unsupported_intset_width() {
    let bytes = SnapshotBuilder::new()
        .compact_raw(record_type::SET_INTSET, "s", &encoding::intset(3, &[]))
        .encode()
        .unwrap();
    let sink = run(&bytes);
    assert!(matches!(
        sink.error(),
        Some(DecodeError::UnsupportedEncoding { context: "intset", encoding: 3 })
    ));
}

#[test]
fn truncated_compressed_payload() {
    let text = "abcabcabcabcabcabcabcabcabcabcabcabcabcabcabcabcabcabc";
    let mut string = encoding::lzf_string(text.as_bytes()).unwrap();
    // Drop the last payload byte and shrink the compressed length to match.
    string.pop();
    string[1] -= 1;

    let bytes = SnapshotBuilder::new()
        .raw(&[record_type::STRING])
        .raw(&encoding::raw_string(b"k"))
        .raw(&string)
        .encode()
        .unwrap();
    let sink = run(&bytes);
    assert_eq!(sink.entities().count(), 0);
    assert_eq!(
        sink.error().map(DecodeError::kind),
        Some(ErrorKind::DecompressionFailure)
    );
}

#[test]
fn ziplist_past_its_end() {
    let mut payload = encoding::ziplist(&[ZipEntry::str("abc")]);
    // Claim a longer first entry than the payload holds.
    payload[11] = 0x30;
    let bytes = SnapshotBuilder::new()
        .compact_raw(record_type::LIST_ZIPLIST, "l", &payload)
        .encode()
        .unwrap();
    assert_eq!(error_kind(&bytes), ErrorKind::MalformedPayload);
}

#[test]
fn odd_zipmap_is_malformed() {
    // zmlen, one field with no value, end.
    let payload = [0x01, 0x01, b'f', 0xFF];
    let bytes = SnapshotBuilder::new()
        .compact_raw(record_type::HASH_ZIPMAP, "h", &payload)
        .encode()
        .unwrap();
    assert_eq!(error_kind(&bytes), ErrorKind::MalformedPayload);
}

#[test]
fn odd_sorted_set_ziplist_is_malformed() {
    let bytes = SnapshotBuilder::new()
        .ziplist_sorted_set("z", &[ZipEntry::str("a"), ZipEntry::Int(1), ZipEntry::str("b")])
        .encode()
        .unwrap();
    let sink = run(&bytes);
    assert!(matches!(sink.error(), Some(DecodeError::Type(_))));
}

#[test]
fn missing_end_marker() {
    let bytes = SnapshotBuilder::new()
        .string("k1", "ssssssss")
        .without_eof()
        .encode()
        .unwrap();
    let sink = run(&bytes);
    assert_eq!(sink.entities().count(), 1);
    assert!(matches!(sink.error(), Some(DecodeError::UnexpectedEnd)));
}

#[test]
fn trailing_bytes_after_end() {
    let mut bytes = SnapshotBuilder::new().string("k", "v").encode().unwrap();
    bytes.extend_from_slice(b"junk");
    let sink = run(&bytes);
    assert_eq!(sink.entities().count(), 1);
    assert!(matches!(
        sink.error(),
        Some(DecodeError::TrailingData { extra_bytes: 4 })
    ));
}

#[test]
fn declared_length_over_limit() {
    let mut bytes = SnapshotBuilder::new().without_eof().encode().unwrap();
    bytes.push(record_type::STRING);
    bytes.extend(encoding::raw_string(b"k"));
    bytes.extend(encoding::length(1 << 30));

    let config = DecoderConfig {
        max_string_len: 1 << 20,
        ..DecoderConfig::default()
    };
    let mut decoder = RdbDecoder::with_config(EventCollector::new(), config);
    decoder.feed(&bytes);
    assert!(matches!(
        decoder.sink().error(),
        Some(DecodeError::LengthLimitExceeded { length: 1_073_741_824, limit: 1_048_576 })
    ));
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[test]
fn finish_before_any_input() {
    let sink = run(b"");
    assert!(matches!(sink.error(), Some(DecodeError::UnexpectedEnd)));
}

#[test]
fn suspended_without_finish_reports_nothing() {
    let bytes = SnapshotBuilder::new().string("k", "v").encode().unwrap();
    let mut decoder = RdbDecoder::new(EventCollector::new());
    decoder.feed(&bytes[..bytes.len() - 1]);
    assert_eq!(decoder.sink().entities().count(), 1);
    assert!(decoder.sink().error().is_none());
    assert!(!decoder.sink().ended());
}

#[test]
fn input_after_failure_is_ignored() {
    let mut decoder = RdbDecoder::new(EventCollector::new());
    decoder.feed(b"XXXXXXXXX");
    let good = SnapshotBuilder::new().string("k", "v").encode().unwrap();
    decoder.feed(&good);
    decoder.finish();
    assert_eq!(decoder.sink().events().len(), 1);
    assert_eq!(decoder.stats().entities, 0);
}

#[test]
fn empty_chunks_are_harmless() {
    let bytes = SnapshotBuilder::new().string("k", "v").encode().unwrap();
    let mut decoder = RdbDecoder::new(EventCollector::new());
    for chunk in bytes.chunks(2) {
        decoder.feed(&[]);
        decoder.feed(chunk);
    }
    decoder.feed(&[]);
    decoder.finish();
    assert!(decoder.sink().ended());
    assert_eq!(decoder.sink().entities().count(), 1);
}

#[test]
fn decode_returns_first_error() {
    let result = RdbDecoder::decode(b"REDIS0002");
    assert!(matches!(result, Err(DecodeError::UnexpectedEnd)));
}

// ── Boundaries ────────────────────────────────────────────────────────────────

#[test]
fn empty_string_key_and_value() {
    let bytes = SnapshotBuilder::new().string("", "").encode().unwrap();
    assert_eq!(
        RdbDecoder::decode(&bytes).unwrap(),
        vec![Entity::new("", Value::String(Vec::new()))]
    );
}

#[test]
fn empty_collections() {
    let empty: [&str; 0] = [];
    let bytes = SnapshotBuilder::new()
        .list("l", &empty)
        .set("s", &empty)
        .hash("h", &[])
        .sorted_set("z", &[])
        .ziplist_list("zl", &[])
        .zipmap_hash("zm", &[])
        .intset("is", &[])
        .encode()
        .unwrap();

    let entities = RdbDecoder::decode(&bytes).unwrap();
    assert_eq!(entities.len(), 7);
    assert!(entities.iter().all(|e| e.value.is_empty()));
}

#[test]
fn thirty_two_bit_length_string() {
    let value = vec![b'q'; 70_000];
    let bytes = SnapshotBuilder::new().string("big", &value).encode().unwrap();
    let entities = RdbDecoder::decode(&bytes).unwrap();
    assert_eq!(entities[0].value, Value::String(value));
}

#[test]
fn wide_prevlen_ziplist() {
    let long = ZipEntry::Str(vec![b'x'; 300]);
    let entries = [long.clone(), ZipEntry::str("after"), ZipEntry::Int(i64::MIN)];
    let bytes = SnapshotBuilder::new()
        .ziplist_list("l", &entries)
        .encode()
        .unwrap();

    let entities = RdbDecoder::decode(&bytes).unwrap();
    assert_eq!(
        entities[0].value,
        Value::List(vec![vec![b'x'; 300], b"after".to_vec(), b"-9223372036854775808".to_vec()])
    );
}

#[test]
fn int8_minus_one() {
    let bytes = SnapshotBuilder::new().int_string("n", -1).encode().unwrap();
    let entities = RdbDecoder::decode(&bytes).unwrap();
    assert_eq!(entities[0].value, Value::String(b"-1".to_vec()));
}

#[test]
fn select_db_with_wide_index() {
    let bytes = SnapshotBuilder::new()
        .select_db(300)
        .string("k", "v")
        .select_db(2)
        .encode()
        .unwrap();
    let mut decoder = RdbDecoder::new(EventCollector::new());
    decoder.feed(&bytes);
    decoder.finish();
    assert_eq!(decoder.stats().databases, vec![300, 2]);
    assert_eq!(decoder.stats().last_db, Some(2));
}

#[test]
fn non_utf8_score_is_decoded_lossily() {
    let bytes = SnapshotBuilder::new()
        .raw(&[record_type::ZSET])
        .raw(&encoding::raw_string(b"z"))
        .raw(&encoding::length(1))
        .raw(&encoding::raw_string(b"m"))
        .raw(&[0x02, 0xC3, 0x28])
        .encode()
        .unwrap();
    let entities = RdbDecoder::decode(&bytes).unwrap();
    assert_eq!(
        entities,
        vec![Entity::new(
            "z",
            Value::SortedSet(vec![ScoredMember::new("m", "\u{FFFD}(")])
        )]
    );
}
