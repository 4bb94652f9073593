use std::mem;

use rdb_types::{EntityKind, RecordType, ScoredMember, Value};
use rdb_wire::tags::{double, encoding};
use rdb_wire::{ChunkCursor, FixedBytes, LengthMarker, LengthReader, Progress};

use crate::compact::decode_compact;
use crate::decompression::decompress;
use crate::error::DecodeError;

/// Most elements a collection reader reserves room for up front.
const PREALLOC_ITEMS: usize = 1024;

/// Result of one poll of a value-level reader.
pub(crate) type Poll<T> = Result<Progress<T>, DecodeError>;

/// Convert a declared length into a buffer size, enforcing the limit.
fn checked_len(length: u64, limit: usize) -> Result<usize, DecodeError> {
  match usize::try_from(length) {
    Ok(len) if len <= limit => Ok(len),
    _ => Err(DecodeError::LengthLimitExceeded { length, limit }),
  }
}

/// Sign-extend a 1 to 8 byte little-endian integer.
#[allow(clippy::cast_possible_wrap)]
fn signed_le(bytes: &[u8]) -> i64 {
  let mut acc = 0u64;
  for (i, byte) in bytes.iter().enumerate() {
    acc |= u64::from(*byte) << (8 * i);
  }
  let shift = 64 - 8 * bytes.len();
  ((acc << shift) as i64) >> shift
}

/// Resumable reader for one string, in any of its encodings.
///
/// ```text
///   Length ──Len(n)──────────────► Raw(n bytes) ─────────────► Done(bytes)
///      │
///      ├──Special(0|1|2)─────────► Int(1|2|4 bytes) ─────────► Done(decimal text)
///      │
///      └──Special(3)─► LzfCompressedLen ─► LzfRawLen ─► LzfData ─► Done(decompressed)
/// ```
///
/// Every arrow is a place where the reader may suspend. On `Done` the reader
/// resets to `Length` and can be polled again for the next string.
#[derive(Debug)]
pub(crate) enum StringReader {
  Length(LengthReader),
  Raw(FixedBytes),
  Int(FixedBytes),
  LzfCompressedLen(LengthReader),
  LzfRawLen { compressed: usize, len: LengthReader },
  LzfData { raw_len: usize, data: FixedBytes },
}

impl Default for StringReader {
  fn default() -> Self {
    Self::Length(LengthReader::new())
  }
}

impl StringReader {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  pub(crate) fn poll(&mut self, cur: &mut ChunkCursor<'_>, limit: usize) -> Poll<Vec<u8>> {
    loop {
      match self {
        Self::Length(len) => {
          let Progress::Done(marker) = len.poll(cur) else {
            return Ok(Progress::NeedMore);
          };
          *self = match marker {
            LengthMarker::Len(n) => Self::Raw(FixedBytes::new(checked_len(n, limit)?)),
            LengthMarker::Special(encoding::INT8) => Self::Int(FixedBytes::new(1)),
            LengthMarker::Special(encoding::INT16) => Self::Int(FixedBytes::new(2)),
            LengthMarker::Special(encoding::INT32) => Self::Int(FixedBytes::new(4)),
            LengthMarker::Special(encoding::LZF) => Self::LzfCompressedLen(LengthReader::new()),
            LengthMarker::Special(other) => {
              return Err(DecodeError::UnknownEncoding { encoding: other });
            }
          };
        }
        Self::Raw(bytes) => {
          let Progress::Done(data) = bytes.poll(cur) else {
            return Ok(Progress::NeedMore);
          };
          *self = Self::default();
          return Ok(Progress::Done(data));
        }
        Self::Int(bytes) => {
          let Progress::Done(data) = bytes.poll(cur) else {
            return Ok(Progress::NeedMore);
          };
          *self = Self::default();
          return Ok(Progress::Done(signed_le(&data).to_string().into_bytes()));
        }
        Self::LzfCompressedLen(len) => {
          let Progress::Done(marker) = len.poll(cur) else {
            return Ok(Progress::NeedMore);
          };
          *self = Self::LzfRawLen {
            compressed: checked_len(marker.value(), limit)?,
            len: LengthReader::new(),
          };
        }
        Self::LzfRawLen { compressed, len } => {
          let Progress::Done(marker) = len.poll(cur) else {
            return Ok(Progress::NeedMore);
          };
          let compressed = *compressed;
          *self = Self::LzfData {
            raw_len: checked_len(marker.value(), limit)?,
            data: FixedBytes::new(compressed),
          };
        }
        Self::LzfData { raw_len, data } => {
          let Progress::Done(packed) = data.poll(cur) else {
            return Ok(Progress::NeedMore);
          };
          let raw_len = *raw_len;
          *self = Self::default();
          return decompress(&packed, raw_len).map(Progress::Done);
        }
      }
    }
  }
}

/// Resumable reader for a sorted-set score.
///
/// One length byte, then that many bytes of ASCII decimal text. Three
/// length values are sentinels with no text behind them. The text is
/// returned as-is; it is never parsed as a float.
#[derive(Debug, Default)]
pub(crate) enum DoubleReader {
  #[default]
  Length,
  Text(FixedBytes),
}

impl DoubleReader {
  pub(crate) fn poll(&mut self, cur: &mut ChunkCursor<'_>) -> Progress<Vec<u8>> {
    loop {
      match self {
        Self::Length => {
          let Ok(len) = cur.read_u8() else {
            return Progress::NeedMore;
          };
          let sentinel: &[u8] = match len {
            double::NAN => b"NaN",
            double::POS_INF => b"+inf",
            double::NEG_INF => b"-inf",
            n => {
              *self = Self::Text(FixedBytes::new(usize::from(n)));
              continue;
            }
          };
          return Progress::Done(sentinel.to_vec());
        }
        Self::Text(bytes) => {
          let Progress::Done(text) = bytes.poll(cur) else {
            return Progress::NeedMore;
          };
          *self = Self::Length;
          return Progress::Done(text);
        }
      }
    }
  }
}

/// Resumable reader for a count followed by that many strings.
///
/// Lists and sets read `count` strings; hashes read `2 × count`, which
/// is handed to the caller flat and paired afterwards.
#[derive(Debug)]
pub(crate) struct SequenceReader {
  per_count: u64,
  state: SequenceState,
  items: Vec<Vec<u8>>,
}

#[derive(Debug)]
enum SequenceState {
  Count(LengthReader),
  Items { remaining: u64, item: StringReader },
}

impl SequenceReader {
  fn new(per_count: u64) -> Self {
    Self {
      per_count,
      state: SequenceState::Count(LengthReader::new()),
      items: Vec::new(),
    }
  }

  fn poll(&mut self, cur: &mut ChunkCursor<'_>, limit: usize) -> Poll<Vec<Vec<u8>>> {
    loop {
      match &mut self.state {
        SequenceState::Count(len) => {
          let Progress::Done(marker) = len.poll(cur) else {
            return Ok(Progress::NeedMore);
          };
          let remaining = marker.value().saturating_mul(self.per_count);
          let reserve = usize::try_from(remaining).unwrap_or(usize::MAX);
          self.items = Vec::with_capacity(reserve.min(PREALLOC_ITEMS));
          self.state = SequenceState::Items {
            remaining,
            item: StringReader::new(),
          };
        }
        SequenceState::Items { remaining: 0, .. } => {
          return Ok(Progress::Done(mem::take(&mut self.items)));
        }
        SequenceState::Items { remaining, item } => {
          let Progress::Done(bytes) = item.poll(cur, limit)? else {
            return Ok(Progress::NeedMore);
          };
          *remaining -= 1;
          self.items.push(bytes);
        }
      }
    }
  }
}

/// Resumable reader for a general sorted set: a pair count, then
/// `(member string, score double)` pairs.
#[derive(Debug)]
pub(crate) struct SortedSetReader {
  state: SortedSetState,
  members: Vec<ScoredMember>,
}

#[derive(Debug)]
enum SortedSetState {
  Count(LengthReader),
  Member { remaining: u64, member: StringReader },
  Score { remaining: u64, member: Vec<u8>, score: DoubleReader },
}

impl SortedSetReader {
  fn new() -> Self {
    Self {
      state: SortedSetState::Count(LengthReader::new()),
      members: Vec::new(),
    }
  }

  fn poll(&mut self, cur: &mut ChunkCursor<'_>, limit: usize) -> Poll<Vec<ScoredMember>> {
    loop {
      match &mut self.state {
        SortedSetState::Count(len) => {
          let Progress::Done(marker) = len.poll(cur) else {
            return Ok(Progress::NeedMore);
          };
          let remaining = marker.value();
          let reserve = usize::try_from(remaining).unwrap_or(usize::MAX);
          self.members = Vec::with_capacity(reserve.min(PREALLOC_ITEMS));
          self.state = SortedSetState::Member {
            remaining,
            member: StringReader::new(),
          };
        }
        SortedSetState::Member { remaining: 0, .. } => {
          return Ok(Progress::Done(mem::take(&mut self.members)));
        }
        SortedSetState::Member { remaining, member } => {
          let Progress::Done(bytes) = member.poll(cur, limit)? else {
            return Ok(Progress::NeedMore);
          };
          let remaining = *remaining;
          self.state = SortedSetState::Score {
            remaining,
            member: bytes,
            score: DoubleReader::default(),
          };
        }
        SortedSetState::Score {
          remaining,
          member,
          score,
        } => {
          let Progress::Done(text) = score.poll(cur) else {
            return Ok(Progress::NeedMore);
          };
          let remaining = *remaining - 1;
          self
            .members
            .push(ScoredMember::from_raw(mem::take(member), text));
          self.state = SortedSetState::Member {
            remaining,
            member: StringReader::new(),
          };
        }
      }
    }
  }
}

/// Resumable reader for the value of one record, selected by its type.
#[derive(Debug)]
pub(crate) enum ValueReader {
  String(StringReader),
  List(SequenceReader),
  Set(SequenceReader),
  Hash(SequenceReader),
  SortedSet(SortedSetReader),
  Compact {
    record: RecordType,
    payload: StringReader,
  },
}

impl ValueReader {
  /// The reader for a value of type `record`, or `None` if the type byte
  /// does not introduce a value.
  pub(crate) fn for_record(record: RecordType) -> Option<Self> {
    if record.is_compact() {
      return Some(Self::Compact {
        record,
        payload: StringReader::new(),
      });
    }
    let reader = match record.kind()? {
      EntityKind::String => Self::String(StringReader::new()),
      EntityKind::List => Self::List(SequenceReader::new(1)),
      EntityKind::Set => Self::Set(SequenceReader::new(1)),
      EntityKind::Hash => Self::Hash(SequenceReader::new(2)),
      EntityKind::SortedSet => Self::SortedSet(SortedSetReader::new()),
    };
    Some(reader)
  }

  pub(crate) fn poll(&mut self, cur: &mut ChunkCursor<'_>, limit: usize) -> Poll<Value> {
    let value = match self {
      Self::String(reader) => match reader.poll(cur, limit)? {
        Progress::Done(bytes) => Value::String(bytes),
        Progress::NeedMore => return Ok(Progress::NeedMore),
      },
      Self::List(reader) => match reader.poll(cur, limit)? {
        Progress::Done(items) => Value::List(items),
        Progress::NeedMore => return Ok(Progress::NeedMore),
      },
      Self::Set(reader) => match reader.poll(cur, limit)? {
        Progress::Done(items) => Value::Set(items),
        Progress::NeedMore => return Ok(Progress::NeedMore),
      },
      Self::Hash(reader) => match reader.poll(cur, limit)? {
        Progress::Done(items) => Value::hash_from_flat(items)?,
        Progress::NeedMore => return Ok(Progress::NeedMore),
      },
      Self::SortedSet(reader) => match reader.poll(cur, limit)? {
        Progress::Done(members) => Value::SortedSet(members),
        Progress::NeedMore => return Ok(Progress::NeedMore),
      },
      Self::Compact { record, payload } => match payload.poll(cur, limit)? {
        Progress::Done(bytes) => decode_compact(*record, &bytes)?,
        Progress::NeedMore => return Ok(Progress::NeedMore),
      },
    };
    Ok(Progress::Done(value))
  }
}

#[cfg(test)]
mod tests {
  use rdb_types::HashField;

  use super::*;

  const LIMIT: usize = 1 << 20;

  /// Poll `reader` over `bytes` one byte per chunk until it completes.
  fn bytewise<T>(
    bytes: &[u8],
    mut poll: impl FnMut(&mut ChunkCursor<'_>) -> Poll<T>,
  ) -> Result<T, DecodeError> {
    for (i, byte) in bytes.iter().enumerate() {
      let chunk = [*byte];
      let mut cur = ChunkCursor::new(&chunk);
      if let Progress::Done(v) = poll(&mut cur)? {
        assert_eq!(i + 1, bytes.len(), "completed before the last byte");
        return Ok(v);
      }
    }
    panic!("reader never completed");
  }

  fn whole<T>(
    bytes: &[u8],
    mut poll: impl FnMut(&mut ChunkCursor<'_>) -> Poll<T>,
  ) -> Result<T, DecodeError> {
    let mut cur = ChunkCursor::new(bytes);
    match poll(&mut cur)? {
      Progress::Done(v) => {
        assert!(cur.is_empty(), "reader left {} bytes", cur.remaining());
        Ok(v)
      }
      Progress::NeedMore => panic!("reader wanted more"),
    }
  }

  fn read_string(bytes: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mut reader = StringReader::new();
    whole(bytes, |cur| reader.poll(cur, LIMIT))
  }

  fn read_value(record: RecordType, bytes: &[u8]) -> Result<Value, DecodeError> {
    let mut reader = ValueReader::for_record(record).unwrap();
    let split = bytewise(bytes, |cur| reader.poll(cur, LIMIT));
    let mut reader = ValueReader::for_record(record).unwrap();
    let single = whole(bytes, |cur| reader.poll(cur, LIMIT));
    assert_eq!(format!("{split:?}"), format!("{single:?}"));
    single
  }

  fn lzf_string(raw: &[u8]) -> Vec<u8> {
    let packed = lzf::compress(raw).unwrap();
    let mut out = vec![0xC3];
    out.push(0x40 | u8::try_from(packed.len() >> 8).unwrap());
    out.push(u8::try_from(packed.len() & 0xFF).unwrap());
    out.push(0x40 | u8::try_from(raw.len() >> 8).unwrap());
    out.push(u8::try_from(raw.len() & 0xFF).unwrap());
    out.extend_from_slice(&packed);
    out
  }

  #[test]
  fn raw_string() {
    assert_eq!(read_string(b"\x08ssssssss").unwrap(), b"ssssssss");
    assert_eq!(read_string(b"\x00").unwrap(), b"");
  }

  #[test]
  fn integer_strings_become_text() {
    assert_eq!(read_string(&[0xC0, 0xFF]).unwrap(), b"-1");
    assert_eq!(read_string(&[0xC0, 0x7B]).unwrap(), b"123");
    assert_eq!(read_string(&[0xC1, 0xF5, 0x01]).unwrap(), b"501");
    assert_eq!(read_string(&[0xC1, 0x00, 0x80]).unwrap(), b"-32768");
    assert_eq!(
      read_string(&[0xC2, 0xA1, 0x86, 0x01, 0x00]).unwrap(),
      b"100001"
    );
    assert_eq!(
      read_string(&[0xC2, 0xFF, 0xFF, 0xFF, 0xFF]).unwrap(),
      b"-1"
    );
  }

  #[test]
  fn unknown_special_encoding() {
    assert!(matches!(
      read_string(&[0xC4]),
      Err(DecodeError::UnknownEncoding { encoding: 4 })
    ));
  }

  #[test]
  fn compressed_string() {
    let raw = vec![b'a'; 400];
    assert_eq!(read_string(&lzf_string(&raw)).unwrap(), raw);
  }

  #[test]
  fn compressed_string_resumes_anywhere() {
    let raw: Vec<u8> = b"abcabcabcabcabcabcabcabcabcabcabcabcabcabc".to_vec();
    let bytes = lzf_string(&raw);
    let mut reader = StringReader::new();
    assert_eq!(bytewise(&bytes, |cur| reader.poll(cur, LIMIT)).unwrap(), raw);
  }

  #[test]
  fn compressed_length_mismatch_fails() {
    let raw = vec![b'z'; 100];
    let mut bytes = lzf_string(&raw);
    // Claim one more decompressed byte than there are.
    bytes[4] += 1;
    assert!(matches!(
      read_string(&bytes),
      Err(DecodeError::DecompressionFailure(_))
    ));
  }

  #[test]
  fn length_over_limit_fails_before_reading() {
    let mut reader = StringReader::new();
    let mut cur = ChunkCursor::new(&[0x80, 0x00, 0x01, 0x00, 0x00]);
    assert!(matches!(
      reader.poll(&mut cur, 1024),
      Err(DecodeError::LengthLimitExceeded {
        length: 65536,
        limit: 1024
      })
    ));
  }

  #[test]
  fn reader_resets_after_done() {
    let mut reader = StringReader::new();
    let mut cur = ChunkCursor::new(b"\x01a\x02bc");
    assert_eq!(reader.poll(&mut cur, LIMIT).unwrap(), Progress::Done(b"a".to_vec()));
    assert_eq!(reader.poll(&mut cur, LIMIT).unwrap(), Progress::Done(b"bc".to_vec()));
  }

  #[test]
  fn double_sentinels_and_text() {
    let mut reader = DoubleReader::default();
    let mut cur = ChunkCursor::new(&[253, 254, 255, 2, b'1', b'3']);
    assert_eq!(reader.poll(&mut cur), Progress::Done(b"NaN".to_vec()));
    assert_eq!(reader.poll(&mut cur), Progress::Done(b"+inf".to_vec()));
    assert_eq!(reader.poll(&mut cur), Progress::Done(b"-inf".to_vec()));
    assert_eq!(reader.poll(&mut cur), Progress::Done(b"13".to_vec()));
    assert_eq!(reader.poll(&mut cur), Progress::NeedMore);
  }

  #[test]
  fn general_list() {
    let value = read_value(RecordType::List, b"\x02\x03yup\x03aha").unwrap();
    assert_eq!(value, Value::List(vec![b"yup".to_vec(), b"aha".to_vec()]));
  }

  #[test]
  fn empty_set() {
    let value = read_value(RecordType::Set, b"\x00").unwrap();
    assert_eq!(value, Value::Set(Vec::new()));
  }

  #[test]
  fn general_hash_reads_twice_the_count() {
    let value = read_value(RecordType::Hash, b"\x01\x01f\xC0\x05").unwrap();
    assert_eq!(value, Value::Hash(vec![HashField::new("f", "5")]));
  }

  #[test]
  fn general_sorted_set() {
    let value = read_value(RecordType::SortedSet, b"\x02\x01a\x011\x01c\x0213").unwrap();
    assert_eq!(
      value,
      Value::SortedSet(vec![ScoredMember::new("a", "1"), ScoredMember::new("c", "13")])
    );
  }

  #[test]
  fn sorted_set_with_infinite_score() {
    let value = read_value(RecordType::SortedSet, b"\x01\x01m\xFE").unwrap();
    assert_eq!(value, Value::SortedSet(vec![ScoredMember::new("m", "+inf")]));
  }

  #[test]
  fn compact_value_decodes_after_collection() {
    let mut payload = Vec::new();
    payload.extend_from_slice(&2u32.to_le_bytes());
    payload.extend_from_slice(&2u32.to_le_bytes());
    payload.extend_from_slice(&1i16.to_le_bytes());
    payload.extend_from_slice(&2i16.to_le_bytes());
    let mut bytes = vec![u8::try_from(payload.len()).unwrap()];
    bytes.extend_from_slice(&payload);

    let value = read_value(RecordType::SetIntset, &bytes).unwrap();
    assert_eq!(value, Value::Set(vec![b"1".to_vec(), b"2".to_vec()]));
  }

  #[test]
  fn markers_have_no_value_reader() {
    assert!(ValueReader::for_record(RecordType::Eof).is_none());
    assert!(ValueReader::for_record(RecordType::SelectDb).is_none());
    assert!(ValueReader::for_record(RecordType::Unknown(7)).is_none());
  }

  #[test]
  fn compact_records_collect_one_string() {
    for record in [
      RecordType::HashZipmap,
      RecordType::ListZiplist,
      RecordType::SetIntset,
      RecordType::SortedSetZiplist,
    ] {
      assert!(matches!(
        ValueReader::for_record(record),
        Some(ValueReader::Compact { record: r, .. }) if r == record
      ));
    }
    assert!(matches!(
      ValueReader::for_record(RecordType::List),
      Some(ValueReader::List(_))
    ));
  }

  #[test]
  fn sorted_set_with_binary_score_is_lossy() {
    // One member "m" with a two-byte score that is not UTF-8.
    let bytes = [0x01, 0x01, b'm', 0x02, 0xC3, 0x28];
    let value = read_value(RecordType::SortedSet, &bytes).unwrap();
    assert_eq!(
      value,
      Value::SortedSet(vec![ScoredMember::new("m", "\u{FFFD}(")])
    );
  }
}
