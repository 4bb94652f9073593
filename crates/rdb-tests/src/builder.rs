use rdb_wire::header::RDB_MAGIC;
use rdb_wire::tags::{intset, record_type};

use crate::encoding::{self, ZipEntry};

/// Errors from [`SnapshotBuilder::encode`].
#[derive(Clone, Debug, thiserror::Error)]
pub enum FixtureError {
    /// An LZF string was requested for input `lzf` refuses to compress.
    #[error("cannot lzf-compress {len} bytes: {reason}")]
    Incompressible { len: usize, reason: String },
}

/// Builder for snapshot byte streams.
///
/// Records are appended in call order behind the `REDIS0002` header, and
/// `encode` closes the stream with the end-of-stream marker unless
/// [`without_eof`](Self::without_eof) was called.
///
/// ```rust
/// use rdb_tests::SnapshotBuilder;
///
/// let bytes = SnapshotBuilder::new()
///     .select_db(0)
///     .string("k1", "ssssssss")
///     .list("l1", &["yup", "aha"])
///     .encode()
///     .unwrap();
/// assert!(bytes.starts_with(b"REDIS0002"));
/// assert_eq!(bytes.last(), Some(&0xFF));
/// ```
#[derive(Clone, Debug)]
pub struct SnapshotBuilder {
    header: Vec<u8>,
    body: Vec<u8>,
    eof: bool,
    error: Option<FixtureError>,
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            header: RDB_MAGIC.to_vec(),
            body: Vec::new(),
            eof: true,
            error: None,
        }
    }

    // ── Stream framing ──────────────────────────────────────────────────

    /// Replace the 9-byte header with arbitrary bytes.
    pub fn header(&mut self, bytes: &[u8]) -> &mut Self {
        self.header = bytes.to_vec();
        self
    }

    /// Leave off the end-of-stream marker.
    pub fn without_eof(&mut self) -> &mut Self {
        self.eof = false;
        self
    }

    /// Append bytes verbatim.
    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.body.extend_from_slice(bytes);
        self
    }

    pub fn select_db(&mut self, db: u32) -> &mut Self {
        self.body.push(record_type::SELECT_DB);
        self.body.extend(encoding::length(db));
        self
    }

    fn record(&mut self, type_id: u8, key: &[u8]) {
        self.body.push(type_id);
        self.body.extend(encoding::raw_string(key));
    }

    // ── Strings ─────────────────────────────────────────────────────────

    /// A string value stored as plain bytes.
    pub fn string(&mut self, key: impl AsRef<[u8]>, value: impl AsRef<[u8]>) -> &mut Self {
        self.record(record_type::STRING, key.as_ref());
        self.body.extend(encoding::raw_string(value.as_ref()));
        self
    }

    /// A string value stored as an int8/int16/int32, or as decimal text
    /// if it does not fit in 32 bits.
    pub fn int_string(&mut self, key: impl AsRef<[u8]>, value: i64) -> &mut Self {
        self.record(record_type::STRING, key.as_ref());
        let encoded = encoding::int_string(value)
            .unwrap_or_else(|| encoding::raw_string(value.to_string().as_bytes()));
        self.body.extend(encoded);
        self
    }

    /// A string value stored LZF-compressed.
    pub fn lzf_string(&mut self, key: impl AsRef<[u8]>, value: impl AsRef<[u8]>) -> &mut Self {
        let value = value.as_ref();
        match encoding::lzf_string(value) {
            Ok(encoded) => {
                self.record(record_type::STRING, key.as_ref());
                self.body.extend(encoded);
            }
            Err(reason) => {
                self.error.get_or_insert(FixtureError::Incompressible {
                    len: value.len(),
                    reason,
                });
            }
        }
        self
    }

    // ── General collections ─────────────────────────────────────────────

    fn counted(&mut self, count: usize) {
        self.body
            .extend(encoding::length(u32::try_from(count).unwrap_or(u32::MAX)));
    }

    pub fn list<T: AsRef<[u8]>>(&mut self, key: impl AsRef<[u8]>, items: &[T]) -> &mut Self {
        self.record(record_type::LIST, key.as_ref());
        self.counted(items.len());
        for item in items {
            self.body.extend(encoding::raw_string(item.as_ref()));
        }
        self
    }

    pub fn set<T: AsRef<[u8]>>(&mut self, key: impl AsRef<[u8]>, members: &[T]) -> &mut Self {
        self.record(record_type::SET, key.as_ref());
        self.counted(members.len());
        for member in members {
            self.body.extend(encoding::raw_string(member.as_ref()));
        }
        self
    }

    /// A general sorted set. Scores are written as text (or sentinels).
    pub fn sorted_set(&mut self, key: impl AsRef<[u8]>, members: &[(&str, &str)]) -> &mut Self {
        self.record(record_type::ZSET, key.as_ref());
        self.counted(members.len());
        for (member, score) in members {
            self.body.extend(encoding::raw_string(member.as_bytes()));
            self.body.extend(encoding::score(score));
        }
        self
    }

    pub fn hash(&mut self, key: impl AsRef<[u8]>, fields: &[(&str, &str)]) -> &mut Self {
        self.record(record_type::HASH, key.as_ref());
        self.counted(fields.len());
        for (field, value) in fields {
            self.body.extend(encoding::raw_string(field.as_bytes()));
            self.body.extend(encoding::raw_string(value.as_bytes()));
        }
        self
    }

    // ── Compact collections ─────────────────────────────────────────────

    pub fn ziplist_list(&mut self, key: impl AsRef<[u8]>, entries: &[ZipEntry]) -> &mut Self {
        self.record(record_type::LIST_ZIPLIST, key.as_ref());
        self.body.extend(encoding::raw_string(&encoding::ziplist(entries)));
        self
    }

    /// A sorted set packed in a ziplist as `member, score, …`.
    pub fn ziplist_sorted_set(
        &mut self,
        key: impl AsRef<[u8]>,
        entries: &[ZipEntry],
    ) -> &mut Self {
        self.record(record_type::ZSET_ZIPLIST, key.as_ref());
        self.body.extend(encoding::raw_string(&encoding::ziplist(entries)));
        self
    }

    pub fn zipmap_hash(&mut self, key: impl AsRef<[u8]>, fields: &[(&str, &str)]) -> &mut Self {
        let pairs: Vec<(&[u8], &[u8])> = fields
            .iter()
            .map(|(f, v)| (f.as_bytes(), v.as_bytes()))
            .collect();
        self.record(record_type::HASH_ZIPMAP, key.as_ref());
        self.body.extend(encoding::raw_string(&encoding::zipmap(&pairs, 1)));
        self
    }

    /// An intset in the narrowest width that holds every member.
    pub fn intset(&mut self, key: impl AsRef<[u8]>, members: &[i64]) -> &mut Self {
        let width = if members.iter().all(|v| i16::try_from(*v).is_ok()) {
            intset::ENC_INT16
        } else if members.iter().all(|v| i32::try_from(*v).is_ok()) {
            intset::ENC_INT32
        } else {
            intset::ENC_INT64
        };
        self.record(record_type::SET_INTSET, key.as_ref());
        self.body.extend(encoding::raw_string(&encoding::intset(width, members)));
        self
    }

    /// A compact record of any type with a caller-supplied payload.
    pub fn compact_raw(&mut self, type_id: u8, key: impl AsRef<[u8]>, payload: &[u8]) -> &mut Self {
        self.record(type_id, key.as_ref());
        self.body.extend(encoding::raw_string(payload));
        self
    }

    // ── Output ──────────────────────────────────────────────────────────

    /// Assemble the stream.
    ///
    /// # Errors
    ///
    /// Returns the first [`FixtureError`] recorded while building.
    pub fn encode(&self) -> Result<Vec<u8>, FixtureError> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        let mut out = Vec::with_capacity(self.header.len() + self.body.len() + 1);
        out.extend_from_slice(&self.header);
        out.extend_from_slice(&self.body);
        if self.eof {
            out.push(record_type::EOF);
        }
        Ok(out)
    }
}
