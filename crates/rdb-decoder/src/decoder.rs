use std::mem;

use rdb_types::{Entity, RecordType};
use rdb_wire::header::{HEADER_SIZE, validate_header};
use rdb_wire::{ChunkCursor, FixedBytes, LengthReader, Progress};
use tracing::{debug, trace};

use crate::config::DecoderConfig;
use crate::error::DecodeError;
use crate::sink::{DecoderEvent, EntitySink, EventCollector};
use crate::stats::DecodeStats;
use crate::value::{StringReader, ValueReader};

/// Where the decoder is in the stream.
///
/// ```text
///   Header ──► Type ──254──► SelectDb ──► Type
///                │
///                ├──255──► Eof ──finish()──► Finished
///                │
///                └──other──► Key ──► Value ──emit──► Type
///
///   any state ──error──► Failed
/// ```
///
/// `Key` and `Value` carry the in-flight reader, so a chunk may end
/// anywhere inside a record.
#[derive(Debug)]
enum State {
    Header(FixedBytes),
    Type,
    SelectDb(LengthReader),
    Key {
        record: RecordType,
        key: StringReader,
    },
    Value {
        key: Vec<u8>,
        value: ValueReader,
    },
    Eof,
    Finished,
    Failed,
}

/// Incremental, chunk-resumable RDB decoder.
///
/// Bytes arrive through [`feed`](Self::feed) in chunks of any size, split
/// at any offset. Each call advances the state machine as far as the chunk
/// allows, delivers every completed entity to the sink, and returns. When
/// the input is exhausted the caller calls [`finish`](Self::finish), which
/// either reports the clean end of the stream or an
/// [`UnexpectedEnd`](DecodeError::UnexpectedEnd).
///
/// The first error is fatal. It is delivered once through
/// [`EntitySink::on_error`], and from then on `feed` and `finish` do
/// nothing.
///
/// # Example
///
/// ```rust
/// use rdb_decoder::{EventCollector, RdbDecoder};
///
/// let stream = b"REDIS0002\x00\x02k1\x08ssssssss\xff";
///
/// let mut decoder = RdbDecoder::new(EventCollector::new());
/// for chunk in stream.chunks(3) {
///     decoder.feed(chunk);
/// }
/// decoder.finish();
///
/// let sink = decoder.into_sink();
/// let entity = sink.entities().next().unwrap();
/// assert_eq!(entity.key, b"k1");
/// assert!(sink.ended());
/// ```
pub struct RdbDecoder<S> {
    sink: S,
    config: DecoderConfig,
    state: State,
    stats: DecodeStats,
}

impl<S: EntitySink> RdbDecoder<S> {
    /// Create a decoder with the default configuration.
    pub fn new(sink: S) -> Self {
        Self::with_config(sink, DecoderConfig::default())
    }

    pub fn with_config(sink: S, config: DecoderConfig) -> Self {
        Self {
            sink,
            config,
            state: State::Header(FixedBytes::new(HEADER_SIZE)),
            stats: DecodeStats::default(),
        }
    }

    /// Consume one chunk.
    ///
    /// An empty chunk is accepted and changes nothing. Input after a fatal
    /// error, or after `finish`, is ignored.
    pub fn feed(&mut self, chunk: &[u8]) {
        if matches!(self.state, State::Failed | State::Finished) {
            return;
        }

        self.stats.chunks += 1;
        let mut cur = ChunkCursor::new(chunk);
        let result = self.step(&mut cur);
        self.stats.bytes += cur.position() as u64;

        if let Err(err) = result {
            self.fail(err);
        } else {
            trace!(offset = self.stats.bytes, "chunk consumed");
        }
    }

    /// Signal that no more input will arrive.
    ///
    /// Reports `on_end` if the end-of-stream marker was reached, and
    /// [`DecodeError::UnexpectedEnd`] otherwise. Calling it again, or after
    /// a fatal error, does nothing.
    pub fn finish(&mut self) {
        match self.state {
            State::Failed | State::Finished => {}
            State::Eof => {
                self.state = State::Finished;
                self.sink.on_end();
            }
            _ => self.fail(DecodeError::UnexpectedEnd),
        }
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// The sink and the final counters.
    pub fn into_parts(self) -> (S, DecodeStats) {
        (self.sink, self.stats)
    }

    #[must_use]
    pub fn stats(&self) -> &DecodeStats {
        &self.stats
    }

    #[must_use]
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// True once the end-of-stream marker has been read.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self.state, State::Eof | State::Finished)
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self.state, State::Failed)
    }

    /// Enter the failed state and report `err`. No-op if already failed.
    pub(crate) fn fail(&mut self, err: DecodeError) {
        if self.is_failed() {
            return;
        }
        debug!(offset = self.stats.bytes, error = %err, "decode failed");
        self.state = State::Failed;
        self.sink.on_error(err);
    }

    /// Run the state machine until the chunk is exhausted or the stream
    /// reaches a terminal state.
    fn step(&mut self, cur: &mut ChunkCursor<'_>) -> Result<(), DecodeError> {
        let limit = self.config.max_string_len;
        loop {
            match &mut self.state {
                State::Header(bytes) => {
                    let Progress::Done(header) = bytes.poll(cur) else {
                        return Ok(());
                    };
                    validate_header(&header).map_err(DecodeError::UnsupportedFormat)?;
                    debug!("header accepted");
                    self.state = State::Type;
                }
                State::Type => {
                    let Ok(byte) = cur.read_u8() else {
                        return Ok(());
                    };
                    self.state = match RecordType::from_wire_id(byte) {
                        RecordType::SelectDb => State::SelectDb(LengthReader::new()),
                        RecordType::Eof => {
                            let offset = self.stats.bytes + cur.position() as u64;
                            debug!(offset, "end of stream");
                            self.stats.ended = true;
                            State::Eof
                        }
                        record => {
                            trace!(type_id = byte, "record");
                            State::Key {
                                record,
                                key: StringReader::new(),
                            }
                        }
                    };
                }
                State::SelectDb(len) => {
                    let Progress::Done(marker) = len.poll(cur) else {
                        return Ok(());
                    };
                    let db = marker.value();
                    debug!(db, "select db");
                    self.stats.record_select(db);
                    self.state = State::Type;
                }
                State::Key { record, key } => {
                    let Progress::Done(key) = key.poll(cur, limit)? else {
                        return Ok(());
                    };
                    let record = *record;
                    let Some(value) = ValueReader::for_record(record) else {
                        return Err(DecodeError::UnknownType {
                            type_id: record.wire_id(),
                            key: key.escape_ascii().to_string(),
                        });
                    };
                    self.state = State::Value { key, value };
                }
                State::Value { key, value } => {
                    let Progress::Done(value) = value.poll(cur, limit)? else {
                        return Ok(());
                    };
                    let entity = Entity::new(mem::take(key), value);
                    self.state = State::Type;
                    self.stats.record_entity(entity.kind());
                    self.sink.on_entity(entity);
                }
                State::Eof => {
                    if cur.is_empty() {
                        return Ok(());
                    }
                    return Err(DecodeError::TrailingData {
                        extra_bytes: cur.remaining(),
                    });
                }
                State::Finished | State::Failed => return Ok(()),
            }
        }
    }
}

impl RdbDecoder<EventCollector> {
    /// Decode a complete in-memory payload.
    ///
    /// # Errors
    ///
    /// Returns the first [`DecodeError`] the stream produces, including
    /// [`DecodeError::UnexpectedEnd`] if the payload stops before the
    /// end-of-stream marker.
    pub fn decode(payload: &[u8]) -> Result<Vec<Entity>, DecodeError> {
        let mut decoder = RdbDecoder::new(EventCollector::new());
        decoder.feed(payload);
        decoder.finish();

        let mut entities = Vec::new();
        for event in decoder.into_sink().into_events() {
            match event {
                DecoderEvent::Entity(entity) => entities.push(entity),
                DecoderEvent::Error(err) => return Err(err),
                DecoderEvent::End => {}
            }
        }
        Ok(entities)
    }
}
