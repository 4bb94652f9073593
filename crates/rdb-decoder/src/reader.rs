use std::io::{ErrorKind, Read};

use crate::config::DecoderConfig;
use crate::decoder::RdbDecoder;
use crate::error::DecodeError;
use crate::sink::EntitySink;
use crate::stats::DecodeStats;

/// Decode everything `reader` yields, `config.chunk_size` bytes at a time.
///
/// Reads until end of input, then calls `finish`, so the sink sees the
/// same events it would for the same bytes passed to `feed` by hand. An
/// I/O error is reported through the sink as [`DecodeError::Io`] and ends
/// the decode. Reading stops early once the decoder has failed.
///
/// ```rust
/// use rdb_decoder::{decode_reader, DecoderConfig, EventCollector};
///
/// let input: &[u8] = b"REDIS0002\x00\x01a\x01b\xff";
/// let config = DecoderConfig { chunk_size: 2, ..DecoderConfig::default() };
/// let (sink, stats) = decode_reader(input, EventCollector::new(), config);
/// assert!(sink.ended());
/// assert_eq!(stats.entities, 1);
/// ```
pub fn decode_reader<R: Read, S: EntitySink>(
    mut reader: R,
    sink: S,
    config: DecoderConfig,
) -> (S, DecodeStats) {
    let mut buf = vec![0u8; config.chunk_size.max(1)];
    let mut decoder = RdbDecoder::with_config(sink, config);

    while !decoder.is_failed() {
        match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => decoder.feed(&buf[..n]),
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => decoder.fail(DecodeError::Io(e)),
        }
    }

    decoder.finish();
    decoder.into_parts()
}
