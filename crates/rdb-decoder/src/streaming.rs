use std::collections::VecDeque;

use rdb_types::Entity;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::config::DecoderConfig;
use crate::decoder::RdbDecoder;
use crate::error::DecodeError;
use crate::sink::EntitySink;
use crate::stats::DecodeStats;

/// Sink that parks decoded entities until the stream hands them out.
#[derive(Debug, Default)]
struct Queue {
  items: VecDeque<Result<Entity, DecodeError>>,
  ended: bool,
}

impl EntitySink for Queue {
  fn on_entity(&mut self, entity: Entity) {
    self.items.push_back(Ok(entity));
  }

  fn on_error(&mut self, error: DecodeError) {
    self.items.push_back(Err(error));
  }

  fn on_end(&mut self) {
    self.ended = true;
  }
}

/// Asynchronous streaming decoder: yields entities one at a time from
/// any `AsyncRead` source.
///
/// Backpressure is natural: the next chunk is only read when the caller
/// awaits an entity and none is already decoded. A chunk that completes
/// several entities queues them, and they are handed out before anything
/// more is read.
///
/// ```text
///   next() ──queue non-empty──► pop
///     │
///     └──queue empty──► read chunk ──► feed ──► (loop)
///                           │
///                           └──0 bytes──► finish ──► (loop, then None)
/// ```
///
/// # Example
///
/// ```rust,no_run
/// use rdb_decoder::StreamingDecoder;
/// use tokio::io::AsyncRead;
///
/// async fn count_keys(reader: impl AsyncRead + Unpin) -> usize {
///     let mut stream = StreamingDecoder::new(reader);
///     let mut n = 0;
///     while let Some(entity) = stream.next().await {
///         if entity.is_ok() {
///             n += 1;
///         }
///     }
///     n
/// }
/// ```
pub struct StreamingDecoder<R> {
  reader: R,
  decoder: RdbDecoder<Queue>,
  buf: Vec<u8>,
  exhausted: bool,
}

impl<R: AsyncRead + Unpin> StreamingDecoder<R> {
  #[must_use]
  pub fn new(reader: R) -> Self {
    Self::with_config(reader, DecoderConfig::default())
  }

  #[must_use]
  pub fn with_config(reader: R, config: DecoderConfig) -> Self {
    let buf = vec![0u8; config.chunk_size.max(1)];
    Self {
      reader,
      decoder: RdbDecoder::with_config(Queue::default(), config),
      buf,
      exhausted: false,
    }
  }

  /// Read the next entity from the stream.
  ///
  /// Returns `Some(Ok(entity))` for each decoded entity, `Some(Err(_))`
  /// once if the stream fails, and `None` after the clean end or the
  /// error.
  pub async fn next(&mut self) -> Option<Result<Entity, DecodeError>> {
    loop {
      if let Some(item) = self.decoder.sink_mut().items.pop_front() {
        return Some(item);
      }
      if self.exhausted {
        return None;
      }

      match self.reader.read(&mut self.buf).await {
        Ok(0) => {
          self.exhausted = true;
          self.decoder.finish();
        }
        Ok(n) => self.decoder.feed(&self.buf[..n]),
        Err(e) => self.decoder.fail(DecodeError::Io(e)),
      }
      if self.decoder.is_failed() {
        self.exhausted = true;
      }
    }
  }

  /// Whether the stream ended cleanly at its end-of-stream marker.
  #[must_use]
  pub fn ended(&self) -> bool {
    self.decoder.sink().ended
  }

  #[must_use]
  pub fn stats(&self) -> &DecodeStats {
    self.decoder.stats()
  }

  /// Drain `reader` into a vector of entities.
  ///
  /// # Errors
  ///
  /// Returns the first error the stream produces.
  pub async fn decode(reader: R) -> Result<Vec<Entity>, DecodeError> {
    let mut stream = Self::new(reader);
    let mut entities = Vec::new();
    while let Some(item) = stream.next().await {
      entities.push(item?);
    }
    Ok(entities)
  }
}

#[cfg(test)]
mod tests {
  use rdb_types::Value;

  use super::*;

  const PAYLOAD: &[u8] = b"REDIS0002\x00\x02k1\x08ssssssss\x01\x02l1\x02\x01a\x01b\xff";

  #[tokio::test]
  async fn yields_entities_then_none() {
    let mut stream = StreamingDecoder::new(PAYLOAD);

    let first = stream.next().await.unwrap().unwrap();
    assert_eq!(first.key, b"k1");
    let second = stream.next().await.unwrap().unwrap();
    assert_eq!(second.value, Value::List(vec![b"a".to_vec(), b"b".to_vec()]));
    assert!(stream.next().await.is_none());
    assert!(stream.ended());
    assert_eq!(stream.stats().entities, 2);
  }

  #[tokio::test]
  async fn tiny_reads_match_whole() {
    let config = DecoderConfig {
      chunk_size: 1,
      ..DecoderConfig::default()
    };
    let mut stream = StreamingDecoder::with_config(PAYLOAD, config);
    let mut keys = Vec::new();
    while let Some(entity) = stream.next().await {
      keys.push(entity.unwrap().key);
    }
    assert_eq!(keys, vec![b"k1".to_vec(), b"l1".to_vec()]);
  }

  #[tokio::test]
  async fn truncated_stream_reports_once() {
    let mut stream = StreamingDecoder::new(&PAYLOAD[..25]);
    assert!(stream.next().await.unwrap().is_ok());
    assert!(matches!(
      stream.next().await,
      Some(Err(DecodeError::UnexpectedEnd))
    ));
    assert!(stream.next().await.is_none());
    assert!(!stream.ended());
  }

  #[tokio::test]
  async fn decode_collects() {
    let entities = StreamingDecoder::decode(PAYLOAD).await.unwrap();
    assert_eq!(entities.len(), 2);
  }
}
