/// Errors raised while assembling typed values from decoded elements.
///
/// These are higher-level than the wire readers: the bytes were read
/// successfully, but they do not form a valid value of the expected shape.
///
/// ```text
/// ┌─────────────────────────────────────────────────────┐
/// │ TypeError (this crate)                              │
/// │   └── OddElementCount for unpaired hash/zset items  │
/// └─────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TypeError {
  /// A flat element sequence that should hold pairs had an odd length.
  #[error("{kind} payload has an odd number of elements ({count})")]
  OddElementCount { kind: &'static str, count: usize },
}
