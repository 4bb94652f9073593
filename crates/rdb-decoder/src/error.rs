use rdb_types::error::TypeError;
use rdb_wire::WireError;

/// Errors that can end an RDB decode.
///
/// Every variant is fatal: once the decoder reports one it enters a
/// permanent failed state and ignores all further input. The wire-level
/// "chunk exhausted" signal never appears here; running out of bytes
/// mid-record is a suspension, and only becomes [`UnexpectedEnd`] when
/// the caller calls `finish()` before the end-of-stream marker.
///
/// Error hierarchy:
///
/// ```text
///   DecodeError
///   ├── UnsupportedFormat      ← header is not "REDIS0002"
///   ├── UnknownType            ← record type byte not recognised
///   ├── UnknownEncoding        ← special string sub-code not 0–3
///   ├── UnsupportedEncoding    ← ziplist/intset integer width not handled
///   ├── DecompressionFailure   ← LZF payload corrupt or wrong length
///   ├── MalformedPayload       ← compact payload truncated or inconsistent
///   ├── LengthLimitExceeded    ← declared length above the configured cap
///   ├── UnexpectedEnd          ← finish() before the end-of-stream marker
///   ├── TrailingData           ← bytes after the end-of-stream marker
///   ├── Type(TypeError)        ← from rdb-types value assembly
///   └── Io(std::io::Error)     ← from the reader adapters
/// ```
///
/// [`UnexpectedEnd`]: DecodeError::UnexpectedEnd
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The 9-byte file header failed validation.
    #[error("unsupported rdb format: {0}")]
    UnsupportedFormat(WireError),

    /// A value record used a type byte this decoder does not know.
    ///
    /// Raised once the key has been read, when the value is dispatched.
    #[error("unknown type {type_id} for key {key:?}")]
    UnknownType { type_id: u8, key: String },

    /// A special-encoded string used a sub-code other than
    /// int8 / int16 / int32 / LZF.
    #[error("unknown string encoding {encoding}")]
    UnknownEncoding { encoding: u8 },

    /// An integer width inside a compact structure is not handled.
    #[error("unsupported {context} encoding {encoding:#04X}")]
    UnsupportedEncoding { context: &'static str, encoding: u32 },

    /// The LZF payload could not be decompressed to the declared length.
    #[error("lzf decompression failed: {0}")]
    DecompressionFailure(String),

    /// A compact payload ended early or contained an impossible field.
    #[error("malformed {context} payload: {detail}")]
    MalformedPayload {
        context: &'static str,
        detail: String,
    },

    /// A declared length exceeds `DecoderConfig::max_string_len`.
    #[error("declared length {length} exceeds limit {limit}")]
    LengthLimitExceeded { length: u64, limit: usize },

    /// `finish()` was called before the end-of-stream marker.
    #[error("unexpected end of stream")]
    UnexpectedEnd,

    /// Bytes arrived after the end-of-stream marker.
    #[error("data past end of stream ({extra_bytes} bytes)")]
    TrailingData { extra_bytes: usize },

    /// A value failed typed assembly (odd pair count, bad score text).
    #[error(transparent)]
    Type(#[from] TypeError),

    /// An I/O error from the underlying reader (reader adapters only).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Coarse classification of a [`DecodeError`].
///
/// Sinks and callers that only care about the category of failure can
/// match on this instead of the full error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnsupportedFormat,
    UnknownType,
    UnknownEncoding,
    UnsupportedEncoding,
    DecompressionFailure,
    MalformedPayload,
    LimitExceeded,
    UnexpectedEnd,
    TrailingData,
    Io,
}

impl DecodeError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            Self::UnknownType { .. } => ErrorKind::UnknownType,
            Self::UnknownEncoding { .. } => ErrorKind::UnknownEncoding,
            Self::UnsupportedEncoding { .. } => ErrorKind::UnsupportedEncoding,
            Self::DecompressionFailure(_) => ErrorKind::DecompressionFailure,
            Self::MalformedPayload { .. } | Self::Type(_) => ErrorKind::MalformedPayload,
            Self::LengthLimitExceeded { .. } => ErrorKind::LimitExceeded,
            Self::UnexpectedEnd => ErrorKind::UnexpectedEnd,
            Self::TrailingData { .. } => ErrorKind::TrailingData,
            Self::Io(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn malformed(context: &'static str, detail: impl Into<String>) -> Self {
        Self::MalformedPayload {
            context,
            detail: detail.into(),
        }
    }
}
