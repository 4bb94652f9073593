/// Default cap on any single declared length: 512 MiB, the largest bulk
/// string the server itself accepts.
pub const DEFAULT_MAX_STRING_LEN: usize = 512 * 1024 * 1024;

/// Default read size for the reader adapters.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Configuration for an [`RdbDecoder`](crate::RdbDecoder) and the reader
/// adapters built on it.
///
/// Override individual fields with struct update syntax:
///
/// ```rust
/// use rdb_decoder::DecoderConfig;
///
/// let config = DecoderConfig {
///     max_string_len: 1024,
///     ..DecoderConfig::default()
/// };
/// assert_eq!(config.chunk_size, rdb_decoder::config::DEFAULT_CHUNK_SIZE);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Upper bound on a declared string length, compressed or decompressed
    /// LZF length, or compact payload size. A larger declaration fails with
    /// `LengthLimitExceeded` before any buffer is allocated for it.
    pub max_string_len: usize,

    /// How many bytes the reader adapters request per read. Has no effect
    /// on `feed`, which always consumes whatever chunk it is given.
    pub chunk_size: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_string_len: DEFAULT_MAX_STRING_LEN,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}
