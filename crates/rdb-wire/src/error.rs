/// Errors raised by the byte-level readers in this crate.
///
/// `Exhausted` is the only variant the resumable readers ever produce and
/// it never reaches a caller of the decoder: it means "this chunk has no
/// more bytes, suspend and wait for the next one". The state machine in
/// `rdb-decoder` turns it into a suspension, not a failure.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WireError {
    /// The current chunk has no bytes left at the cursor.
    #[error("chunk exhausted at offset {offset}")]
    Exhausted { offset: usize },

    /// The 9-byte file header did not match `REDIS0002`.
    #[error("invalid header: expected \"REDIS0002\", got {found:?}")]
    InvalidMagic { found: String },
}

// `found` is rendered with escape_ascii() at construction so the message
// stays printable even when the input is binary garbage.
