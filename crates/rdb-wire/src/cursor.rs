use crate::error::WireError;

/// A read cursor over one incoming chunk.
///
/// The decoder never sees the whole stream at once. Each call to
/// `feed` hands it one borrowed chunk, wrapped in a `ChunkCursor` for the
/// duration of that call. Every reader in this crate consumes bytes through
/// the cursor, so the offset is the single source of truth for how far into
/// the chunk the state machine has got.
///
/// ```text
///   chunk:  [ 0x00 0x02 'k' '1' 0x08 's' 's' ... ]
///                     ^
///                     pos (everything left of it is consumed)
/// ```
#[derive(Clone, Debug)]
pub struct ChunkCursor<'a> {
    chunk: &'a [u8],
    pos: usize,
}

impl<'a> ChunkCursor<'a> {
    /// Wrap a chunk with the cursor at offset 0.
    #[must_use]
    pub fn new(chunk: &'a [u8]) -> Self {
        Self { chunk, pos: 0 }
    }

    /// Number of unread bytes left in the chunk.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.chunk.len() - self.pos
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Current offset into the chunk.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Read one byte and advance.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::Exhausted`] when the chunk has no bytes left.
    pub fn read_u8(&mut self) -> Result<u8, WireError> {
        let byte = *self
            .chunk
            .get(self.pos)
            .ok_or(WireError::Exhausted { offset: self.pos })?;
        self.pos += 1;
        Ok(byte)
    }

    /// Take up to `n` bytes from the cursor and advance past them.
    ///
    /// Returns fewer than `n` bytes (possibly none) when the chunk ends
    /// first; the cursor never moves past the physical end of the chunk.
    pub fn take(&mut self, n: usize) -> &'a [u8] {
        let end = self.pos + n.min(self.remaining());
        let slice = &self.chunk[self.pos..end];
        self.pos = end;
        slice
    }

    /// The unread tail of the chunk, without advancing.
    #[must_use]
    pub fn rest(&self) -> &'a [u8] {
        &self.chunk[self.pos..]
    }
}
