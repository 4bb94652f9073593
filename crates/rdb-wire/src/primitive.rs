use crate::cursor::ChunkCursor;

/// Largest buffer [`FixedBytes`] reserves up front.
///
/// A length prefix is untrusted until the bytes behind it actually arrive,
/// so the buffer grows with the data rather than with the declared size.
pub const PREALLOC_LIMIT: usize = 64 * 1024;

/// Outcome of polling a resumable reader against one chunk.
///
/// `NeedMore` is not an error: the reader has consumed everything the
/// chunk had to offer, kept its partial state, and must be polled again
/// once the next chunk arrives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Progress<T> {
    Done(T),
    NeedMore,
}

impl<T> Progress<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Progress<U> {
        match self {
            Self::Done(v) => Progress::Done(f(v)),
            Self::NeedMore => Progress::NeedMore,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }
}

/// Reads exactly `n` raw bytes, across as many chunks as it takes.
///
/// Each poll copies `min(remaining_in_chunk, still_needed)` bytes onto the
/// collected prefix. When nothing is still needed the concatenation is
/// handed back and the reader is spent.
///
/// ```text
///   FixedBytes(5)
///   chunk 1: [a b]       → NeedMore   (needed = 3, collected = "ab")
///   chunk 2: [c]         → NeedMore   (needed = 2, collected = "abc")
///   chunk 3: [d e f g]   → Done("abcde"), cursor left at 'f'
/// ```
///
/// A zero-length request completes on its first poll, even against an
/// exhausted chunk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedBytes {
    needed: usize,
    buf: Vec<u8>,
}

impl FixedBytes {
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            needed: len,
            buf: Vec::with_capacity(len.min(PREALLOC_LIMIT)),
        }
    }

    /// Bytes still missing before the read completes.
    #[must_use]
    pub fn needed(&self) -> usize {
        self.needed
    }

    /// Bytes collected so far.
    #[must_use]
    pub fn collected(&self) -> usize {
        self.buf.len()
    }

    pub fn poll(&mut self, cur: &mut ChunkCursor<'_>) -> Progress<Vec<u8>> {
        let part = cur.take(self.needed);
        self.buf.extend_from_slice(part);
        self.needed -= part.len();

        if self.needed == 0 {
            Progress::Done(std::mem::take(&mut self.buf))
        } else {
            Progress::NeedMore
        }
    }
}
