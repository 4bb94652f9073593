use crate::cursor::ChunkCursor;
use crate::primitive::Progress;

/// Length class stored in the top two bits of a marker byte.
pub const LEN_6BIT: u8 = 0;
pub const LEN_14BIT: u8 = 1;
pub const LEN_32BIT: u8 = 2;
/// The low 6 bits are a special-encoding sub-code, not a length.
pub const LEN_ENCVAL: u8 = 3;

/// A decoded length/encoding marker.
///
/// ```text
/// ┌──────────┬──────────────┬────────────────────────────────────────┐
/// │ Top bits │ Extra bytes  │ Meaning                                │
/// ├──────────┼──────────────┼────────────────────────────────────────┤
/// │ 00       │ 0            │ Len(low 6 bits)                        │
/// │ 01       │ 1            │ Len((low 6 bits << 8) | next)          │
/// │ 10       │ 4            │ Len(next 4 bytes, high byte first)     │
/// │ 11       │ 0            │ Special(low 6 bits)                    │
/// └──────────┴──────────────┴────────────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LengthMarker {
    /// A plain non-negative length or count.
    Len(u64),
    /// A special-encoding sub-code (see [`crate::tags::encoding`]).
    Special(u8),
}

impl LengthMarker {
    /// The numeric payload of the marker, ignoring whether it is special.
    ///
    /// Counts and database indices are read with this: a special marker in
    /// a position where only a length makes sense is taken at face value.
    #[must_use]
    pub fn value(self) -> u64 {
        match self {
            Self::Len(n) => n,
            Self::Special(code) => u64::from(code),
        }
    }

    #[must_use]
    pub fn is_special(self) -> bool {
        matches!(self, Self::Special(_))
    }
}

/// Resumable reader for one length/encoding marker.
///
/// The marker byte and each of its extra bytes are consumed one at a time,
/// so a chunk boundary may fall anywhere inside the marker. The 32-bit
/// class ignores the low 6 bits of its first byte and builds the length
/// from the four bytes that follow, shifting the accumulator left by 8 for
/// every byte (big-endian).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LengthReader {
    #[default]
    Marker,
    Extra { remaining: u8, acc: u64 },
}

impl LengthReader {
    #[must_use]
    pub fn new() -> Self {
        Self::Marker
    }

    /// Advance the reader. On `Done` the reader is reset and can be reused.
    pub fn poll(&mut self, cur: &mut ChunkCursor<'_>) -> Progress<LengthMarker> {
        loop {
            match *self {
                Self::Marker => {
                    let Ok(first) = cur.read_u8() else {
                        return Progress::NeedMore;
                    };
                    let low = first & 0x3F;
                    match first >> 6 {
                        LEN_6BIT => return Progress::Done(LengthMarker::Len(u64::from(low))),
                        LEN_14BIT => {
                            *self = Self::Extra {
                                remaining: 1,
                                acc: u64::from(low),
                            };
                        }
                        LEN_32BIT => *self = Self::Extra { remaining: 4, acc: 0 },
                        _ => return Progress::Done(LengthMarker::Special(low)),
                    }
                }
                Self::Extra { remaining, acc } => {
                    let Ok(byte) = cur.read_u8() else {
                        return Progress::NeedMore;
                    };
                    let acc = (acc << 8) | u64::from(byte);
                    if remaining == 1 {
                        *self = Self::Marker;
                        return Progress::Done(LengthMarker::Len(acc));
                    }
                    *self = Self::Extra {
                        remaining: remaining - 1,
                        acc,
                    };
                }
            }
        }
    }
}
