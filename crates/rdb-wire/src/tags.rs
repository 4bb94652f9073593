//! Wire constants for the RDB `0002` record stream.

/// Record type bytes.
///
/// 0–4 are the general encodings of the five logical kinds, 9–12 their
/// compact variants. 254 and 255 are stream markers, not records.
pub mod record_type {
    pub const STRING: u8 = 0;
    pub const LIST: u8 = 1;
    pub const SET: u8 = 2;
    pub const ZSET: u8 = 3;
    pub const HASH: u8 = 4;
    pub const HASH_ZIPMAP: u8 = 9;
    pub const LIST_ZIPLIST: u8 = 10;
    pub const SET_INTSET: u8 = 11;
    pub const ZSET_ZIPLIST: u8 = 12;
    pub const SELECT_DB: u8 = 254;
    pub const EOF: u8 = 255;
}

/// Special string encodings, carried in the low 6 bits of a
/// [`LengthMarker::Special`](crate::LengthMarker::Special).
pub mod encoding {
    pub const INT8: u8 = 0;
    pub const INT16: u8 = 1;
    pub const INT32: u8 = 2;
    pub const LZF: u8 = 3;
}

/// Length byte values with a fixed meaning in the double encoding.
pub mod double {
    pub const NAN: u8 = 253;
    pub const POS_INF: u8 = 254;
    pub const NEG_INF: u8 = 255;
}

/// Intset element widths, in bytes.
pub mod intset {
    pub const ENC_INT16: u32 = 2;
    pub const ENC_INT32: u32 = 4;
    pub const ENC_INT64: u32 = 8;
}

/// Ziplist framing bytes and entry headers.
pub mod ziplist {
    /// `zlbytes` (4) + `zltail` (4) + `zllen` (2).
    pub const HEADER_SIZE: usize = 10;
    pub const END: u8 = 255;
    /// A previous-entry length starting with this byte is the wide form.
    pub const PREVLEN_WIDE: u8 = 254;
    /// Width in bytes of the wide previous-entry length field.
    pub const PREVLEN_WIDE_SIZE: usize = 4;

    /// Entry shape, selected by the top two bits of the header byte.
    pub const STR_6BIT: u8 = 0b00;
    pub const STR_14BIT: u8 = 0b01;
    pub const STR_32BIT: u8 = 0b10;
    pub const INT: u8 = 0b11;

    /// Integer width, selected by bits 4–5 of an integer header byte.
    pub const INT_16: u8 = 0b00;
    pub const INT_32: u8 = 0b01;
    pub const INT_64: u8 = 0b10;
}

/// Zipmap framing bytes.
pub mod zipmap {
    pub const BIGLEN: u8 = 253;
    pub const EMPTY: u8 = 254;
    pub const END: u8 = 255;
}
