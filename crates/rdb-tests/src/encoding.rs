//! Byte-level encoders for every piece of the snapshot format.
//!
//! These are the inverse of the decoder's readers, written independently
//! of it. Each returns a fresh `Vec<u8>`.

use rdb_wire::tags::{double, encoding, intset, ziplist, zipmap};

/// Encode a length marker, picking the narrowest class.
///
/// ```text
///   n < 64        → 00nnnnnn
///   n < 16384     → 01nnnnnn nnnnnnnn
///   otherwise     → 10000000 + 4 bytes, high byte first
/// ```
#[must_use]
pub fn length(n: u32) -> Vec<u8> {
    match n {
        0..64 => vec![n as u8],
        64..16384 => vec![0x40 | (n >> 8) as u8, (n & 0xFF) as u8],
        _ => {
            let mut out = vec![0x80];
            out.extend_from_slice(&n.to_be_bytes());
            out
        }
    }
}

/// A length marker carrying a special-encoding sub-code.
#[must_use]
pub fn special(code: u8) -> u8 {
    0xC0 | (code & 0x3F)
}

fn len_u32(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

/// A plain length-prefixed string.
#[must_use]
pub fn raw_string(bytes: &[u8]) -> Vec<u8> {
    let mut out = length(len_u32(bytes.len()));
    out.extend_from_slice(bytes);
    out
}

/// An integer-encoded string in the narrowest of int8 / int16 / int32.
///
/// Returns `None` when `value` needs more than 32 bits; such values can
/// only be stored as raw text.
#[must_use]
pub fn int_string(value: i64) -> Option<Vec<u8>> {
    if let Ok(v) = i8::try_from(value) {
        Some(vec![special(encoding::INT8), v.to_le_bytes()[0]])
    } else if let Ok(v) = i16::try_from(value) {
        let mut out = vec![special(encoding::INT16)];
        out.extend_from_slice(&v.to_le_bytes());
        Some(out)
    } else if let Ok(v) = i32::try_from(value) {
        let mut out = vec![special(encoding::INT32)];
        out.extend_from_slice(&v.to_le_bytes());
        Some(out)
    } else {
        None
    }
}

/// An LZF-compressed string: compressed length, raw length, payload.
///
/// # Errors
///
/// Returns the `lzf` error text when `raw` does not compress (very short
/// or incompressible input).
pub fn lzf_string(raw: &[u8]) -> Result<Vec<u8>, String> {
    let packed = lzf::compress(raw).map_err(|e| format!("{e:?}"))?;
    let mut out = vec![special(encoding::LZF)];
    out.extend(length(len_u32(packed.len())));
    out.extend(length(len_u32(raw.len())));
    out.extend_from_slice(&packed);
    Ok(out)
}

/// A sorted-set score: one length byte and ASCII text, or a sentinel for
/// `"NaN"`, `"+inf"` and `"-inf"`.
#[must_use]
pub fn score(text: &str) -> Vec<u8> {
    match text {
        "NaN" => vec![double::NAN],
        "+inf" => vec![double::POS_INF],
        "-inf" => vec![double::NEG_INF],
        _ => {
            let mut out = vec![u8::try_from(text.len()).unwrap_or(u8::MAX)];
            out.extend_from_slice(text.as_bytes());
            out
        }
    }
}

/// One ziplist element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ZipEntry {
    Str(Vec<u8>),
    Int(i64),
}

impl ZipEntry {
    pub fn str(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Str(bytes.into())
    }

    /// The text the decoder is expected to produce for this element.
    #[must_use]
    pub fn decoded(&self) -> Vec<u8> {
        match self {
            Self::Str(s) => s.clone(),
            Self::Int(v) => v.to_string().into_bytes(),
        }
    }
}

fn ziplist_entry(entry: &ZipEntry) -> Vec<u8> {
    match entry {
        ZipEntry::Str(s) => {
            let len = s.len();
            let mut out = if len < 64 {
                vec![len as u8]
            } else if len < 16384 {
                vec![0x40 | (len >> 8) as u8, (len & 0xFF) as u8]
            } else {
                let mut header = vec![ziplist::STR_32BIT << 6];
                header.extend_from_slice(&len_u32(len).to_le_bytes());
                header
            };
            out.extend_from_slice(s);
            out
        }
        ZipEntry::Int(v) => {
            if let Ok(v) = i16::try_from(*v) {
                let mut out = vec![0xC0 | (ziplist::INT_16 << 4)];
                out.extend_from_slice(&v.to_le_bytes());
                out
            } else if let Ok(v) = i32::try_from(*v) {
                let mut out = vec![0xC0 | (ziplist::INT_32 << 4)];
                out.extend_from_slice(&v.to_le_bytes());
                out
            } else {
                let mut out = vec![0xC0 | (ziplist::INT_64 << 4)];
                out.extend_from_slice(&v.to_le_bytes());
                out
            }
        }
    }
}

/// A complete ziplist payload (not yet wrapped as a string).
///
/// The previous-entry length uses one byte below 254 and the 4-byte wide
/// form (254 followed by three length bytes) otherwise.
#[must_use]
pub fn ziplist(entries: &[ZipEntry]) -> Vec<u8> {
    let mut body = Vec::new();
    let mut prev_len = 0usize;
    for entry in entries {
        let encoded = ziplist_entry(entry);
        let start = body.len();
        if prev_len < usize::from(ziplist::PREVLEN_WIDE) {
            body.push(prev_len as u8);
        } else {
            body.push(ziplist::PREVLEN_WIDE);
            body.extend_from_slice(&len_u32(prev_len).to_le_bytes()[..ziplist::PREVLEN_WIDE_SIZE - 1]);
        }
        body.extend_from_slice(&encoded);
        prev_len = body.len() - start;
    }
    body.push(ziplist::END);

    let total = ziplist::HEADER_SIZE + body.len();
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(&len_u32(total).to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&u16::try_from(entries.len()).unwrap_or(u16::MAX).to_le_bytes());
    out.extend_from_slice(&body);
    out
}

fn zipmap_len(out: &mut Vec<u8>, len: usize) {
    if len < usize::from(zipmap::BIGLEN) {
        out.push(len as u8);
    } else {
        out.push(zipmap::BIGLEN);
        out.extend_from_slice(&len_u32(len).to_le_bytes());
    }
}

/// A complete zipmap payload. Each value gets `free` bytes of trailing
/// padding.
#[must_use]
pub fn zipmap(pairs: &[(&[u8], &[u8])], free: u8) -> Vec<u8> {
    let mut out = vec![u8::try_from(pairs.len()).unwrap_or(zipmap::EMPTY)];
    for (field, value) in pairs {
        zipmap_len(&mut out, field.len());
        out.extend_from_slice(field);
        zipmap_len(&mut out, value.len());
        out.push(free);
        out.extend_from_slice(value);
        out.extend(std::iter::repeat_n(0u8, usize::from(free)));
    }
    out.push(zipmap::END);
    out
}

/// A complete intset payload with elements `width` bytes wide (2, 4 or 8).
#[must_use]
pub fn intset(width: u32, values: &[i64]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&len_u32(values.len()).to_le_bytes());
    for v in values {
        let bytes = v.to_le_bytes();
        let n = match width {
            intset::ENC_INT16 => 2,
            intset::ENC_INT32 => 4,
            _ => 8,
        };
        out.extend_from_slice(&bytes[..n]);
    }
    out
}
