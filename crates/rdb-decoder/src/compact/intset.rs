use rdb_wire::tags::intset::{ENC_INT16, ENC_INT32, ENC_INT64};

use super::payload_reader::PayloadReader;
use crate::error::DecodeError;

/// Decode an intset into its members as decimal text.
///
/// ```text
/// ┌──────────┬─────────┬──────────────────────────────┐
/// │ encoding │ length  │ length × encoding bytes      │
/// │ u32 LE   │ u32 LE  │ signed little-endian ints    │
/// └──────────┴─────────┴──────────────────────────────┘
/// ```
///
/// `encoding` is the element width in bytes: 2, 4 or 8.
pub(crate) fn decode(payload: &[u8]) -> Result<Vec<Vec<u8>>, DecodeError> {
    let mut reader = PayloadReader::new(payload, "intset");
    let encoding = reader.u32_le()?;
    let length = reader.u32_le()?;

    let width: usize = match encoding {
        ENC_INT16 => 2,
        ENC_INT32 => 4,
        ENC_INT64 => 8,
        other => {
            return Err(DecodeError::UnsupportedEncoding {
                context: reader.context(),
                encoding: other,
            });
        }
    };

    let length = usize::try_from(length)
        .map_err(|_| DecodeError::malformed(reader.context(), format!("length {length}")))?;
    if length.saturating_mul(width) > reader.remaining() {
        return Err(DecodeError::malformed(
            reader.context(),
            format!(
                "{length} elements of {width} bytes, only {} bytes left",
                reader.remaining()
            ),
        ));
    }

    let mut items = Vec::with_capacity(length);
    for _ in 0..length {
        let text = match encoding {
            ENC_INT16 => reader.i16_le()?.to_string(),
            ENC_INT32 => reader.i32_le()?.to_string(),
            _ => reader.i64_le()?.to_string(),
        };
        items.push(text.into_bytes());
    }

    Ok(items)
}
