use rdb_wire::tags::zipmap::{BIGLEN, EMPTY, END};

use super::payload_reader::PayloadReader;
use crate::error::DecodeError;

/// Decode a zipmap into its flat `field, value, field, value, …` sequence.
///
/// ```text
/// ┌───────┬────────┬───────┬────────┬──────┬───────┬──────┬─────┬──────┐
/// │ zmlen │ len    │ field │ len    │ free │ value │ pad  │ ... │ 0xFF │
/// │ 1     │ 1 or 5 │       │ 1 or 5 │ 1    │       │ free │     │      │
/// └───────┴────────┴───────┴────────┴──────┴───────┴──────┴─────┴──────┘
/// ```
///
/// Entry length bytes: 253 means a 4-byte little-endian length follows,
/// 254 marks an entry that is free space only, 255 ends the map. Every
/// odd-indexed entry (the values) carries a one-byte count of trailing
/// padding, which is skipped.
pub(crate) fn decode(payload: &[u8]) -> Result<Vec<Vec<u8>>, DecodeError> {
    let mut reader = PayloadReader::new(payload, "zipmap");
    reader.skip(1)?;

    let mut items = Vec::new();
    let mut index = 0usize;
    loop {
        let len = match reader.u8()? {
            END => break,
            EMPTY => None,
            BIGLEN => {
                let len = reader.u32_le()?;
                Some(usize::try_from(len).map_err(|_| {
                    DecodeError::malformed(reader.context(), format!("entry length {len}"))
                })?)
            }
            n => Some(usize::from(n)),
        };

        let free = if index % 2 == 1 {
            usize::from(reader.u8()?)
        } else {
            0
        };

        if let Some(len) = len {
            items.push(reader.bytes(len)?.to_vec());
            reader.skip(free)?;
        }
        index += 1;
    }

    Ok(items)
}
