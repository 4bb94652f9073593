use rdb_wire::tags::ziplist::{
    END, HEADER_SIZE, INT_16, INT_32, INT_64, PREVLEN_WIDE, PREVLEN_WIDE_SIZE, STR_6BIT,
    STR_14BIT, STR_32BIT,
};

use super::payload_reader::PayloadReader;
use crate::error::DecodeError;

/// Decode a ziplist into its flat element sequence.
///
/// ```text
/// ┌─────────┬────────┬───────┬─────────┬─────────┬─────┬──────┐
/// │ zlbytes │ zltail │ zllen │ entry 0 │ entry 1 │ ... │ 0xFF │
/// │ 4 bytes │ 4      │ 2     │         │         │     │      │
/// └─────────┴────────┴───────┴─────────┴─────────┴─────┴──────┘
///
/// entry: prevlen (1 byte, or 4 when the first is 0xFE) + header + data
///
///   header top bits  00 → string, len = low 6 bits
///                    01 → string, len = (low 6 bits << 8) | next byte
///                    10 → string, len = next 4 bytes (little-endian)
///                    11 → integer, bits 4-5: 00 i16, 01 i32, 10 i64
/// ```
///
/// The three header fields are skipped, not checked: the element count
/// comes from walking to the end marker. Integer entries are returned as
/// decimal text.
pub(crate) fn decode(payload: &[u8]) -> Result<Vec<Vec<u8>>, DecodeError> {
    let mut reader = PayloadReader::new(payload, "ziplist");
    reader.skip(HEADER_SIZE)?;

    let mut items = Vec::new();
    loop {
        let first = reader.peek_u8()?;
        if first == END {
            break;
        }
        if first == PREVLEN_WIDE {
            reader.skip(PREVLEN_WIDE_SIZE)?;
        } else {
            reader.skip(1)?;
        }

        let header = reader.u8()?;
        let item = match header >> 6 {
            STR_6BIT => reader.bytes(usize::from(header & 0x3F))?.to_vec(),
            STR_14BIT => {
                let low = reader.u8()?;
                let len = (usize::from(header & 0x3F) << 8) | usize::from(low);
                reader.bytes(len)?.to_vec()
            }
            STR_32BIT => {
                let len = reader.u32_le()?;
                let len = usize::try_from(len).map_err(|_| {
                    DecodeError::malformed(reader.context(), format!("entry length {len}"))
                })?;
                reader.bytes(len)?.to_vec()
            }
            _ => read_int(&mut reader, header)?,
        };
        items.push(item);
    }

    Ok(items)
}

fn read_int(reader: &mut PayloadReader<'_>, header: u8) -> Result<Vec<u8>, DecodeError> {
    let text = match (header >> 4) & 0b11 {
        INT_16 => reader.i16_le()?.to_string(),
        INT_32 => reader.i32_le()?.to_string(),
        INT_64 => reader.i64_le()?.to_string(),
        _ => {
            return Err(DecodeError::UnsupportedEncoding {
                context: reader.context(),
                encoding: u32::from(header),
            });
        }
    };
    Ok(text.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Assemble a ziplist from pre-encoded entries (prevlen + header + data).
    fn ziplist(entries: &[Vec<u8>]) -> Vec<u8> {
        let mut body: Vec<u8> = entries.concat();
        body.push(END);
        let mut out = Vec::new();
        out.extend_from_slice(&u32::try_from(HEADER_SIZE + body.len()).unwrap().to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&u16::try_from(entries.len()).unwrap().to_le_bytes());
        out.extend_from_slice(&body);
        out
    }

    fn str_entry(s: &[u8]) -> Vec<u8> {
        let mut e = vec![0x00, u8::try_from(s.len()).unwrap()];
        e.extend_from_slice(s);
        e
    }

    #[test]
    fn empty_ziplist() {
        assert_eq!(decode(&ziplist(&[])).unwrap(), Vec::<Vec<u8>>::new());
    }

    #[test]
    fn six_bit_strings() {
        let payload = ziplist(&[str_entry(b"yup"), str_entry(b"aha")]);
        assert_eq!(decode(&payload).unwrap(), vec![b"yup".to_vec(), b"aha".to_vec()]);
    }

    #[test]
    fn fourteen_bit_string() {
        let long = vec![b'x'; 300];
        let mut entry = vec![0x00, 0x40 | 0x01, 0x2C];
        entry.extend_from_slice(&long);
        assert_eq!(decode(&ziplist(&[entry])).unwrap(), vec![long]);
    }

    #[test]
    fn thirty_two_bit_string() {
        let mut entry = vec![0x00, 0x80];
        entry.extend_from_slice(&3u32.to_le_bytes());
        entry.extend_from_slice(b"abc");
        assert_eq!(decode(&ziplist(&[entry])).unwrap(), vec![b"abc".to_vec()]);
    }

    #[test]
    fn integer_entries_become_text() {
        let mut i16_entry = vec![0x00, 0xC0];
        i16_entry.extend_from_slice(&(-6i16).to_le_bytes());
        let mut i32_entry = vec![0x00, 0xD0];
        i32_entry.extend_from_slice(&100_001i32.to_le_bytes());
        let mut i64_entry = vec![0x00, 0xE0];
        i64_entry.extend_from_slice(&9_999_999_999i64.to_le_bytes());

        let items = decode(&ziplist(&[i16_entry, i32_entry, i64_entry])).unwrap();
        assert_eq!(
            items,
            vec![b"-6".to_vec(), b"100001".to_vec(), b"9999999999".to_vec()]
        );
    }

    #[test]
    fn wide_prevlen_is_skipped() {
        let mut entry = vec![PREVLEN_WIDE, 0x00, 0x01, 0x00];
        entry.extend_from_slice(&[0x01, b'z']);
        assert_eq!(decode(&ziplist(&[entry])).unwrap(), vec![b"z".to_vec()]);
    }

    #[test]
    fn reserved_integer_width_is_unsupported() {
        let payload = ziplist(&[vec![0x00, 0xF0, 0x01, 0x02, 0x03]]);
        assert!(matches!(
            decode(&payload),
            Err(DecodeError::UnsupportedEncoding { context: "ziplist", encoding: 0xF0 })
        ));
    }

    #[test]
    fn missing_end_marker_is_malformed() {
        let mut payload = ziplist(&[str_entry(b"a")]);
        payload.pop();
        assert!(matches!(decode(&payload), Err(DecodeError::MalformedPayload { .. })));
    }

    #[test]
    fn truncated_entry_is_malformed() {
        let mut payload = ziplist(&[]);
        payload.pop();
        payload.extend_from_slice(&[0x00, 0x05, b'a']);
        assert!(matches!(decode(&payload), Err(DecodeError::MalformedPayload { .. })));
    }

    #[test]
    fn short_header_is_malformed() {
        assert!(matches!(
            decode(&[0x00, 0x01]),
            Err(DecodeError::MalformedPayload { context: "ziplist", .. })
        ));
    }
}
