// LZF decompression wrapper.
//
// Compressed strings carry both lengths up front, so the output size is
// known before decompression starts and a mismatch is a hard failure.

use crate::error::DecodeError;

/// Decompress `data` into exactly `expected_len` bytes.
///
/// # Errors
///
/// Returns [`DecodeError::DecompressionFailure`] if the payload is not
/// valid LZF or does not expand to exactly `expected_len` bytes.
pub(crate) fn decompress(data: &[u8], expected_len: usize) -> Result<Vec<u8>, DecodeError> {
    if expected_len == 0 {
        return if data.is_empty() {
            Ok(Vec::new())
        } else {
            Err(DecodeError::DecompressionFailure(format!(
                "{} compressed bytes for an empty string",
                data.len()
            )))
        };
    }

    let out = lzf::decompress(data, expected_len)
        .map_err(|e| DecodeError::DecompressionFailure(format!("{e:?}")))?;

    if out.len() != expected_len {
        return Err(DecodeError::DecompressionFailure(format!(
            "expected {expected_len} bytes, got {}",
            out.len()
        )));
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_through_lzf() {
        let original = b"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".to_vec();
        let compressed = lzf::compress(&original).unwrap();
        assert_eq!(decompress(&compressed, original.len()).unwrap(), original);
    }

    #[test]
    fn short_declared_length_fails() {
        let original = vec![b'x'; 64];
        let compressed = lzf::compress(&original).unwrap();
        assert!(matches!(
            decompress(&compressed, 10),
            Err(DecodeError::DecompressionFailure(_))
        ));
    }

    #[test]
    fn truncated_payload_fails() {
        let original = vec![b'y'; 64];
        let compressed = lzf::compress(&original).unwrap();
        let truncated = &compressed[..compressed.len() - 1];
        assert!(matches!(
            decompress(truncated, original.len()),
            Err(DecodeError::DecompressionFailure(_))
        ));
    }

    #[test]
    fn empty_string() {
        assert_eq!(decompress(&[], 0).unwrap(), Vec::<u8>::new());
        assert!(decompress(&[0x00], 0).is_err());
    }
}
