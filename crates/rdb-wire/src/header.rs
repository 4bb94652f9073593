use crate::error::WireError;

/// The only header this decoder accepts: ASCII "REDIS" followed by the
/// four-digit format version "0002".
///
/// Compared as raw bytes, never parsed as a number.
pub const RDB_MAGIC: [u8; 9] = *b"REDIS0002";

/// Total header size in bytes (fixed).
pub const HEADER_SIZE: usize = 9;

/// Validate a complete 9-byte header.
///
/// ```text
/// ┌────────┬─────────┬──────────────────────────┐
/// │ Offset │ Size    │ Description              │
/// ├────────┼─────────┼──────────────────────────┤
/// │ 0x00   │ 5 bytes │ Magic: "REDIS"           │
/// │ 0x05   │ 4 bytes │ Version: "0002" (ASCII)  │
/// └────────┴─────────┴──────────────────────────┘
/// ```
///
/// # Errors
///
/// Returns [`WireError::InvalidMagic`] if `buf` is not exactly
/// [`RDB_MAGIC`]. A short buffer is reported the same way: the header
/// reader only calls this once all nine bytes have arrived.
pub fn validate_header(buf: &[u8]) -> Result<(), WireError> {
    if buf == RDB_MAGIC {
        Ok(())
    } else {
        Err(WireError::InvalidMagic {
            found: buf.escape_ascii().to_string(),
        })
    }
}
