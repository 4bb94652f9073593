use crate::error::DecodeError;

/// Bounds-checked reader over a fully materialized compact payload.
///
/// Ziplists, zipmaps and intsets arrive packed inside a single string.
/// By the time one is decoded the whole string is in memory, so there is
/// nothing to resume: every read either succeeds or the payload is
/// malformed. `PayloadReader` wraps the slice with a cursor and turns
/// every out-of-bounds read into [`DecodeError::MalformedPayload`] tagged
/// with the structure being decoded.
///
/// This is an internal implementation detail of the decoder.
///
/// # Usage pattern
///
/// ```text
///   let mut reader = PayloadReader::new(payload, "intset");
///   let encoding = reader.u32_le()?;
///   let count = reader.u32_le()?;
///   for _ in 0..count {
///       let value = reader.i16_le()?;
///   }
/// ```
pub(crate) struct PayloadReader<'a> {
  buf: &'a [u8],
  pos: usize,
  context: &'static str,
}

impl<'a> PayloadReader<'a> {
  pub(crate) fn new(buf: &'a [u8], context: &'static str) -> Self {
    Self {
      buf,
      pos: 0,
      context,
    }
  }

  pub(crate) fn context(&self) -> &'static str {
    self.context
  }

  /// Take the next `n` bytes.
  pub(crate) fn bytes(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
    let end = self
      .pos
      .checked_add(n)
      .filter(|&end| end <= self.buf.len())
      .ok_or_else(|| {
        DecodeError::malformed(
          self.context,
          format!(
            "needed {n} bytes at offset {}, only {} left",
            self.pos,
            self.remaining()
          ),
        )
      })?;
    let slice = &self.buf[self.pos..end];
    self.pos = end;
    Ok(slice)
  }

  pub(crate) fn skip(&mut self, n: usize) -> Result<(), DecodeError> {
    self.bytes(n).map(|_| ())
  }

  pub(crate) fn u8(&mut self) -> Result<u8, DecodeError> {
    Ok(self.bytes(1)?[0])
  }

  /// Look at the next byte without consuming it.
  pub(crate) fn peek_u8(&self) -> Result<u8, DecodeError> {
    self.buf.get(self.pos).copied().ok_or_else(|| {
      DecodeError::malformed(
        self.context,
        format!("missing end marker at offset {}", self.pos),
      )
    })
  }

  pub(crate) fn u32_le(&mut self) -> Result<u32, DecodeError> {
    Ok(u32::from_le_bytes(self.array()?))
  }

  pub(crate) fn i16_le(&mut self) -> Result<i16, DecodeError> {
    Ok(i16::from_le_bytes(self.array()?))
  }

  pub(crate) fn i32_le(&mut self) -> Result<i32, DecodeError> {
    Ok(i32::from_le_bytes(self.array()?))
  }

  pub(crate) fn i64_le(&mut self) -> Result<i64, DecodeError> {
    Ok(i64::from_le_bytes(self.array()?))
  }

  fn array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
    let bytes = self.bytes(N)?;
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    Ok(out)
  }

  pub(crate) fn remaining(&self) -> usize {
    self.buf.len() - self.pos
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_buffer_fails_every_read() {
    let mut reader = PayloadReader::new(&[], "test");
    assert!(reader.u8().is_err());
    assert!(reader.peek_u8().is_err());
    assert!(reader.bytes(0).is_ok());
  }

  #[test]
  fn reads_little_endian_integers() {
    let mut buf = Vec::new();
    buf.extend_from_slice(&7u32.to_le_bytes());
    buf.extend_from_slice(&(-2i16).to_le_bytes());
    buf.extend_from_slice(&(-70_000i32).to_le_bytes());
    buf.extend_from_slice(&i64::MIN.to_le_bytes());

    let mut reader = PayloadReader::new(&buf, "test");
    assert_eq!(reader.u32_le().unwrap(), 7);
    assert_eq!(reader.i16_le().unwrap(), -2);
    assert_eq!(reader.i32_le().unwrap(), -70_000);
    assert_eq!(reader.i64_le().unwrap(), i64::MIN);
    assert_eq!(reader.remaining(), 0);
  }

  #[test]
  fn overrun_reports_context() {
    let mut reader = PayloadReader::new(&[1, 2], "ziplist");
    let err = reader.bytes(3).unwrap_err();
    assert_eq!(
      err.to_string(),
      "malformed ziplist payload: needed 3 bytes at offset 0, only 2 left"
    );
    // A failed read does not move the cursor.
    assert_eq!(reader.remaining(), 2);
  }

  #[test]
  fn huge_length_does_not_overflow() {
    let mut reader = PayloadReader::new(&[1, 2], "zipmap");
    reader.u8().unwrap();
    assert!(reader.bytes(usize::MAX).is_err());
  }

  #[test]
  fn peek_does_not_advance() {
    let reader = PayloadReader::new(&[0xFF], "test");
    assert_eq!(reader.peek_u8().unwrap(), 0xFF);
    assert_eq!(reader.remaining(), 1);
  }
}
