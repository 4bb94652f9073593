//! Decoders for the compact structures packed inside a single string.
//!
//! These run synchronously once the whole string has been collected by the
//! resumable string reader, so none of them needs to suspend.

mod intset;
mod payload_reader;
mod ziplist;
mod zipmap;

use rdb_types::{RecordType, Value};

use crate::error::DecodeError;

/// Decode the payload of a compact record into its canonical value.
///
/// # Errors
///
/// - [`DecodeError::MalformedPayload`] for truncated or inconsistent
///   payloads, and for record types that are not compact.
/// - [`DecodeError::UnsupportedEncoding`] for integer widths the ziplist
///   or intset layout does not define.
/// - [`DecodeError::Type`] when a hash or sorted set cannot be paired.
pub(crate) fn decode_compact(record: RecordType, payload: &[u8]) -> Result<Value, DecodeError> {
    let value = match record {
        RecordType::HashZipmap => Value::hash_from_flat(zipmap::decode(payload)?)?,
        RecordType::ListZiplist => Value::List(ziplist::decode(payload)?),
        RecordType::SetIntset => Value::Set(intset::decode(payload)?),
        RecordType::SortedSetZiplist => Value::sorted_set_from_flat(ziplist::decode(payload)?)?,
        other => {
            return Err(DecodeError::malformed(
                "compact",
                format!("record type {} is not compact", other.wire_id()),
            ));
        }
    };
    Ok(value)
}
