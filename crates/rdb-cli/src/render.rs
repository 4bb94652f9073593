//! Shared decoding and formatting helpers for the subcommands.

use std::borrow::Cow;
use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use rdb_decoder::{DecodeError, DecodeStats, DecoderConfig, FnSink, decode_reader};
use rdb_types::{Entity, Value};

/// Stream `path` through the decoder, handing each entity to `on_entity`.
///
/// Returns the decoder's counters and the terminal error, if any. Only a
/// failure to open the file is an `Err` here, so callers can decide how to
/// report decode failures.
pub fn decode_file<F: FnMut(Entity)>(
    path: &Path,
    chunk_size: usize,
    on_entity: F,
) -> Result<(DecodeStats, Option<DecodeError>)> {
    let file = File::open(path).with_context(|| format!("cannot read {}", path.display()))?;
    let config = DecoderConfig {
        chunk_size,
        ..DecoderConfig::default()
    };
    let (mut sink, stats) = decode_reader(file, FnSink::new(on_entity), config);
    Ok((stats, sink.take_error()))
}

/// Like [`decode_file`], but a decode failure is an error too.
pub fn decode_file_strict<F: FnMut(Entity)>(
    path: &Path,
    chunk_size: usize,
    on_entity: F,
) -> Result<DecodeStats> {
    let (stats, error) = decode_file(path, chunk_size, on_entity)?;
    match error {
        Some(err) => Err(err).with_context(|| format!("failed to decode {}", path.display())),
        None => Ok(stats),
    }
}

/// Bytes as text, lossy for anything that is not UTF-8.
pub fn text(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

/// One-line rendering of a value, for previews.
///
/// ```text
/// string  "ssssssss"
/// list    ["yup", "aha"]
/// zset    {"a": 1, "c": 13}
/// hash    {"name": "Tuxedo"}
/// ```
pub fn preview(value: &Value) -> String {
    match value {
        Value::String(s) => quoted(s),
        Value::List(items) | Value::Set(items) => {
            let parts: Vec<String> = items.iter().map(|i| quoted(i)).collect();
            format!("[{}]", parts.join(", "))
        }
        Value::SortedSet(members) => {
            let parts: Vec<String> = members
                .iter()
                .map(|m| format!("{}: {}", quoted(&m.member), m.score))
                .collect();
            format!("{{{}}}", parts.join(", "))
        }
        Value::Hash(fields) => {
            let parts: Vec<String> = fields
                .iter()
                .map(|f| format!("{}: {}", quoted(&f.field), quoted(&f.value)))
                .collect();
            format!("{{{}}}", parts.join(", "))
        }
    }
}

fn quoted(bytes: &[u8]) -> String {
    format!("{:?}", text(bytes))
}

/// Truncate `s` to `max` characters, marking the cut with an ellipsis.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let head: String = s.chars().take(max).collect();
    format!("{head}…")
}
