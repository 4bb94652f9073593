/// Implementation of `rdb dump`.
///
/// Writes one JSON object per entity to stdout, in stream order, as each
/// entity is decoded:
///
/// ```text
/// {"key":"k1","kind":"string","value":"ssssssss"}
/// {"key":"z1","kind":"zset","value":[{"member":"a","score":"1"},{"member":"c","score":"13"}]}
/// {"key":"h1","kind":"hash","value":{"name":"Tuxedo"}}
/// ```
///
/// Byte strings that are not UTF-8 are rendered lossily.
use std::borrow::Cow;
use std::io::{self, Write};

use anyhow::{Context, Result};
use rdb_types::{Entity, Value};
use serde::Serialize;
use serde_json::json;

use crate::DumpArgs;
use crate::render::{decode_file_strict, text};

#[derive(Serialize)]
struct Record<'a> {
    key: Cow<'a, str>,
    kind: &'static str,
    value: serde_json::Value,
}

/// Run the `rdb dump` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read, fails to decode, or stdout
/// cannot be written.
pub fn run(args: &DumpArgs) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut write_error = None;

    decode_file_strict(&args.file, args.chunk_size, |entity| {
        if write_error.is_some() {
            return;
        }
        if let Err(e) = write_line(&mut out, &entity) {
            write_error = Some(e);
        }
    })?;

    if let Some(e) = write_error {
        return Err(e).context("cannot write to stdout");
    }
    out.flush().context("cannot write to stdout")
}

fn write_line(out: &mut impl Write, entity: &Entity) -> Result<()> {
    let record = Record {
        key: text(&entity.key),
        kind: entity.kind().name(),
        value: value_json(&entity.value),
    };
    serde_json::to_writer(&mut *out, &record)?;
    out.write_all(b"\n")?;
    Ok(())
}

fn value_json(value: &Value) -> serde_json::Value {
    match value {
        Value::String(s) => json!(text(s)),
        Value::List(items) | Value::Set(items) => {
            items.iter().map(|i| json!(text(i))).collect()
        }
        Value::SortedSet(members) => members
            .iter()
            .map(|m| json!({ "member": text(&m.member), "score": m.score }))
            .collect(),
        Value::Hash(fields) => {
            let map: serde_json::Map<String, serde_json::Value> = fields
                .iter()
                .map(|f| (text(&f.field).into_owned(), json!(text(&f.value))))
                .collect();
            serde_json::Value::Object(map)
        }
    }
}

#[cfg(test)]
mod tests {
    use rdb_types::ScoredMember;

    use super::*;

    #[test]
    fn writes_one_json_line() {
        let entity = Entity::new(
            "z1",
            Value::SortedSet(vec![ScoredMember::new("a", "1"), ScoredMember::new("c", "13")]),
        );
        let mut buf = Vec::new();
        write_line(&mut buf, &entity).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "{\"key\":\"z1\",\"kind\":\"zset\",\"value\":[{\"member\":\"a\",\"score\":\"1\"},{\"member\":\"c\",\"score\":\"13\"}]}\n"
        );
    }

    #[test]
    fn hash_becomes_object() {
        let value = Value::Hash(vec![rdb_types::HashField::new("name", "Tuxedo")]);
        assert_eq!(value_json(&value), json!({ "name": "Tuxedo" }));
    }
}
