/// Implementation of `rdb inspect`.
///
/// Streams the snapshot and prints one line per entity: its index, kind,
/// key and element count. `--show-values` appends a one-line preview.
///
/// # Output format
///
/// ```text
/// 0: string k1 (8 bytes)
/// 1: list l1 (2 elements)  ["yup", "aha"]
/// 2: zset z1 (2 elements)
/// ---
/// 3 entities, 88 bytes, end marker present
/// ```
use anyhow::Result;
use rdb_decoder::config::DEFAULT_CHUNK_SIZE;
use rdb_types::{Entity, Value};

use crate::InspectArgs;
use crate::render::{decode_file_strict, preview, text, truncate};

/// Run the `rdb inspect` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails to decode. Entities
/// decoded before the failure are still printed.
pub fn run(args: &InspectArgs) -> Result<()> {
    let mut index = 0usize;
    let stats = decode_file_strict(&args.file, DEFAULT_CHUNK_SIZE, |entity| {
        if args.limit.is_none_or(|limit| index < limit) {
            println!("{}", entity_line(index, &entity, args.show_values));
        }
        index += 1;
    })?;

    println!("---");
    println!(
        "{} entit{}, {} bytes, end marker {}",
        stats.entities,
        if stats.entities == 1 { "y" } else { "ies" },
        stats.bytes,
        if stats.ended { "present" } else { "missing" }
    );
    Ok(())
}

// ── Formatting helpers ────────────────────────────────────────────────────────

fn entity_line(index: usize, entity: &Entity, show_values: bool) -> String {
    let size = match &entity.value {
        Value::String(s) => format!("{} bytes", s.len()),
        other => {
            let n = other.len();
            format!("{n} element{}", if n == 1 { "" } else { "s" })
        }
    };
    let mut line = format!(
        "{index}: {} {} ({size})",
        entity.kind(),
        text(&entity.key)
    );
    if show_values {
        line.push_str("  ");
        line.push_str(&truncate(&preview(&entity.value), 80));
    }
    line
}
