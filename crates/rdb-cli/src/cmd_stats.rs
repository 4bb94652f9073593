/// Implementation of `rdb stats`.
///
/// # Example output
///
/// ```text
/// File:      dump.rdb  (1024 bytes)
/// Entities:  6 total
/// Databases: 0, 3
///
/// Kind        Count
/// ─────────────────
/// string          2
/// list            1
/// set             1
/// zset            1
/// hash            1
/// ─────────────────
/// Total           6
/// ```
use anyhow::Result;
use rdb_decoder::config::DEFAULT_CHUNK_SIZE;

use crate::StatsArgs;
use crate::render::decode_file_strict;

/// Run the `rdb stats` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails to decode.
pub fn run(args: &StatsArgs) -> Result<()> {
    let stats = decode_file_strict(&args.file, DEFAULT_CHUNK_SIZE, |_| {})?;

    let databases = if stats.databases.is_empty() {
        "none selected".to_string()
    } else {
        stats
            .databases
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };

    println!("File:      {}  ({} bytes)", args.file.display(), stats.bytes);
    println!("Entities:  {} total", stats.entities);
    println!("Databases: {databases}");
    println!();

    let sep = "─".repeat(17);
    println!("{:<10}{:>7}", "Kind", "Count");
    println!("{sep}");
    for (kind, count) in stats.by_kind() {
        println!("{:<10}{count:>7}", kind.name());
    }
    println!("{sep}");
    println!("{:<10}{:>7}", "Total", stats.entities);

    Ok(())
}
