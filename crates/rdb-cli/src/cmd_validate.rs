/// Implementation of `rdb validate`.
///
/// Streams the whole snapshot through the decoder and reports either a
/// series of success checkmarks (`✓`) or a diagnostic failure line (`✗`).
/// Exits with code 0 on a valid file and code 1 on any error.
///
/// # Success output
///
/// ```text
/// ✓ Header: REDIS0002
/// ✓ Records: 12 entities decoded
/// ✓ End: end-of-stream marker present, no trailing data
/// ```
///
/// # Failure output
///
/// ```text
/// ✗ Error [unknown type] after 3 entities: unknown type 7 for key "k9"
/// ```
use anyhow::{Result, anyhow};
use rdb_decoder::config::DEFAULT_CHUNK_SIZE;
use rdb_decoder::{DecodeError, ErrorKind};

use crate::ValidateArgs;
use crate::render::decode_file;

/// Run the `rdb validate` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails any structural
/// check.
pub fn run(args: &ValidateArgs) -> Result<()> {
    let (stats, error) = decode_file(&args.file, DEFAULT_CHUNK_SIZE, |_| {})?;

    match error {
        None => {
            println!("✓ Header: REDIS0002");
            println!(
                "✓ Records: {} entit{} decoded",
                stats.entities,
                if stats.entities == 1 { "y" } else { "ies" }
            );
            println!("✓ End: end-of-stream marker present, no trailing data");
            Ok(())
        }
        Some(err) => {
            println!(
                "✗ Error [{}] after {} entities: {err}",
                kind_label(&err),
                stats.entities
            );
            Err(anyhow!("validation failed"))
        }
    }
}

// ── Error formatting ──────────────────────────────────────────────────────────

fn kind_label(err: &DecodeError) -> &'static str {
    match err.kind() {
        ErrorKind::UnsupportedFormat => "unsupported format",
        ErrorKind::UnknownType => "unknown type",
        ErrorKind::UnknownEncoding => "unknown encoding",
        ErrorKind::UnsupportedEncoding => "unsupported encoding",
        ErrorKind::DecompressionFailure => "decompression failure",
        ErrorKind::MalformedPayload => "malformed payload",
        ErrorKind::LimitExceeded => "limit exceeded",
        ErrorKind::UnexpectedEnd => "unexpected end",
        ErrorKind::TrailingData => "trailing data",
        ErrorKind::Io => "i/o",
    }
}
