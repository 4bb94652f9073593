//! Fixture assembly for the RDB decoder test suite and benchmarks.
//!
//! [`SnapshotBuilder`] writes well-formed snapshots record by record, in
//! any of the wire encodings the decoder understands. The free functions
//! in [`encoding`] produce the individual pieces, so tests can splice
//! together malformed streams by hand. [`fixtures`] holds the shared
//! reference snapshot.

pub mod builder;
pub mod encoding;
pub mod fixtures;

pub use builder::{FixtureError, SnapshotBuilder};
pub use encoding::ZipEntry;
