#![warn(clippy::pedantic)]

pub mod cursor;
pub mod error;
pub mod header;
pub mod length;
pub mod primitive;
pub mod tags;

pub use cursor::ChunkCursor;
pub use error::WireError;
pub use length::{LengthMarker, LengthReader};
pub use primitive::{FixedBytes, Progress};
