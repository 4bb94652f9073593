#![warn(clippy::pedantic)]

pub mod config;
pub mod decoder;
pub mod error;
pub mod reader;
pub mod sink;
pub mod stats;
pub mod streaming;

mod compact;
mod decompression;
mod value;

pub use config::DecoderConfig;
pub use decoder::RdbDecoder;
pub use error::{DecodeError, ErrorKind};
pub use reader::decode_reader;
pub use sink::{DecoderEvent, EntitySink, EventCollector, FnSink};
pub use stats::DecodeStats;
pub use streaming::StreamingDecoder;
