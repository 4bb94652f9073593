#![warn(clippy::pedantic)]

pub mod entity;
pub mod error;
pub mod kind;
pub mod record_type;

pub use entity::{Entity, HashField, ScoredMember, Value};
pub use error::TypeError;
pub use kind::EntityKind;
pub use record_type::RecordType;
