use rdb_wire::tags::record_type;

use crate::kind::EntityKind;

/// Record type identifiers, as they appear on the wire.
///
/// Each value record starts with one type byte that selects both the
/// logical kind and the concrete wire encoding of the value that follows
/// the key. Two further bytes are stream markers rather than records.
/// Unknown values are captured by `Unknown(u8)` so the decoder can report
/// the offending byte.
///
/// ```text
/// ┌──────┬──────────────────┬──────────────────────────────────┐
/// │ Wire │ Variant          │ Description                      │
/// ├──────┼──────────────────┼──────────────────────────────────┤
/// │ 0    │ String           │ One string                       │
/// │ 1    │ List             │ Count + strings                  │
/// │ 2    │ Set              │ Count + strings                  │
/// │ 3    │ SortedSet        │ Count + (string, double) pairs   │
/// │ 4    │ Hash             │ Count + (string, string) pairs   │
/// │ 9    │ HashZipmap       │ Hash packed in a zipmap string   │
/// │ 10   │ ListZiplist      │ List packed in a ziplist string  │
/// │ 11   │ SetIntset        │ Set packed in an intset string   │
/// │ 12   │ SortedSetZiplist │ Sorted set packed in a ziplist   │
/// │ 254  │ SelectDb         │ Database index follows           │
/// │ 255  │ Eof              │ End of stream                    │
/// └──────┴──────────────────┴──────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordType {
    String,
    List,
    Set,
    SortedSet,
    Hash,
    HashZipmap,
    ListZiplist,
    SetIntset,
    SortedSetZiplist,
    SelectDb,
    Eof,
    Unknown(u8),
}

impl RecordType {
    /// Return the single-byte wire ID for this record type.
    pub fn wire_id(self) -> u8 {
        match self {
            Self::String => record_type::STRING,
            Self::List => record_type::LIST,
            Self::Set => record_type::SET,
            Self::SortedSet => record_type::ZSET,
            Self::Hash => record_type::HASH,
            Self::HashZipmap => record_type::HASH_ZIPMAP,
            Self::ListZiplist => record_type::LIST_ZIPLIST,
            Self::SetIntset => record_type::SET_INTSET,
            Self::SortedSetZiplist => record_type::ZSET_ZIPLIST,
            Self::SelectDb => record_type::SELECT_DB,
            Self::Eof => record_type::EOF,
            Self::Unknown(id) => id,
        }
    }

    /// Parse a wire byte into a [`RecordType`].
    pub fn from_wire_id(id: u8) -> Self {
        match id {
            record_type::STRING => Self::String,
            record_type::LIST => Self::List,
            record_type::SET => Self::Set,
            record_type::ZSET => Self::SortedSet,
            record_type::HASH => Self::Hash,
            record_type::HASH_ZIPMAP => Self::HashZipmap,
            record_type::LIST_ZIPLIST => Self::ListZiplist,
            record_type::SET_INTSET => Self::SetIntset,
            record_type::ZSET_ZIPLIST => Self::SortedSetZiplist,
            record_type::SELECT_DB => Self::SelectDb,
            record_type::EOF => Self::Eof,
            other => Self::Unknown(other),
        }
    }

    /// The logical kind a value record of this type decodes to.
    ///
    /// `None` for the stream markers and for unknown bytes.
    pub fn kind(self) -> Option<EntityKind> {
        match self {
            Self::String => Some(EntityKind::String),
            Self::List | Self::ListZiplist => Some(EntityKind::List),
            Self::Set | Self::SetIntset => Some(EntityKind::Set),
            Self::SortedSet | Self::SortedSetZiplist => Some(EntityKind::SortedSet),
            Self::Hash | Self::HashZipmap => Some(EntityKind::Hash),
            Self::SelectDb | Self::Eof | Self::Unknown(_) => None,
        }
    }

    /// True for the types whose value is a compact structure packed inside
    /// a single string.
    pub fn is_compact(self) -> bool {
        matches!(
            self,
            Self::HashZipmap | Self::ListZiplist | Self::SetIntset | Self::SortedSetZiplist
        )
    }
}
