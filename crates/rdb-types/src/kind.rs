/// The five logical kinds an entity can have.
///
/// The kind is what a consumer sees; it says nothing about which wire
/// encoding carried the value. A ziplist-encoded list and a general list
/// both decode to [`EntityKind::List`].
///
/// ```text
/// ┌──────┬───────────┐
/// │ Wire │ Variant   │
/// ├──────┼───────────┤
/// │ 0    │ String    │
/// │ 1    │ List      │
/// │ 2    │ Set       │
/// │ 3    │ SortedSet │
/// │ 4    │ Hash      │
/// └──────┴───────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
  String,
  List,
  Set,
  SortedSet,
  Hash,
}

impl EntityKind {
  /// All kinds in wire-id order.
  pub const ALL: [Self; 5] = [Self::String, Self::List, Self::Set, Self::SortedSet, Self::Hash];

  /// The canonical (general-encoding) wire id of this kind.
  #[must_use]
  pub fn wire_id(self) -> u8 {
    match self {
      Self::String => 0,
      Self::List => 1,
      Self::Set => 2,
      Self::SortedSet => 3,
      Self::Hash => 4,
    }
  }

  /// Lower-case name used in diagnostics and CLI output.
  #[must_use]
  pub fn name(self) -> &'static str {
    match self {
      Self::String => "string",
      Self::List => "list",
      Self::Set => "set",
      Self::SortedSet => "zset",
      Self::Hash => "hash",
    }
  }
}

impl std::fmt::Display for EntityKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.name())
  }
}
