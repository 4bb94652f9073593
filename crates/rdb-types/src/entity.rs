use crate::error::TypeError;
use crate::kind::EntityKind;

/// One fully decoded record: a key and its typed value.
///
/// This is what the decoder hands to its sink. Every byte is owned, so an
/// entity outlives the chunk it was decoded from. The kind is derived from
/// the value and cannot disagree with it.
///
/// ```text
/// ┌──────────────────────────────────────────────┐
/// │ Entity                                       │
/// │   key:   Vec<u8>  ← raw key bytes            │
/// │   value: Value    ← kind + decoded content   │
/// └──────────────────────────────────────────────┘
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entity {
  pub key: Vec<u8>,
  pub value: Value,
}

impl Entity {
  pub fn new(key: impl Into<Vec<u8>>, value: Value) -> Self {
    Self {
      key: key.into(),
      value,
    }
  }

  #[must_use]
  pub fn kind(&self) -> EntityKind {
    self.value.kind()
  }
}

/// The decoded content of an entity.
///
/// Elements are byte strings. Integer-encoded elements are converted to
/// their decimal text on decode, so nothing here records whether an element
/// was originally stored as a number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
  String(Vec<u8>),
  List(Vec<Vec<u8>>),
  /// Members in stored order; uniqueness is not checked.
  Set(Vec<Vec<u8>>),
  /// Members in stored order, not re-sorted by score.
  SortedSet(Vec<ScoredMember>),
  Hash(Vec<HashField>),
}

impl Value {
  #[must_use]
  pub fn kind(&self) -> EntityKind {
    match self {
      Self::String(_) => EntityKind::String,
      Self::List(_) => EntityKind::List,
      Self::Set(_) => EntityKind::Set,
      Self::SortedSet(_) => EntityKind::SortedSet,
      Self::Hash(_) => EntityKind::Hash,
    }
  }

  /// Number of elements: bytes for a string, entries for a container.
  #[must_use]
  pub fn len(&self) -> usize {
    match self {
      Self::String(s) => s.len(),
      Self::List(items) | Self::Set(items) => items.len(),
      Self::SortedSet(members) => members.len(),
      Self::Hash(fields) => fields.len(),
    }
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Pair a flat `field, value, field, value, …` sequence into a hash.
  ///
  /// # Errors
  ///
  /// Returns [`TypeError::OddElementCount`] if the sequence cannot be
  /// paired.
  pub fn hash_from_flat(items: Vec<Vec<u8>>) -> Result<Self, TypeError> {
    let pairs = into_pairs(items, "hash")?;
    Ok(Self::Hash(
      pairs
        .into_iter()
        .map(|(field, value)| HashField { field, value })
        .collect(),
    ))
  }

  /// Pair a flat `member, score, member, score, …` sequence into a
  /// sorted set.
  ///
  /// # Errors
  ///
  /// Returns [`TypeError::OddElementCount`] if the sequence cannot be
  /// paired.
  pub fn sorted_set_from_flat(items: Vec<Vec<u8>>) -> Result<Self, TypeError> {
    let pairs = into_pairs(items, "zset")?;
    let members = pairs
      .into_iter()
      .map(|(member, score)| ScoredMember::from_raw(member, score))
      .collect();
    Ok(Self::SortedSet(members))
  }
}

fn into_pairs(items: Vec<Vec<u8>>, kind: &'static str) -> Result<Vec<(Vec<u8>, Vec<u8>)>, TypeError> {
  if items.len() % 2 != 0 {
    return Err(TypeError::OddElementCount {
      kind,
      count: items.len(),
    });
  }

  let mut pairs = Vec::with_capacity(items.len() / 2);
  let mut iter = items.into_iter();
  while let (Some(a), Some(b)) = (iter.next(), iter.next()) {
    pairs.push((a, b));
  }
  Ok(pairs)
}

/// One sorted-set member with its score.
///
/// The score is kept as the decimal text stored on the wire (or `"NaN"`,
/// `"+inf"`, `"-inf"`), so no precision is lost in decoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoredMember {
  pub member: Vec<u8>,
  pub score: String,
}

impl ScoredMember {
  pub fn new(member: impl Into<Vec<u8>>, score: impl Into<String>) -> Self {
    Self {
      member: member.into(),
      score: score.into(),
    }
  }

  /// Build a member from raw score bytes. Bytes that are not UTF-8 are
  /// replaced with U+FFFD rather than rejected.
  #[must_use]
  pub fn from_raw(member: Vec<u8>, score: Vec<u8>) -> Self {
    let score = String::from_utf8(score)
      .unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned());
    Self { member, score }
  }

  /// Parse the score text as a float. Sentinels parse to NaN / ±infinity.
  #[must_use]
  pub fn score_f64(&self) -> Option<f64> {
    self.score.parse().ok()
  }
}

/// One hash field with its value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HashField {
  pub field: Vec<u8>,
  pub value: Vec<u8>,
}

impl HashField {
  pub fn new(field: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
    Self {
      field: field.into(),
      value: value.into(),
    }
  }
}
