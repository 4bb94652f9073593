use rdb_types::EntityKind;

/// Running counters for one decode.
///
/// Updated as the decoder goes, so a snapshot taken mid-stream reflects
/// everything consumed so far.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DecodeStats {
    /// Bytes consumed by the state machine across all chunks.
    pub bytes: u64,
    /// Calls to `feed`, including empty chunks.
    pub chunks: u64,
    /// Entities delivered to the sink.
    pub entities: u64,
    /// Distinct database indices selected, in first-seen order.
    pub databases: Vec<u64>,
    /// The most recent database select.
    pub last_db: Option<u64>,
    /// Whether the end-of-stream marker was reached.
    pub ended: bool,
    by_kind: [u64; EntityKind::ALL.len()],
}

impl DecodeStats {
    /// Entities of `kind` delivered so far.
    #[must_use]
    pub fn count(&self, kind: EntityKind) -> u64 {
        self.by_kind[usize::from(kind.wire_id())]
    }

    /// `(kind, count)` for every kind, in wire-id order.
    pub fn by_kind(&self) -> impl Iterator<Item = (EntityKind, u64)> + '_ {
        EntityKind::ALL.into_iter().map(|kind| (kind, self.count(kind)))
    }

    pub(crate) fn record_entity(&mut self, kind: EntityKind) {
        self.entities += 1;
        self.by_kind[usize::from(kind.wire_id())] += 1;
    }

    pub(crate) fn record_select(&mut self, db: u64) {
        self.last_db = Some(db);
        if !self.databases.contains(&db) {
            self.databases.push(db);
        }
    }
}
