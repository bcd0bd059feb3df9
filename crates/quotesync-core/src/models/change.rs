//! Pending local mutations awaiting a push to the remote mirror

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::collection::QuoteCollection;
use super::quote::Quote;

/// Kind of local mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Add,
    Modify,
    Delete,
}

/// One not-yet-synchronized local mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEntry {
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    #[serde(rename = "data", alias = "payload")]
    pub payload: Quote,
    pub timestamp: DateTime<Utc>,
}

/// Ordered log of pending changes.
///
/// Cleared in full after a successful push, never partially.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeLog(Vec<ChangeEntry>);

impl ChangeLog {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn record(&mut self, kind: ChangeKind, payload: Quote, timestamp: DateTime<Utc>) {
        self.0.push(ChangeEntry {
            kind,
            payload,
            timestamp,
        });
    }

    pub fn entries(&self) -> &[ChangeEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Apply every entry, in log order, to a copy of `collection`.
    ///
    /// `add` upserts so replaying a log after an interrupted commit does not
    /// duplicate records; `modify` only touches records that still exist;
    /// `delete` of a missing record is a no-op.
    #[must_use]
    pub fn apply_to(&self, collection: &QuoteCollection) -> QuoteCollection {
        let mut updated = collection.clone();
        for entry in &self.0 {
            let mut payload = entry.payload.clone();
            payload.clear_transient_flags();
            match entry.kind {
                ChangeKind::Add => updated.upsert(payload),
                ChangeKind::Modify => {
                    updated.replace(payload);
                }
                ChangeKind::Delete => {
                    updated.remove(payload.id);
                }
            }
        }
        updated
    }
}
