//! Sync conflict model

use serde::{Deserialize, Serialize};

use super::quote::Quote;

/// Kind of divergence between the local collection and the remote mirror
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictKind {
    /// The remote holds a newer, different version of a local record
    Modified,
    /// A synced local record no longer exists on the remote
    Removed,
    /// The remote gained a record with the same text as a pending local addition
    Duplicate,
}

/// Conflict surfaced by one sync cycle, discarded after resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub kind: ConflictKind,
    pub local: Option<Quote>,
    #[serde(alias = "server")]
    pub remote: Option<Quote>,
    pub description: String,
}

impl Conflict {
    #[must_use]
    pub fn modified(local: Quote, remote: Quote) -> Self {
        Self {
            kind: ConflictKind::Modified,
            description: format!("Modified: \"{}\"", local.text),
            local: Some(local),
            remote: Some(remote),
        }
    }

    #[must_use]
    pub fn removed(local: Quote) -> Self {
        Self {
            kind: ConflictKind::Removed,
            description: format!("Removed: \"{}\"", local.text),
            local: Some(local),
            remote: None,
        }
    }

    #[must_use]
    pub fn duplicate(local: Quote, remote: Quote) -> Self {
        Self {
            kind: ConflictKind::Duplicate,
            description: format!("Duplicate: \"{}\"", remote.text),
            local: Some(local),
            remote: Some(remote),
        }
    }

    /// Id of the local record involved, if any
    pub fn local_id(&self) -> Option<super::QuoteId> {
        self.local.as_ref().map(|quote| quote.id)
    }
}
