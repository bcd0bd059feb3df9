//! Shared sync state types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sync orchestrator state.
///
/// `Synced` and `Error` are terminal outcomes of a cycle and admit a new cycle
/// just like `Idle`; `Syncing` and `ConflictPending` do not.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncStatus {
    #[default]
    Idle,
    Offline,
    Syncing,
    Synced,
    ConflictPending,
    Error,
}

impl SyncStatus {
    /// Whether a new cycle may start from this state.
    pub const fn admits_cycle(self) -> bool {
        !matches!(self, Self::Syncing | Self::ConflictPending)
    }

    /// Short label suitable for a status line.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Offline => "Offline",
            Self::Syncing => "Syncing...",
            Self::Synced => "Synced",
            Self::ConflictPending => "Conflicts pending",
            Self::Error => "Sync Failed",
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
