//! Last-writer-wins merge and user-chosen conflict resolutions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::models::{Quote, QuoteCollection};

/// Combine two collections, starting from `remote` as the base.
///
/// Local records missing remotely are appended. A local record replaces its
/// remote counterpart when it is newer or carries a higher version. Whole
/// records are kept; fields are never mixed. Deterministic for equal inputs.
pub fn merge(local: &QuoteCollection, remote: &QuoteCollection) -> QuoteCollection {
    let mut result = remote.clone();

    for local_quote in local {
        match result.get(local_quote.id) {
            None => result.push(local_quote.clone()),
            Some(existing) if local_wins(local_quote, existing) => {
                result.replace(local_quote.clone());
            }
            Some(_) => {}
        }
    }

    result
}

fn local_wins(local: &Quote, existing: &Quote) -> bool {
    local.last_modified > existing.last_modified || local.version > existing.version
}

/// How the user chose to settle pending conflicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Resolution {
    /// Take the server copy, keeping unpushed local additions
    UseRemote,
    /// Keep the local copy and overwrite the server with it
    UseLocal,
    /// Last-writer-wins merge, pushed to the server
    Merge,
}

impl Resolution {
    /// Notification shown once the resolution has been applied
    pub const fn message(self) -> &'static str {
        match self {
            Self::UseRemote => "Using server data",
            Self::UseLocal => "Keeping local data",
            Self::Merge => "Data merged successfully",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UseRemote => "remote",
            Self::UseLocal => "local",
            Self::Merge => "merge",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resolution {
    type Err = Error;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "remote" | "server" | "use-remote" => Ok(Self::UseRemote),
            "local" | "use-local" => Ok(Self::UseLocal),
            "merge" => Ok(Self::Merge),
            other => Err(Error::InvalidInput(format!(
                "Unknown resolution '{other}' (expected remote, local or merge)"
            ))),
        }
    }
}

/// Outcome of applying a [`Resolution`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// New local collection, transient flags stripped
    pub quotes: QuoteCollection,
    /// Collection the remote mirror must be overwritten with, if any
    pub remote_update: Option<QuoteCollection>,
}

/// Apply `resolution` to the two sides. Pure; the caller persists the result.
pub fn resolve(
    resolution: Resolution,
    local: &QuoteCollection,
    remote: &QuoteCollection,
) -> Resolved {
    let mut quotes = match resolution {
        Resolution::UseRemote => {
            let mut quotes = remote.clone();
            for quote in local
                .iter()
                .filter(|quote| quote.unsynced && !remote.contains(quote.id))
            {
                quotes.push(quote.clone());
            }
            quotes
        }
        Resolution::UseLocal => local.clone(),
        Resolution::Merge => merge(local, remote),
    };
    quotes.clear_transient_flags();

    let remote_update = match resolution {
        Resolution::UseRemote => None,
        Resolution::UseLocal | Resolution::Merge => Some(quotes.clone()),
    };

    Resolved {
        quotes,
        remote_update,
    }
}
