//! Data models for quotesync

mod change;
mod collection;
mod conflict;
mod quote;

pub use change::{ChangeEntry, ChangeKind, ChangeLog};
pub use collection::{CategoryFilter, QuoteCollection};
pub use conflict::{Conflict, ConflictKind};
pub use quote::{Quote, QuoteDraft, QuoteId, QuotePatch};
