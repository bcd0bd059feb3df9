//! quotesync-core - Core library for quotesync
//!
//! This crate contains the quote models, key-value persistence, the local
//! quote store and the simulated client/server synchronization used by the
//! quotesync CLI.

pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod import;
pub mod models;
pub mod observer;
pub mod state;
pub mod store;
pub mod sync;
pub mod util;

pub use error::{Error, Result};
pub use models::{
    CategoryFilter, ChangeEntry, ChangeKind, ChangeLog, Conflict, ConflictKind, Quote,
    QuoteCollection, QuoteDraft, QuoteId, QuotePatch,
};
pub use state::SyncStatus;
