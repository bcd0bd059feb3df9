//! Persistence layer for quotesync

mod connection;
mod kv;
mod kv_repository;
mod memory;
mod migrations;

pub use connection::Database;
pub use kv::{keys, load_json, save_json, KeyValueStore};
pub use kv_repository::LibSqlStore;
pub use memory::MemoryStore;

#[cfg(test)]
pub(crate) use memory::testing;
