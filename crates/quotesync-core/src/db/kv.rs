//! Key-value persistence seam

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// Logical keys of every persisted value
pub mod keys {
    /// Local quote collection
    pub const QUOTES: &str = "quotes";
    /// Simulated remote mirror collection
    pub const SERVER_QUOTES: &str = "serverQuotes";
    /// Pending change log
    pub const PENDING_CHANGES: &str = "pendingChanges";
    /// Conflicts awaiting a resolution
    pub const PENDING_CONFLICTS: &str = "pendingConflicts";
    /// RFC 3339 time of the last successful sync
    pub const LAST_SYNC_TIME: &str = "lastSyncTime";
    /// Last selected category filter
    pub const SELECTED_CATEGORY: &str = "selectedCategory";
}

/// Trait for string key-value storage (async)
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    /// Read the value stored under `key`
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Store every `(key, value)` pair; either all of them land or none do
    async fn set_many(&self, entries: &[(&str, &str)]) -> Result<()>;

    /// Remove `key`; removing a missing key is not an error
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Load and deserialize a JSON value
pub async fn load_json<T, S>(store: &S, key: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.get(key).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Serialize and store a JSON value
pub async fn save_json<T, S>(store: &S, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw).await
}
