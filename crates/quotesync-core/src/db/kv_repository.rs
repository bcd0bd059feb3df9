//! libSQL-backed key-value store

use std::path::Path;
use std::sync::Arc;

use super::connection::Database;
use super::kv::KeyValueStore;
use crate::error::Result;

/// libSQL implementation of `KeyValueStore`; clones share one connection
#[derive(Clone)]
pub struct LibSqlStore {
    db: Arc<Database>,
}

impl LibSqlStore {
    /// Open (or create) the database file at `path`
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(Database::open(path).await?))
    }

    /// Open an in-memory database (useful for testing)
    pub async fn open_in_memory() -> Result<Self> {
        Ok(Self::new(Database::open_in_memory().await?))
    }

    pub fn new(db: Database) -> Self {
        Self { db: Arc::new(db) }
    }
}

impl KeyValueStore for LibSqlStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut rows = self
            .db
            .connection()
            .query("SELECT value FROM kv WHERE key = ?", [key])
            .await?;

        if let Some(row) = rows.next().await? {
            let value: String = row.get(0)?;
            Ok(Some(value))
        } else {
            Ok(None)
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let now = chrono::Utc::now().timestamp_millis();
        self.db
            .connection()
            .execute(
                "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?, ?, ?)",
                libsql::params![key, value, now],
            )
            .await?;
        Ok(())
    }

    async fn set_many(&self, entries: &[(&str, &str)]) -> Result<()> {
        let conn = self.db.connection();
        let now = chrono::Utc::now().timestamp_millis();
        conn.execute("BEGIN TRANSACTION", ()).await?;

        for (key, value) in entries {
            let written = conn
                .execute(
                    "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?, ?, ?)",
                    libsql::params![*key, *value, now],
                )
                .await;
            if let Err(e) = written {
                conn.execute("ROLLBACK", ()).await.ok();
                return Err(e.into());
            }
        }

        if let Err(e) = conn.execute("COMMIT", ()).await {
            conn.execute("ROLLBACK", ()).await.ok();
            return Err(e.into());
        }
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.db
            .connection()
            .execute("DELETE FROM kv WHERE key = ?", [key])
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_get_missing_key() {
        let store = LibSqlStore::open_in_memory().await.unwrap();
        assert_eq!(store.get("quotes").await.unwrap(), None);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_set_replaces_value() {
        let store = LibSqlStore::open_in_memory().await.unwrap();
        store.set("selectedCategory", "Life").await.unwrap();
        store.set("selectedCategory", "Work").await.unwrap();

        assert_eq!(
            store.get("selectedCategory").await.unwrap().as_deref(),
            Some("Work")
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_set_many_commits_together() {
        let store = LibSqlStore::open_in_memory().await.unwrap();
        store.set("quotes", "old").await.unwrap();
        store
            .set_many(&[("quotes", "[1]"), ("pendingChanges", "[2]")])
            .await
            .unwrap();

        assert_eq!(store.get("quotes").await.unwrap().as_deref(), Some("[1]"));
        assert_eq!(
            store.get("pendingChanges").await.unwrap().as_deref(),
            Some("[2]")
        );

        // The connection is usable for plain writes after the transaction
        store.set("selectedCategory", "Life").await.unwrap();
        assert_eq!(
            store.get("selectedCategory").await.unwrap().as_deref(),
            Some("Life")
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_remove_key() {
        let store = LibSqlStore::open_in_memory().await.unwrap();
        store.set("pendingChanges", "[]").await.unwrap();
        store.remove("pendingChanges").await.unwrap();
        store.remove("pendingChanges").await.unwrap();

        assert_eq!(store.get("pendingChanges").await.unwrap(), None);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_values_persist_across_reopen() {
        let tmp = tempdir().unwrap();
        let db_path = tmp.path().join("quotes.db");

        {
            let store = LibSqlStore::open(&db_path).await.unwrap();
            store.set("lastSyncTime", "2024-01-01T00:00:00Z").await.unwrap();
        }

        let reopened = LibSqlStore::open(&db_path).await.unwrap();
        assert_eq!(
            reopened.get("lastSyncTime").await.unwrap().as_deref(),
            Some("2024-01-01T00:00:00Z")
        );
    }
}
