//! The simulated remote mirror

use std::sync::Arc;

use crate::clock::Clock;
use crate::db::{keys, load_json, save_json, KeyValueStore};
use crate::error::{Error, Result};
use crate::models::{ChangeLog, Quote, QuoteCollection, QuoteDraft, QuoteId, QuotePatch};
use crate::store::{next_id_for, seed_collection};

/// Server side of a sync cycle
#[allow(async_fn_in_trait)]
pub trait RemoteMirror {
    /// Current remote collection
    async fn fetch(&self) -> Result<QuoteCollection>;

    /// Apply `changes` in log order and return the resulting collection
    async fn push(&self, changes: &ChangeLog) -> Result<QuoteCollection>;

    /// Replace the remote collection wholesale
    async fn overwrite(&self, quotes: &QuoteCollection) -> Result<()>;
}

/// Remote mirror kept under the `serverQuotes` key of a key-value store.
///
/// Besides the sync contract it exposes explicit mutation helpers so that
/// independent server-side changes can be injected on demand.
#[derive(Clone)]
pub struct StoredRemote<S> {
    kv: S,
    clock: Arc<dyn Clock>,
}

impl<S: KeyValueStore> StoredRemote<S> {
    pub fn new(kv: S, clock: Arc<dyn Clock>) -> Self {
        Self { kv, clock }
    }

    /// Write the seed quotes when the remote has never been stored
    pub async fn seed_if_missing(&self) -> Result<bool> {
        if self.kv.get(keys::SERVER_QUOTES).await?.is_some() {
            return Ok(false);
        }
        self.overwrite(&seed_collection(self.clock.now())).await?;
        tracing::info!("Seeded remote mirror");
        Ok(true)
    }

    /// Add a quote on the server side only
    pub async fn insert(&self, draft: QuoteDraft) -> Result<Quote> {
        let now = self.clock.now();
        let mut quotes = self.fetch().await?;
        let mut quote = Quote::new(next_id_for(&quotes, now), draft, now);
        quote.unsynced = false;
        quotes.push(quote.clone());
        self.overwrite(&quotes).await?;
        Ok(quote)
    }

    /// Edit a quote on the server side, bumping its version
    pub async fn edit(&self, id: QuoteId, patch: &QuotePatch) -> Result<Quote> {
        let mut quotes = self.fetch().await?;
        let quote = quotes
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        if quote.apply_patch(patch) {
            quote.touch(self.clock.now());
        }
        let edited = quote.clone();
        self.overwrite(&quotes).await?;
        Ok(edited)
    }

    /// Delete a quote on the server side
    pub async fn remove(&self, id: QuoteId) -> Result<Quote> {
        let mut quotes = self.fetch().await?;
        let removed = quotes
            .remove(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        self.overwrite(&quotes).await?;
        Ok(removed)
    }
}

impl<S: KeyValueStore> RemoteMirror for StoredRemote<S> {
    async fn fetch(&self) -> Result<QuoteCollection> {
        Ok(load_json(&self.kv, keys::SERVER_QUOTES)
            .await?
            .unwrap_or_default())
    }

    async fn push(&self, changes: &ChangeLog) -> Result<QuoteCollection> {
        let updated = changes.apply_to(&self.fetch().await?);
        self.overwrite(&updated).await?;
        Ok(updated)
    }

    async fn overwrite(&self, quotes: &QuoteCollection) -> Result<()> {
        save_json(&self.kv, keys::SERVER_QUOTES, quotes).await
    }
}


#[cfg(test)]
mod tests {
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::clock::testing::ManualClock;
    use crate::db::MemoryStore;
    use crate::models::ChangeKind;

    fn remote() -> (StoredRemote<MemoryStore>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::at("2024-01-01T00:00:00Z"));
        (StoredRemote::new(MemoryStore::new(), clock.clone()), clock)
    }

    #[tokio::test]
    async fn fetch_of_unseeded_remote_is_empty() {
        let (remote, _clock) = remote();
        assert!(remote.fetch().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn seed_only_once() {
        let (remote, _clock) = remote();
        assert!(remote.seed_if_missing().await.unwrap());
        remote.remove(QuoteId::new(1)).await.unwrap();
        assert!(!remote.seed_if_missing().await.unwrap());
        assert_eq!(remote.fetch().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn push_applies_log_in_order() {
        let (remote, clock) = remote();
        remote.seed_if_missing().await.unwrap();

        let mut added = Quote::new(
            QuoteId::new(100),
            QuoteDraft::new("New", "Me", "Life").unwrap(),
            clock.now(),
        );
        let mut log = ChangeLog::new();
        log.record(ChangeKind::Add, added.clone(), clock.now());
        added.text = "New, edited".to_string();
        added.version = 2;
        log.record(ChangeKind::Modify, added.clone(), clock.now());
        let seeded = remote.fetch().await.unwrap();
        log.record(
            ChangeKind::Delete,
            seeded.get(QuoteId::new(1)).unwrap().clone(),
            clock.now(),
        );

        let pushed = remote.push(&log).await.unwrap();
        assert_eq!(pushed, remote.fetch().await.unwrap());
        assert!(!pushed.contains(QuoteId::new(1)));
        let stored = pushed.get(QuoteId::new(100)).unwrap();
        assert_eq!(stored.text, "New, edited");
        assert!(!stored.unsynced);
    }

    #[tokio::test]
    async fn edit_bumps_version_and_time() {
        let (remote, clock) = remote();
        remote.seed_if_missing().await.unwrap();
        let before = remote.fetch().await.unwrap();

        clock.advance(Duration::days(1));
        let patch = QuotePatch::new(Some("Changed on the server".into()), None, None).unwrap();
        let edited = remote.edit(QuoteId::new(2), &patch).await.unwrap();

        let original = before.get(QuoteId::new(2)).unwrap();
        assert_eq!(edited.version, original.version + 1);
        assert!(edited.last_modified > original.last_modified);
    }

    #[tokio::test]
    async fn insert_assigns_fresh_synced_id() {
        let (remote, _clock) = remote();
        remote.seed_if_missing().await.unwrap();
        let inserted = remote
            .insert(QuoteDraft::new("Remote only", "Server", "Ops").unwrap())
            .await
            .unwrap();

        assert!(!inserted.unsynced);
        assert_eq!(remote.fetch().await.unwrap().len(), 5);
        assert!(matches!(
            remote.remove(QuoteId::new(999)).await,
            Err(Error::NotFound(_))
        ));
    }
}
