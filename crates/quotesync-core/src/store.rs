//! Local quote store: the authoritative local collection and its change log.
//!
//! Every mutation is built on copies, persisted with one batched write of the
//! collection and the change log, and only then swapped into memory. A failed
//! write leaves both the persisted and the in-memory store as they were.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::clock::Clock;
use crate::db::{keys, load_json, save_json, KeyValueStore};
use crate::error::{Error, Result};
use crate::models::{
    CategoryFilter, ChangeKind, ChangeLog, Quote, QuoteCollection, QuoteDraft, QuoteId, QuotePatch,
};

/// Quotes written on first run when no collection has been persisted yet
pub const SEED_QUOTES: [(&str, &str, &str); 4] = [
    (
        "The only way to do great work is to love what you do.",
        "Steve Jobs",
        "Work",
    ),
    (
        "Innovation distinguishes between a leader and a follower.",
        "Steve Jobs",
        "Innovation",
    ),
    (
        "Your time is limited, so don't waste it living someone else's life.",
        "Steve Jobs",
        "Life",
    ),
    (
        "The future belongs to those who believe in the beauty of their dreams.",
        "Eleanor Roosevelt",
        "Dreams",
    ),
];

/// Build the seed collection with ids 1..=4, already in sync
pub fn seed_collection(now: DateTime<Utc>) -> QuoteCollection {
    SEED_QUOTES
        .iter()
        .zip(1_i64..)
        .map(|(&(text, author, category), id)| Quote {
            id: QuoteId::new(id),
            text: text.to_string(),
            author: author.to_string(),
            category: category.to_string(),
            last_modified: now,
            version: 1,
            unsynced: false,
            conflict: false,
        })
        .collect()
}

pub struct QuoteStore<S> {
    kv: S,
    clock: Arc<dyn Clock>,
    quotes: QuoteCollection,
    changes: ChangeLog,
}

impl<S: KeyValueStore> QuoteStore<S> {
    /// Load the persisted collection and change log (empty when absent)
    pub async fn open(kv: S, clock: Arc<dyn Clock>) -> Result<Self> {
        let quotes = load_json(&kv, keys::QUOTES).await?.unwrap_or_default();
        let changes = load_json(&kv, keys::PENDING_CHANGES)
            .await?
            .unwrap_or_default();
        Ok(Self {
            kv,
            clock,
            quotes,
            changes,
        })
    }

    /// Like [`open`](Self::open), but writes the seed quotes on first run
    pub async fn initialize(kv: S, clock: Arc<dyn Clock>) -> Result<Self> {
        if kv.get(keys::QUOTES).await?.is_none() {
            let seed = seed_collection(clock.now());
            save_json(&kv, keys::QUOTES, &seed).await?;
            tracing::info!("Seeded local collection with {} quotes", seed.len());
        }
        Self::open(kv, clock).await
    }

    pub const fn kv(&self) -> &S {
        &self.kv
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub const fn quotes(&self) -> &QuoteCollection {
        &self.quotes
    }

    pub const fn changes(&self) -> &ChangeLog {
        &self.changes
    }

    pub fn get(&self, id: QuoteId) -> Option<&Quote> {
        self.quotes.get(id)
    }

    /// Add a new quote; it stays `unsynced` until the next successful push
    pub async fn add(&mut self, draft: QuoteDraft) -> Result<Quote> {
        let now = self.clock.now();
        let quote = Quote::new(self.next_id(now), draft, now);

        let mut quotes = self.quotes.clone();
        quotes.push(quote.clone());
        let mut changes = self.changes.clone();
        changes.record(ChangeKind::Add, quote.clone(), now);

        self.commit(quotes, changes).await?;
        tracing::debug!("Added quote {}", quote.id);
        Ok(quote)
    }

    /// Add several validated drafts as one write
    pub async fn add_all(&mut self, drafts: Vec<QuoteDraft>) -> Result<Vec<Quote>> {
        let now = self.clock.now();
        let mut quotes = self.quotes.clone();
        let mut changes = self.changes.clone();
        let mut added = Vec::with_capacity(drafts.len());

        for draft in drafts {
            let id = next_id_for(&quotes, now);
            let quote = Quote::new(id, draft, now);
            quotes.push(quote.clone());
            changes.record(ChangeKind::Add, quote.clone(), now);
            added.push(quote);
        }

        self.commit(quotes, changes).await?;
        Ok(added)
    }

    /// Edit an existing quote. A patch that changes nothing is not recorded.
    pub async fn update(&mut self, id: QuoteId, patch: &QuotePatch) -> Result<Quote> {
        let now = self.clock.now();
        let mut quotes = self.quotes.clone();
        let quote = quotes
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        if !quote.apply_patch(patch) {
            return Ok(quote.clone());
        }
        // `unsynced` marks pending additions only
        quote.touch(now);
        let updated = quote.clone();

        let mut changes = self.changes.clone();
        changes.record(ChangeKind::Modify, updated.clone(), now);

        self.commit(quotes, changes).await?;
        tracing::debug!("Updated quote {} to version {}", updated.id, updated.version);
        Ok(updated)
    }

    /// Delete a quote and record the deletion for the next push
    pub async fn delete(&mut self, id: QuoteId) -> Result<Quote> {
        let now = self.clock.now();
        let mut quotes = self.quotes.clone();
        let removed = quotes
            .remove(id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        let mut changes = self.changes.clone();
        changes.record(ChangeKind::Delete, removed.clone(), now);

        self.commit(quotes, changes).await?;
        tracing::debug!("Deleted quote {}", removed.id);
        Ok(removed)
    }

    pub fn categories(&self) -> Vec<String> {
        self.quotes.categories()
    }

    /// The persisted category filter (`all` when never set)
    pub async fn selected_category(&self) -> Result<CategoryFilter> {
        Ok(self
            .kv
            .get(keys::SELECTED_CATEGORY)
            .await?
            .map(|value| CategoryFilter::from(value.as_str()))
            .unwrap_or_default())
    }

    pub async fn set_selected_category(&self, filter: &CategoryFilter) -> Result<()> {
        self.kv
            .set(keys::SELECTED_CATEGORY, &filter.to_string())
            .await
    }

    /// Quotes matching `filter`; the filter is remembered for next time
    pub async fn filter(&self, filter: &CategoryFilter) -> Result<Vec<Quote>> {
        self.set_selected_category(filter).await?;
        Ok(self.quotes.filtered(filter).into_iter().cloned().collect())
    }

    /// Pick a quote uniformly at random and reset the filter to `all`
    pub async fn random_quote<R: Rng>(&self, rng: &mut R) -> Result<Option<Quote>> {
        if self.quotes.is_empty() {
            return Ok(None);
        }
        let index = rng.random_range(0..self.quotes.len());
        let quote = self.quotes.as_slice().get(index).cloned();
        self.set_selected_category(&CategoryFilter::All).await?;
        Ok(quote)
    }

    /// Mark the given local records as conflicting and persist them
    pub(crate) async fn mark_conflicts(&mut self, ids: &[QuoteId]) -> Result<()> {
        let mut quotes = self.quotes.clone();
        for id in ids {
            if let Some(quote) = quotes.get_mut(*id) {
                quote.conflict = true;
            }
        }
        let changes = self.changes.clone();
        self.commit(quotes, changes).await
    }

    /// Replace the local collection after a completed sync and clear the log
    pub(crate) async fn commit_synced(&mut self, quotes: QuoteCollection) -> Result<()> {
        self.commit(quotes, ChangeLog::new()).await
    }

    async fn commit(&mut self, quotes: QuoteCollection, changes: ChangeLog) -> Result<()> {
        let quotes_raw = serde_json::to_string(&quotes)?;
        let changes_raw = serde_json::to_string(&changes)?;
        self.kv
            .set_many(&[
                (keys::QUOTES, quotes_raw.as_str()),
                (keys::PENDING_CHANGES, changes_raw.as_str()),
            ])
            .await?;
        self.quotes = quotes;
        self.changes = changes;
        Ok(())
    }

    fn next_id(&self, now: DateTime<Utc>) -> QuoteId {
        next_id_for(&self.quotes, now)
    }
}

/// Millisecond timestamp ids, bumped past the largest id already in use
pub(crate) fn next_id_for(quotes: &QuoteCollection, now: DateTime<Utc>) -> QuoteId {
    let candidate = now.timestamp_millis();
    match quotes.max_id() {
        Some(max) if max.get() >= candidate => QuoteId::new(max.get().saturating_add(1)),
        _ => QuoteId::new(candidate),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::clock::testing::ManualClock;
    use crate::db::testing::FailingStore;
    use crate::db::MemoryStore;

    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::at("2024-01-01T00:00:00Z"))
    }

    async fn empty_store() -> (QuoteStore<MemoryStore>, MemoryStore, Arc<ManualClock>) {
        let kv = MemoryStore::new();
        let clock = clock();
        let store = QuoteStore::open(kv.clone(), clock.clone()).await.unwrap();
        (store, kv, clock)
    }

    fn draft(text: &str, category: &str) -> QuoteDraft {
        QuoteDraft::new(text, "Author", category).unwrap()
    }

    #[tokio::test]
    async fn initialize_seeds_only_once() {
        let kv = MemoryStore::new();
        let mut store = QuoteStore::initialize(kv.clone(), clock()).await.unwrap();
        assert_eq!(store.quotes().len(), 4);
        assert!(store.quotes().iter().all(|quote| !quote.unsynced));

        store.delete(QuoteId::new(1)).await.unwrap();

        let reopened = QuoteStore::initialize(kv, clock()).await.unwrap();
        assert_eq!(reopened.quotes().len(), 3);
    }

    #[tokio::test]
    async fn add_records_change_and_persists() {
        let (mut store, kv, _clock) = empty_store().await;
        let quote = store.add(draft("Hello", "Life")).await.unwrap();

        assert!(quote.unsynced);
        assert_eq!(quote.version, 1);
        assert_eq!(store.changes().len(), 1);
        assert_eq!(store.changes().entries()[0].kind, ChangeKind::Add);

        let reopened = QuoteStore::open(kv, clock()).await.unwrap();
        assert_eq!(reopened.quotes(), store.quotes());
        assert_eq!(reopened.changes(), store.changes());
    }

    #[tokio::test]
    async fn ids_stay_unique_within_the_same_millisecond() {
        let (mut store, _kv, _clock) = empty_store().await;
        let first = store.add(draft("One", "Life")).await.unwrap();
        let second = store.add(draft("Two", "Life")).await.unwrap();
        assert_ne!(first.id, second.id);
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn update_bumps_version_and_logs_modify() {
        let (mut store, _kv, clock) = empty_store().await;
        let quote = store.add(draft("Hello", "Life")).await.unwrap();

        clock.advance(Duration::minutes(5));
        let patch = QuotePatch::new(Some("Hello again".into()), None, None).unwrap();
        let updated = store.update(quote.id, &patch).await.unwrap();

        assert_eq!(updated.version, 2);
        assert_eq!(updated.text, "Hello again");
        assert!(updated.last_modified > quote.last_modified);
        assert_eq!(store.changes().len(), 2);
        assert_eq!(store.changes().entries()[1].kind, ChangeKind::Modify);
    }

    #[tokio::test]
    async fn editing_a_synced_quote_keeps_it_synced() {
        let mut store = QuoteStore::initialize(MemoryStore::new(), clock())
            .await
            .unwrap();
        let patch = QuotePatch::new(Some("Edited".into()), None, None).unwrap();
        let updated = store.update(QuoteId::new(2), &patch).await.unwrap();

        assert!(!updated.unsynced);
        assert_eq!(store.changes().entries()[0].kind, ChangeKind::Modify);
    }

    #[tokio::test]
    async fn editing_a_pending_addition_keeps_it_unsynced() {
        let (mut store, _kv, _clock) = empty_store().await;
        let quote = store.add(draft("Hello", "Life")).await.unwrap();
        let patch = QuotePatch::new(Some("Hello again".into()), None, None).unwrap();

        assert!(store.update(quote.id, &patch).await.unwrap().unsynced);
    }

    #[tokio::test]
    async fn failed_write_leaves_persisted_state_untouched() {
        let kv = FailingStore::default();
        let mut store = QuoteStore::initialize(kv.clone(), clock()).await.unwrap();
        let before_quotes = kv.get(keys::QUOTES).await.unwrap();

        kv.set_fail_writes(true);
        assert!(store.add(draft("Hello", "Life")).await.is_err());
        assert_eq!(store.quotes().len(), 4);
        assert!(store.changes().is_empty());

        kv.set_fail_writes(false);
        assert_eq!(kv.get(keys::QUOTES).await.unwrap(), before_quotes);
        assert_eq!(kv.get(keys::PENDING_CHANGES).await.unwrap(), None);

        let reopened = QuoteStore::open(kv, clock()).await.unwrap();
        assert_eq!(reopened.quotes().len(), 4);
        assert!(reopened.changes().is_empty());
    }

    #[tokio::test]
    async fn update_without_changes_is_not_recorded() {
        let (mut store, _kv, _clock) = empty_store().await;
        let quote = store.add(draft("Hello", "Life")).await.unwrap();

        let patch = QuotePatch::new(None, None, Some("Life".into())).unwrap();
        let unchanged = store.update(quote.id, &patch).await.unwrap();

        assert_eq!(unchanged.version, 1);
        assert_eq!(store.changes().len(), 1);
    }

    #[tokio::test]
    async fn update_and_delete_missing_quote_fail() {
        let (mut store, _kv, _clock) = empty_store().await;
        let patch = QuotePatch::new(Some("x".into()), None, None).unwrap();

        assert!(matches!(
            store.update(QuoteId::new(99), &patch).await,
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            store.delete(QuoteId::new(99)).await,
            Err(Error::NotFound(_))
        ));
        assert!(store.changes().is_empty());
    }

    #[tokio::test]
    async fn delete_removes_and_logs() {
        let (mut store, _kv, _clock) = empty_store().await;
        let quote = store.add(draft("Hello", "Life")).await.unwrap();
        store.delete(quote.id).await.unwrap();

        assert!(store.quotes().is_empty());
        let kinds = store
            .changes()
            .entries()
            .iter()
            .map(|entry| entry.kind)
            .collect::<Vec<_>>();
        assert_eq!(kinds, vec![ChangeKind::Add, ChangeKind::Delete]);
    }

    #[tokio::test]
    async fn filter_remembers_selection() {
        let (mut store, _kv, _clock) = empty_store().await;
        store.add(draft("A", "Work")).await.unwrap();
        store.add(draft("B", "Life")).await.unwrap();

        assert_eq!(store.selected_category().await.unwrap(), CategoryFilter::All);

        let life = store.filter(&CategoryFilter::from("Life")).await.unwrap();
        assert_eq!(life.len(), 1);
        assert_eq!(life[0].text, "B");
        assert_eq!(
            store.selected_category().await.unwrap(),
            CategoryFilter::from("Life")
        );
    }

    #[tokio::test]
    async fn random_quote_resets_filter() {
        let (mut store, _kv, _clock) = empty_store().await;
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(store.random_quote(&mut rng).await.unwrap(), None);

        store.add(draft("A", "Work")).await.unwrap();
        store.add(draft("B", "Life")).await.unwrap();
        store
            .set_selected_category(&CategoryFilter::from("Work"))
            .await
            .unwrap();

        let picked = store.random_quote(&mut rng).await.unwrap().unwrap();
        assert!(store.quotes().contains(picked.id));
        assert_eq!(store.selected_category().await.unwrap(), CategoryFilter::All);
    }

    #[tokio::test]
    async fn add_all_assigns_distinct_ids() {
        let (mut store, _kv, _clock) = empty_store().await;
        let added = store
            .add_all(vec![draft("A", "Work"), draft("B", "Work"), draft("C", "Life")])
            .await
            .unwrap();

        assert_eq!(added.len(), 3);
        assert_eq!(store.changes().len(), 3);
        let mut ids = added.iter().map(|quote| quote.id).collect::<Vec<_>>();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }
}
