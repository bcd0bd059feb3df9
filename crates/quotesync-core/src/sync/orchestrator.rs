//! Sync orchestrator: owns the local store, the remote handle and the cycle
//! state machine.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::detect::detect_conflicts;
use super::merge::{merge, resolve, Resolution};
use super::remote::RemoteMirror;
use crate::config::SyncConfig;
use crate::db::{keys, load_json, save_json, KeyValueStore};
use crate::error::{Error, Result};
use crate::models::{Conflict, Quote, QuoteDraft, QuoteId, QuotePatch};
use crate::observer::SyncObserver;
use crate::state::SyncStatus;
use crate::store::QuoteStore;

const SYNC_FAILED_MESSAGE: &str = "Sync failed. Please try again.";

/// What asked for a sync cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncTrigger {
    Timer,
    Manual,
}

/// Why a cycle request was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Another cycle is still running
    InProgress,
    /// Conflicts are waiting for a resolution
    ConflictPending,
}

/// Result of a sync request that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Synced { pushed: usize, total: usize },
    Conflicts(Vec<Conflict>),
    Offline,
    Skipped(SkipReason),
}

/// Snapshot of the sync state for status displays
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub status: SyncStatus,
    pub connected: bool,
    pub last_sync_time: Option<DateTime<Utc>>,
    pub pending_changes: usize,
    pub unsynced_quotes: usize,
    pub pending_conflicts: usize,
}

pub struct SyncOrchestrator<S, R> {
    store: QuoteStore<S>,
    remote: R,
    config: SyncConfig,
    status: SyncStatus,
    conflicts: Vec<Conflict>,
    last_sync_time: Option<DateTime<Utc>>,
    observer: Box<dyn SyncObserver>,
}

impl<S: KeyValueStore, R: RemoteMirror> SyncOrchestrator<S, R> {
    /// Restore persisted sync state (pending conflicts, last sync time)
    pub async fn open(
        store: QuoteStore<S>,
        remote: R,
        config: SyncConfig,
        observer: Box<dyn SyncObserver>,
    ) -> Result<Self> {
        let conflicts: Vec<Conflict> = load_json(store.kv(), keys::PENDING_CONFLICTS)
            .await?
            .unwrap_or_default();
        let last_sync_time = load_last_sync_time(store.kv()).await?;

        let status = if !conflicts.is_empty() {
            SyncStatus::ConflictPending
        } else if config.connected {
            SyncStatus::Idle
        } else {
            SyncStatus::Offline
        };

        Ok(Self {
            store,
            remote,
            config,
            status,
            conflicts,
            last_sync_time,
            observer,
        })
    }

    pub const fn status(&self) -> SyncStatus {
        self.status
    }

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    pub const fn last_sync_time(&self) -> Option<DateTime<Utc>> {
        self.last_sync_time
    }

    pub const fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub const fn store(&self) -> &QuoteStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut QuoteStore<S> {
        &mut self.store
    }

    pub const fn remote(&self) -> &R {
        &self.remote
    }

    pub fn report(&self) -> SyncReport {
        SyncReport {
            status: self.status,
            connected: self.config.connected,
            last_sync_time: self.last_sync_time,
            pending_changes: self.store.changes().len(),
            unsynced_quotes: self.store.quotes().unsynced_count(),
            pending_conflicts: self.conflicts.len(),
        }
    }

    /// Toggle connectivity. Pending conflicts keep their status.
    pub fn set_connected(&mut self, connected: bool) {
        self.config.connected = connected;
        match (connected, self.status) {
            (_, SyncStatus::ConflictPending | SyncStatus::Syncing) => {}
            (false, _) => self.transition(SyncStatus::Offline),
            (true, SyncStatus::Offline) => self.transition(SyncStatus::Idle),
            (true, _) => {}
        }
    }

    /// Add a quote locally and notify the observer
    pub async fn add_quote(&mut self, draft: QuoteDraft) -> Result<Quote> {
        let quote = self.store.add(draft).await?;
        self.observer.notify("Quote added successfully!", false);
        self.render();
        Ok(quote)
    }

    pub async fn edit_quote(&mut self, id: QuoteId, patch: &QuotePatch) -> Result<Quote> {
        let quote = self.store.update(id, patch).await?;
        self.render();
        Ok(quote)
    }

    pub async fn delete_quote(&mut self, id: QuoteId) -> Result<Quote> {
        let quote = self.store.delete(id).await?;
        self.render();
        Ok(quote)
    }

    /// Run one sync cycle if the current state admits it.
    ///
    /// Failures leave the local collection and change log untouched, set the
    /// status to `Error` and are returned to the caller; the next request
    /// retries from scratch.
    pub async fn sync_now(&mut self, trigger: SyncTrigger) -> Result<SyncOutcome> {
        if !self.status.admits_cycle() {
            let reason = if self.status == SyncStatus::ConflictPending {
                SkipReason::ConflictPending
            } else {
                SkipReason::InProgress
            };
            tracing::debug!("Skipping {trigger:?} sync request: {reason:?}");
            return Ok(SyncOutcome::Skipped(reason));
        }

        if !self.config.connected {
            self.transition(SyncStatus::Offline);
            tracing::debug!("Offline, skipping {trigger:?} sync");
            return Ok(SyncOutcome::Offline);
        }

        self.transition(SyncStatus::Syncing);
        tracing::debug!("Starting {trigger:?} sync cycle");

        match self.run_cycle().await {
            Ok(outcome) => Ok(outcome),
            Err(error) => {
                tracing::warn!("Sync cycle failed: {error}");
                self.transition(SyncStatus::Error);
                self.observer.notify(SYNC_FAILED_MESSAGE, true);
                Err(error)
            }
        }
    }

    async fn run_cycle(&mut self) -> Result<SyncOutcome> {
        self.simulate_network_delay().await;
        let remote = self
            .remote
            .fetch()
            .await
            .map_err(|error| Error::Sync(format!("Failed to fetch remote quotes: {error}")))?;

        let mut conflicts = detect_conflicts(self.store.quotes(), &remote);
        if !conflicts.is_empty() {
            for conflict in &mut conflicts {
                if let Some(local) = conflict.local.as_mut() {
                    local.conflict = true;
                }
            }
            let ids = conflicts
                .iter()
                .filter_map(Conflict::local_id)
                .collect::<Vec<_>>();

            self.store.mark_conflicts(&ids).await?;
            save_json(self.store.kv(), keys::PENDING_CONFLICTS, &conflicts).await?;
            self.conflicts.clone_from(&conflicts);

            tracing::info!("Sync found {} conflicts", conflicts.len());
            self.transition(SyncStatus::ConflictPending);
            self.observer.notify(
                &format!("{} sync conflicts need resolution", conflicts.len()),
                false,
            );
            self.render();
            return Ok(SyncOutcome::Conflicts(conflicts));
        }

        let pushed = self.store.changes().len();
        let remote = if pushed == 0 {
            remote
        } else {
            self.remote
                .push(self.store.changes())
                .await
                .map_err(|error| Error::Sync(format!("Failed to push changes: {error}")))?
        };

        let mut quotes = merge(self.store.quotes(), &remote);
        quotes.clear_transient_flags();
        let total = quotes.len();

        let now = self.store.clock().now();
        self.store.commit_synced(quotes).await?;
        self.record_sync_time(now).await?;

        tracing::info!("Synced {pushed} pending changes, {total} quotes in collection");
        self.transition(SyncStatus::Synced);
        self.observer.notify("Data synced successfully", false);
        self.render();
        Ok(SyncOutcome::Synced { pushed, total })
    }

    /// Settle pending conflicts with the user's choice.
    ///
    /// On failure the conflicts stay pending so the user can retry.
    pub async fn resolve(&mut self, resolution: Resolution) -> Result<()> {
        if self.status != SyncStatus::ConflictPending {
            return Err(Error::InvalidInput("No conflicts to resolve".to_string()));
        }
        if !self.config.connected {
            return Err(Error::Sync("Cannot resolve conflicts while offline".to_string()));
        }

        if let Err(error) = self.apply_resolution(resolution).await {
            tracing::warn!("Applying {resolution} resolution failed: {error}");
            self.observer.notify(SYNC_FAILED_MESSAGE, true);
            return Err(error);
        }

        tracing::info!("Resolved {} conflicts with {resolution}", self.conflicts.len());
        self.conflicts.clear();
        self.transition(SyncStatus::Idle);
        self.observer.notify(resolution.message(), false);
        self.render();
        Ok(())
    }

    async fn apply_resolution(&mut self, resolution: Resolution) -> Result<()> {
        self.simulate_network_delay().await;
        let remote = self
            .remote
            .fetch()
            .await
            .map_err(|error| Error::Sync(format!("Failed to fetch remote quotes: {error}")))?;

        let resolved = resolve(resolution, self.store.quotes(), &remote);
        if let Some(update) = &resolved.remote_update {
            self.remote
                .overwrite(update)
                .await
                .map_err(|error| Error::Sync(format!("Failed to push resolution: {error}")))?;
        }

        let now = self.store.clock().now();
        self.store.commit_synced(resolved.quotes).await?;
        self.store.kv().remove(keys::PENDING_CONFLICTS).await?;
        self.record_sync_time(now).await
    }

    async fn record_sync_time(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.store
            .kv()
            .set(keys::LAST_SYNC_TIME, &now.to_rfc3339())
            .await?;
        self.last_sync_time = Some(now);
        Ok(())
    }

    async fn simulate_network_delay(&self) {
        if !self.config.network_delay.is_zero() {
            tokio::time::sleep(self.config.network_delay).await;
        }
    }

    fn transition(&mut self, status: SyncStatus) {
        if self.status != status {
            tracing::debug!("Sync status {} -> {}", self.status, status);
        }
        self.status = status;
        self.observer.set_status(status);
    }

    fn render(&self) {
        self.observer.render(self.store.quotes().as_slice());
    }
}

async fn load_last_sync_time<S: KeyValueStore>(kv: &S) -> Result<Option<DateTime<Utc>>> {
    let Some(raw) = kv.get(keys::LAST_SYNC_TIME).await? else {
        return Ok(None);
    };
    match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(parsed) => Ok(Some(parsed.with_timezone(&Utc))),
        Err(error) => {
            tracing::warn!("Ignoring unreadable last sync time '{raw}': {error}");
            Ok(None)
        }
    }
}
