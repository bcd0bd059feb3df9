//! Periodic sync loop with manual triggers

use std::future::Future;

use tokio::sync::mpsc;
use tokio::time::{interval, MissedTickBehavior};

use super::orchestrator::{SyncOrchestrator, SyncOutcome, SyncTrigger};
use super::remote::RemoteMirror;
use crate::db::KeyValueStore;
use crate::error::Result;

/// Counters for one scheduler run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerSummary {
    pub cycles: usize,
    pub synced: usize,
    pub conflicts: usize,
    pub skipped: usize,
    pub offline: usize,
    pub failures: usize,
}

impl SchedulerSummary {
    fn record(&mut self, result: &Result<SyncOutcome>) {
        self.cycles += 1;
        match result {
            Ok(SyncOutcome::Synced { .. }) => self.synced += 1,
            Ok(SyncOutcome::Conflicts(_)) => self.conflicts += 1,
            Ok(SyncOutcome::Skipped(_)) => self.skipped += 1,
            Ok(SyncOutcome::Offline) => self.offline += 1,
            Err(_) => self.failures += 1,
        }
    }
}

/// Drive sync cycles from the configured interval and from `manual` requests
/// until `shutdown` resolves.
///
/// The first tick fires immediately. A started cycle always runs to
/// completion; shutdown is only observed between cycles. Ticks missed while a
/// cycle was running are dropped rather than replayed.
pub async fn run_periodic<S, R, F>(
    orchestrator: &mut SyncOrchestrator<S, R>,
    mut manual: mpsc::Receiver<()>,
    shutdown: F,
) -> SchedulerSummary
where
    S: KeyValueStore,
    R: RemoteMirror,
    F: Future<Output = ()>,
{
    let mut ticker = interval(orchestrator.config().interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    let mut summary = SchedulerSummary::default();
    let mut manual_open = true;

    loop {
        let trigger = tokio::select! {
            biased;
            () = &mut shutdown => break,
            _ = ticker.tick() => SyncTrigger::Timer,
            request = manual.recv(), if manual_open => {
                if request.is_none() {
                    manual_open = false;
                    continue;
                }
                SyncTrigger::Manual
            }
        };

        let result = orchestrator.sync_now(trigger).await;
        if let Err(error) = &result {
            tracing::debug!("{trigger:?} cycle failed, retrying on next tick: {error}");
        }
        summary.record(&result);
    }

    tracing::info!(
        "Sync loop stopped after {} cycles ({} synced, {} failed)",
        summary.cycles,
        summary.synced,
        summary.failures
    );
    summary
}
