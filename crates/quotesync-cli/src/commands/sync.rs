use std::io::BufRead;
use std::time::Duration;

use quotesync_core::sync::{
    run_periodic, Resolution, SchedulerSummary, SyncOutcome, SyncReport, SyncTrigger,
};
use tokio::sync::mpsc;

use crate::commands::common::{
    format_conflict_lines, format_sync_timestamp, open_orchestrator, RunContext,
};
use crate::error::CliError;

pub async fn run_sync(context: &RunContext) -> Result<SyncOutcome, CliError> {
    let mut orchestrator = open_orchestrator(context).await?;
    let outcome = orchestrator.sync_now(SyncTrigger::Manual).await?;

    match &outcome {
        SyncOutcome::Synced { pushed, total } => {
            println!("Sync completed ({pushed} changes pushed, {total} quotes)");
        }
        SyncOutcome::Conflicts(conflicts) => {
            for line in format_conflict_lines(conflicts) {
                println!("{line}");
            }
            println!("Run `quotes sync resolve <remote|local|merge>` to continue");
        }
        SyncOutcome::Offline => println!("Offline: sync skipped"),
        SyncOutcome::Skipped(_) => {
            println!(
                "{} conflicts are waiting; run `quotes sync resolve <remote|local|merge>`",
                orchestrator.conflicts().len()
            );
        }
    }

    Ok(outcome)
}

pub async fn run_sync_status(as_json: bool, context: &RunContext) -> Result<SyncReport, CliError> {
    let orchestrator = open_orchestrator(context).await?;
    let report = orchestrator.report();

    if as_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Status:            {}", report.status);
        println!(
            "Connection:        {}",
            if report.connected { "online" } else { "offline" }
        );
        println!(
            "Last sync:         {}",
            format_sync_timestamp(report.last_sync_time)
        );
        println!("Pending changes:   {}", report.pending_changes);
        println!("Unsynced quotes:   {}", report.unsynced_quotes);
        println!("Pending conflicts: {}", report.pending_conflicts);
    }

    Ok(report)
}

pub async fn run_sync_conflicts(as_json: bool, context: &RunContext) -> Result<(), CliError> {
    let orchestrator = open_orchestrator(context).await?;
    let conflicts = orchestrator.conflicts();

    if as_json {
        println!("{}", serde_json::to_string_pretty(conflicts)?);
        return Ok(());
    }

    if conflicts.is_empty() {
        println!("No sync conflicts pending.");
        return Ok(());
    }

    for line in format_conflict_lines(conflicts) {
        println!("{line}");
    }
    Ok(())
}

pub async fn run_sync_resolve(
    resolution: Resolution,
    context: &RunContext,
) -> Result<(), CliError> {
    let mut orchestrator = open_orchestrator(context).await?;
    orchestrator.resolve(resolution).await?;
    Ok(())
}

/// Periodic sync in the foreground until Ctrl-C
pub async fn run_sync_watch(
    interval_secs: Option<u64>,
    context: &RunContext,
) -> Result<SchedulerSummary, CliError> {
    let mut context = context.clone();
    if let Some(secs) = interval_secs.filter(|secs| *secs > 0) {
        context.sync = context.sync.with_interval(Duration::from_secs(secs));
    }

    let mut orchestrator = open_orchestrator(&context).await?;
    eprintln!(
        "Syncing every {}s. Press Enter to sync now, Ctrl-C to stop.",
        context.sync.interval.as_secs()
    );

    let (manual_tx, manual_rx) = mpsc::channel(8);
    // Detached so a blocked stdin read never holds up shutdown.
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            if line.is_err() || manual_tx.blocking_send(()).is_err() {
                break;
            }
        }
    });

    let shutdown = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {error}");
            std::future::pending::<()>().await;
        }
    };

    let summary = run_periodic(&mut orchestrator, manual_rx, shutdown).await;
    println!(
        "{} cycles: {} synced, {} with conflicts, {} skipped, {} offline, {} failed",
        summary.cycles,
        summary.synced,
        summary.conflicts,
        summary.skipped,
        summary.offline,
        summary.failures
    );
    Ok(summary)
}
