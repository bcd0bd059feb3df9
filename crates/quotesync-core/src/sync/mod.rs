//! Simulated client/server synchronization.
//!
//! A cycle fetches the remote mirror, looks for conflicts against the local
//! collection and then either stops for a user resolution or pushes the
//! pending change log and folds remote-only changes back into the local
//! collection.

mod detect;
mod merge;
mod orchestrator;
mod remote;
mod scheduler;

pub use detect::detect_conflicts;
pub use merge::{merge, resolve, Resolution, Resolved};
pub use orchestrator::{SkipReason, SyncOrchestrator, SyncOutcome, SyncReport, SyncTrigger};
pub use remote::{RemoteMirror, StoredRemote};
pub use scheduler::{run_periodic, SchedulerSummary};
