//! Rendering and notification surface notified by the orchestrator

use crate::models::Quote;
use crate::state::SyncStatus;

/// Receiver of collection changes, user-facing messages and status updates
pub trait SyncObserver {
    /// Called after any change to the local collection
    fn render(&self, _quotes: &[Quote]) {}

    /// A user-facing message; `is_error` marks failures
    fn notify(&self, message: &str, is_error: bool);

    /// Called on every status transition
    fn set_status(&self, _status: SyncStatus) {}
}

/// Observer that routes everything to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl SyncObserver for TracingObserver {
    fn render(&self, quotes: &[Quote]) {
        tracing::debug!("Local collection now holds {} quotes", quotes.len());
    }

    fn notify(&self, message: &str, is_error: bool) {
        if is_error {
            tracing::warn!("{message}");
        } else {
            tracing::info!("{message}");
        }
    }

    fn set_status(&self, status: SyncStatus) {
        tracing::debug!("Sync status: {status}");
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Arc, Mutex};

    use super::SyncObserver;
    use crate::models::Quote;
    use crate::state::SyncStatus;

    /// Observer that records every call for assertions
    #[derive(Clone, Default)]
    pub struct RecordingObserver {
        pub messages: Arc<Mutex<Vec<(String, bool)>>>,
        pub statuses: Arc<Mutex<Vec<SyncStatus>>>,
        pub renders: Arc<Mutex<usize>>,
    }

    impl RecordingObserver {
        pub fn messages(&self) -> Vec<(String, bool)> {
            self.messages.lock().unwrap().clone()
        }

        pub fn statuses(&self) -> Vec<SyncStatus> {
            self.statuses.lock().unwrap().clone()
        }

        pub fn render_count(&self) -> usize {
            *self.renders.lock().unwrap()
        }
    }

    impl SyncObserver for RecordingObserver {
        fn render(&self, _quotes: &[Quote]) {
            *self.renders.lock().unwrap() += 1;
        }

        fn notify(&self, message: &str, is_error: bool) {
            self.messages
                .lock()
                .unwrap()
                .push((message.to_string(), is_error));
        }

        fn set_status(&self, status: SyncStatus) {
            self.statuses.lock().unwrap().push(status);
        }
    }
}
