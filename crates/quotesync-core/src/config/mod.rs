//! Sync configuration shared by the orchestrator and the scheduler.

use std::time::Duration;

/// Default periodic sync interval.
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(30);

/// Default simulated round-trip delay to the remote mirror.
pub const DEFAULT_NETWORK_DELAY: Duration = Duration::from_secs(1);

/// Configuration for the sync orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Interval between periodic sync cycles
    pub interval: Duration,
    /// Simulated network delay applied before each remote round trip
    pub network_delay: Duration,
    /// Whether the client considers itself online
    pub connected: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_SYNC_INTERVAL,
            network_delay: DEFAULT_NETWORK_DELAY,
            connected: true,
        }
    }
}

impl SyncConfig {
    /// Set the periodic sync interval
    #[must_use]
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the simulated network delay
    #[must_use]
    pub const fn with_network_delay(mut self, delay: Duration) -> Self {
        self.network_delay = delay;
        self
    }

    /// Disable the simulated delay (tests and scripted runs)
    #[must_use]
    pub const fn without_network_delay(mut self) -> Self {
        self.network_delay = Duration::ZERO;
        self
    }

    /// Mark the client as offline; cycles are skipped until reconnected
    #[must_use]
    pub const fn offline(mut self) -> Self {
        self.connected = false;
        self
    }
}
