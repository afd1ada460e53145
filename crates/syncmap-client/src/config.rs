//! Configuration for synchronization behavior.

use std::time::Duration;

/// Configuration for a synchronized dictionary's worker.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Bound on one exchange with the aggregator. A cycle whose request
    /// exceeds this is treated as failed and skipped.
    pub request_timeout: Duration,

    /// Pause between synchronization cycles. Zero (the default) paces the
    /// loop by round-trip time alone; raise it when a continuous polling
    /// load on the aggregator is unwanted.
    pub min_cycle_interval: Duration,

    /// Bound on how long `stop()` waits for the worker to exit before
    /// aborting it.
    pub shutdown_timeout: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            min_cycle_interval: Duration::ZERO,
            shutdown_timeout: Duration::from_secs(5),
        }
    }
}
