//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use syncmap::{MemoryAggregator, SyncConfig, SyncedMap};
use syncmap_board::MergeBoard;
use syncmap_client::{Aggregator, ClientError, Result};
use syncmap_core::{FieldMap, FilterSet, Patch, Snapshot};

/// Build a [`FieldMap`] from a `serde_json::json!` object literal.
///
/// # Panics
///
/// Panics if the value is not a JSON object. Test helper only.
pub fn fields(value: serde_json::Value) -> FieldMap {
    value.as_object().expect("object literal").clone()
}

/// One shared merge board and the clients synchronized through it.
///
/// Clients are configured with short timeouts and a small cycle interval so
/// scenarios converge in milliseconds.
pub struct TestHarness {
    board: Arc<MergeBoard>,
}

impl TestHarness {
    /// Create a harness around a fresh, empty board.
    pub fn new() -> Self {
        Self {
            board: Arc::new(MergeBoard::new()),
        }
    }

    /// The shared board, for seeding state or asserting on what clients
    /// transmitted.
    pub fn board(&self) -> &Arc<MergeBoard> {
        &self.board
    }

    /// Test-friendly worker configuration.
    pub fn config() -> SyncConfig {
        SyncConfig {
            request_timeout: Duration::from_secs(1),
            min_cycle_interval: Duration::from_millis(1),
            shutdown_timeout: Duration::from_secs(1),
        }
    }

    /// A client synchronized through the shared board.
    pub fn client(&self, filter: FilterSet) -> SyncedMap<MemoryAggregator> {
        SyncedMap::new(
            MemoryAggregator::new(Arc::clone(&self.board)),
            filter,
            Self::config(),
        )
    }

    /// A client whose first `failures` exchanges fail with a server error.
    pub fn flaky_client(&self, filter: FilterSet, failures: usize) -> SyncedMap<FlakyAggregator> {
        SyncedMap::new(
            FlakyAggregator::new(Arc::clone(&self.board), failures),
            filter,
            Self::config(),
        )
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregator that fails its first N exchanges with a 500, then delegates
/// to an in-process board.
pub struct FlakyAggregator {
    inner: MemoryAggregator,
    failures_left: AtomicUsize,
}

impl FlakyAggregator {
    /// Create over a shared board, failing the first `failures` exchanges.
    pub fn new(board: Arc<MergeBoard>, failures: usize) -> Self {
        Self {
            inner: MemoryAggregator::new(board),
            failures_left: AtomicUsize::new(failures),
        }
    }

    /// Exchanges still destined to fail.
    pub fn failures_left(&self) -> usize {
        self.failures_left.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Aggregator for FlakyAggregator {
    async fn exchange(&self, patch: Patch) -> Result<Snapshot> {
        let left = self.failures_left.load(Ordering::SeqCst);
        if left > 0 {
            self.failures_left.store(left - 1, Ordering::SeqCst);
            return Err(ClientError::Status(500));
        }
        self.inner.exchange(patch).await
    }
}

/// Aggregator whose exchanges never complete.
///
/// Stands in for a server that accepts the connection and then goes silent;
/// used to prove that shutdown does not wait on an in-flight exchange.
pub struct HangingAggregator;

#[async_trait]
impl Aggregator for HangingAggregator {
    async fn exchange(&self, _patch: Patch) -> Result<Snapshot> {
        std::future::pending().await
    }
}
