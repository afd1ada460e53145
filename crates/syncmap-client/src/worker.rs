//! The background synchronization worker.
//!
//! One worker per synchronized dictionary. Each cycle it drains the outbox
//! down to the most recent patch, exchanges it with the aggregator, and
//! folds the filtered snapshot back into local state. The loop is
//! self-healing: no transport or protocol failure terminates it.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use syncmap_core::FilterSet;

use crate::config::SyncConfig;
use crate::error::ClientError;
use crate::outbox::OutboxReceiver;
use crate::state::LocalState;
use crate::transport::Aggregator;

/// Lifecycle states of the synchronization worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Constructed, not yet started.
    Idle,
    /// The loop is executing cycles.
    Running,
    /// Shutdown observed; winding down.
    Stopping,
    /// The loop has fully exited.
    Stopped,
}

/// The synchronization loop and everything it touches.
pub struct SyncWorker<A: Aggregator> {
    state: LocalState,
    filter: FilterSet,
    outbox: OutboxReceiver,
    aggregator: Arc<A>,
    config: SyncConfig,
    shutdown: watch::Receiver<bool>,
    status: watch::Sender<WorkerState>,
}

impl<A: Aggregator> SyncWorker<A> {
    /// Assemble a worker from its parts.
    ///
    /// `shutdown` flips to `true` exactly once to request exit; `status`
    /// publishes the lifecycle state for observers.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        state: LocalState,
        filter: FilterSet,
        outbox: OutboxReceiver,
        aggregator: Arc<A>,
        config: SyncConfig,
        shutdown: watch::Receiver<bool>,
        status: watch::Sender<WorkerState>,
    ) -> Self {
        Self {
            state,
            filter,
            outbox,
            aggregator,
            config,
            shutdown,
            status,
        }
    }

    /// Run cycles until the shutdown signal fires.
    ///
    /// A shutdown observed mid-exchange drops the in-flight request rather
    /// than waiting it out, so callers blocked on the worker's exit are
    /// never held up by an unresponsive aggregator.
    pub async fn run(mut self) {
        let _ = self.status.send(WorkerState::Running);
        info!("sync worker running");

        let mut shutdown = self.shutdown.clone();
        loop {
            if *shutdown.borrow() {
                break;
            }

            let interrupted = tokio::select! {
                _ = self.cycle() => false,
                _ = shutdown.changed() => true,
            };
            if interrupted {
                let _ = self.status.send(WorkerState::Stopping);
                debug!("shutdown requested, dropping in-flight exchange");
                break;
            }

            if self.config.min_cycle_interval.is_zero() {
                // An immediately-ready transport would otherwise starve the
                // runtime between cycles.
                tokio::task::yield_now().await;
            } else {
                tokio::select! {
                    _ = tokio::time::sleep(self.config.min_cycle_interval) => {}
                    // Fires on the shutdown signal and when the handle side
                    // has been dropped entirely; both end the loop.
                    _ = shutdown.changed() => break,
                }
            }
        }

        let _ = self.status.send(WorkerState::Stopped);
        info!("sync worker stopped");
    }

    /// Perform one synchronization cycle: drain, exchange, filter, merge.
    ///
    /// Driven continuously by [`run`]; public so a caller can pace cycles
    /// itself instead of spawning the loop. Every failure is logged and
    /// swallowed: the next cycle re-derives a fresh patch from whatever has
    /// been enqueued since, so a bad cycle costs staleness, never the loop.
    ///
    /// [`run`]: SyncWorker::run
    pub async fn cycle(&mut self) {
        let patch = self.outbox.drain_latest();
        let sent = patch.len();

        let result = match tokio::time::timeout(
            self.config.request_timeout,
            self.aggregator.exchange(patch),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(ClientError::Timeout(self.config.request_timeout)),
        };

        match result {
            Ok(snapshot) => {
                let received = snapshot.len();
                self.state.merge_snapshot(snapshot, &self.filter);
                debug!(sent, received, "cycle merged");
            }
            Err(error) => {
                warn!(error = %error, "sync cycle failed, skipping merge");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::json;
    use syncmap_board::MergeBoard;
    use syncmap_core::{FieldMap, Patch, Snapshot};

    use crate::error::Result;
    use crate::outbox::{self, Outbox};
    use crate::transport::memory::MemoryAggregator;

    use super::*;

    fn fields(value: serde_json::Value) -> FieldMap {
        value.as_object().expect("object literal").clone()
    }

    struct Plumbing {
        outbox: Outbox,
        state: LocalState,
        shutdown: watch::Sender<bool>,
        status: watch::Receiver<WorkerState>,
    }

    fn worker_over<A: Aggregator>(aggregator: A, filter: FilterSet) -> (SyncWorker<A>, Plumbing) {
        let (outbox, outbox_rx) = outbox::channel();
        let state = LocalState::new();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (status_tx, status_rx) = watch::channel(WorkerState::Idle);

        let worker = SyncWorker::new(
            state.clone(),
            filter,
            outbox_rx,
            Arc::new(aggregator),
            SyncConfig::default(),
            shutdown_rx,
            status_tx,
        );
        let plumbing = Plumbing {
            outbox,
            state,
            shutdown: shutdown_tx,
            status: status_rx,
        };
        (worker, plumbing)
    }

    #[tokio::test]
    async fn test_burst_coalesces_to_latest_patch() {
        let board = Arc::new(MergeBoard::new());
        let (mut worker, plumbing) =
            worker_over(MemoryAggregator::new(Arc::clone(&board)), FilterSet::new());

        plumbing.outbox.push(Patch::single("a", fields(json!({"x": 1}))));
        plumbing.outbox.push(Patch::single("b", fields(json!({"y": 2}))));
        worker.cycle().await;

        // Only the later patch went out; "a" never reached the aggregator.
        let remote = board.snapshot();
        assert!(remote.get(&"a".into()).is_none());
        assert_eq!(remote.get(&"b".into()), Some(&fields(json!({"y": 2}))));
    }

    #[tokio::test]
    async fn test_empty_cycle_still_pulls_remote_state() {
        let board = Arc::new(MergeBoard::new());
        board.merge(Patch::single("remote", fields(json!({"x": 7}))));

        let (mut worker, plumbing) =
            worker_over(MemoryAggregator::new(Arc::clone(&board)), FilterSet::new());
        worker.cycle().await;

        assert_eq!(
            plumbing.state.get(&"remote".into()),
            Some(fields(json!({"x": 7})))
        );
        assert_eq!(board.len(), 1);
    }

    #[tokio::test]
    async fn test_filtered_ids_survive_remote_overwrite() {
        let board = Arc::new(MergeBoard::new());
        board.merge(Patch::single("mine", fields(json!({"x": 999}))));
        board.merge(Patch::single("theirs", fields(json!({"y": 1}))));

        let filter: FilterSet = ["mine"].into_iter().collect();
        let (mut worker, plumbing) = worker_over(MemoryAggregator::new(Arc::clone(&board)), filter);

        plumbing
            .state
            .apply_patch(&Patch::single("mine", fields(json!({"x": 5}))));
        worker.cycle().await;

        assert_eq!(plumbing.state.get(&"mine".into()), Some(fields(json!({"x": 5}))));
        assert_eq!(plumbing.state.get(&"theirs".into()), Some(fields(json!({"y": 1}))));
    }

    struct FlakyAggregator {
        inner: MemoryAggregator,
        failures_left: AtomicUsize,
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

    #[tokio::test]
    async fn test_failures_skip_merge_but_never_poison_the_loop() {
        let board = Arc::new(MergeBoard::new());
        let flaky = FlakyAggregator {
            inner: MemoryAggregator::new(Arc::clone(&board)),
            failures_left: AtomicUsize::new(2),
        };
        let (mut worker, plumbing) = worker_over(flaky, FilterSet::new());

        plumbing.state.apply_patch(&Patch::single("a", fields(json!({"x": 1}))));
        plumbing.outbox.push(Patch::single("a", fields(json!({"x": 1}))));

        // Two failed cycles: nothing reaches the board, local state intact.
        worker.cycle().await;
        worker.cycle().await;
        assert!(board.is_empty());
        assert_eq!(plumbing.state.get(&"a".into()), Some(fields(json!({"x": 1}))));

        // Recovery: the next enqueued patch goes through on the next cycle.
        plumbing.outbox.push(Patch::single("a", fields(json!({"x": 2}))));
        worker.cycle().await;
        assert_eq!(
            board.snapshot().get(&"a".into()),
            Some(&fields(json!({"x": 2})))
        );
        assert_eq!(plumbing.state.get(&"a".into()), Some(fields(json!({"x": 2}))));
    }

    #[tokio::test]
    async fn test_run_reports_lifecycle_states() {
        let board = Arc::new(MergeBoard::new());
        let (worker, mut plumbing) =
            worker_over(MemoryAggregator::new(board), FilterSet::new());

        assert_eq!(*plumbing.status.borrow(), WorkerState::Idle);
        let handle = tokio::spawn(worker.run());

        plumbing
            .status
            .wait_for(|s| *s == WorkerState::Running)
            .await
            .unwrap();

        plumbing.shutdown.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("worker exits after shutdown")
            .unwrap();
        assert_eq!(*plumbing.status.borrow(), WorkerState::Stopped);
    }

    struct HangingAggregator;

    #[async_trait]
    impl Aggregator for HangingAggregator {
        async fn exchange(&self, _patch: Patch) -> Result<Snapshot> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_shutdown_interrupts_hanging_exchange() {
        let (worker, mut plumbing) = worker_over(HangingAggregator, FilterSet::new());
        let handle = tokio::spawn(worker.run());

        plumbing
            .status
            .wait_for(|s| *s == WorkerState::Running)
            .await
            .unwrap();
        plumbing.shutdown.send(true).unwrap();

        // The request timeout is 10s; a prompt exit proves the shutdown
        // signal, not the timeout, unblocked the worker.
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("shutdown cancels the in-flight exchange")
            .unwrap();
        assert_eq!(*plumbing.status.borrow(), WorkerState::Stopped);
    }
}
