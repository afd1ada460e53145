//! The synchronized dictionary: local map, background sync, lifecycle.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use syncmap_client::{
    outbox, Aggregator, HttpAggregator, LocalState, Outbox, OutboxReceiver, Result, SyncConfig,
    SyncWorker, WorkerState,
};
use syncmap_core::{FieldMap, FilterSet, ParticipantId, Patch};

/// A local key→value map kept in sync with a central aggregator.
///
/// The owning process mutates and reads it synchronously; one background
/// worker per instance ships local patches out and folds the aggregator's
/// merged view back in. Identifiers in the [`FilterSet`] are never
/// overwritten by remote data.
///
/// `update` and the read methods never block on network I/O; degraded
/// connectivity shows up only as stale remote-derived entries.
pub struct SyncedMap<A: Aggregator + 'static> {
    state: LocalState,
    filter: FilterSet,
    outbox: Outbox,
    aggregator: Arc<A>,
    config: SyncConfig,
    runner: Mutex<Runner>,
}

/// The worker slot. Holds the outbox consumer until the worker takes it;
/// there is at most one worker over an instance's lifetime.
enum Runner {
    Idle { outbox_rx: OutboxReceiver },
    Running {
        shutdown: watch::Sender<bool>,
        status: watch::Receiver<WorkerState>,
        handle: JoinHandle<()>,
    },
    Stopped,
}

impl SyncedMap<HttpAggregator> {
    /// Synchronize against a remote aggregator's merge endpoint.
    pub fn over_http(url: impl AsRef<str>, filter: FilterSet, config: SyncConfig) -> Result<Self> {
        let aggregator = HttpAggregator::new(url, config.request_timeout)?;
        Ok(Self::new(aggregator, filter, config))
    }
}

impl<A: Aggregator + 'static> SyncedMap<A> {
    /// Create a synchronized dictionary over any transport.
    ///
    /// Identifiers in `filter` are this caller's own authoritative data;
    /// values from the aggregator for them are ignored. Both are fixed for
    /// the instance's lifetime.
    pub fn new(aggregator: A, filter: FilterSet, config: SyncConfig) -> Self {
        let (outbox, outbox_rx) = outbox::channel();
        Self {
            state: LocalState::new(),
            filter,
            outbox,
            aggregator: Arc::new(aggregator),
            config,
            runner: Mutex::new(Runner::Idle { outbox_rx }),
        }
    }

    /// Start the background worker. Idempotent: a second call while running
    /// is a no-op.
    ///
    /// Must be called from within a tokio runtime. Once stopped, an
    /// instance stays stopped; a later `start` logs a warning and does
    /// nothing.
    pub fn start(&self) {
        let mut runner = self.runner.lock().unwrap();
        match &*runner {
            Runner::Running { .. } => return,
            Runner::Stopped => {
                warn!("start called after stop; synchronization stays stopped");
                return;
            }
            Runner::Idle { .. } => {}
        }

        let Runner::Idle { outbox_rx } = std::mem::replace(&mut *runner, Runner::Stopped) else {
            unreachable!("runner checked to be idle above");
        };

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (status_tx, status_rx) = watch::channel(WorkerState::Idle);
        let worker = SyncWorker::new(
            self.state.clone(),
            self.filter.clone(),
            outbox_rx,
            Arc::clone(&self.aggregator),
            self.config.clone(),
            shutdown_rx,
            status_tx,
        );

        let handle = tokio::spawn(worker.run());
        info!("synchronization started");
        *runner = Runner::Running {
            shutdown: shutdown_tx,
            status: status_rx,
            handle,
        };
    }

    /// Signal the worker to exit and wait for it, bounded by the configured
    /// shutdown timeout.
    ///
    /// The worker drops any in-flight exchange rather than waiting it out;
    /// if it still fails to exit in time it is aborted. A call while not
    /// running is a no-op.
    pub async fn stop(&self) {
        let (shutdown, handle) = {
            let mut runner = self.runner.lock().unwrap();
            match &*runner {
                Runner::Running { .. } => {}
                _ => return,
            }
            let Runner::Running {
                shutdown, handle, ..
            } = std::mem::replace(&mut *runner, Runner::Stopped)
            else {
                unreachable!("runner checked to be running above");
            };
            (shutdown, handle)
        };

        let _ = shutdown.send(true);
        let mut handle = handle;
        match tokio::time::timeout(self.config.shutdown_timeout, &mut handle).await {
            Ok(_) => info!("synchronization stopped"),
            Err(_) => {
                warn!(
                    timeout = ?self.config.shutdown_timeout,
                    "worker did not exit in time, aborting"
                );
                handle.abort();
                let _ = handle.await;
            }
        }
    }

    /// Current lifecycle state of the worker.
    pub fn worker_state(&self) -> WorkerState {
        match &*self.runner.lock().unwrap() {
            Runner::Idle { .. } => WorkerState::Idle,
            Runner::Running { status, .. } => *status.borrow(),
            Runner::Stopped => WorkerState::Stopped,
        }
    }

    /// Merge `patch` into local state and queue it for the aggregator.
    ///
    /// Takes effect locally before this call returns; transmission happens
    /// on the worker's next cycle, and only the most recent pending patch
    /// is transmitted (see the outbox's coalescing policy).
    pub fn update(&self, patch: Patch) {
        self.state.apply_patch(&patch);
        self.outbox.push(patch);
    }

    /// Get one participant's fields, or `None` if the identifier is unset.
    pub fn get(&self, id: &ParticipantId) -> Option<FieldMap> {
        self.state.get(id)
    }

    /// Get one participant's fields, or a caller-supplied default.
    pub fn get_or(&self, id: &ParticipantId, default: FieldMap) -> FieldMap {
        self.state.get_or(id, default)
    }

    /// Snapshot the entire current state, e.g. to enumerate all known
    /// participants.
    pub fn all(&self) -> BTreeMap<ParticipantId, FieldMap> {
        self.state.all()
    }

    /// The identifiers protected from remote overwrite.
    pub fn filter(&self) -> &FilterSet {
        &self.filter
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use syncmap_board::MergeBoard;
    use syncmap_client::MemoryAggregator;

    use super::*;

    fn fields(value: serde_json::Value) -> FieldMap {
        value.as_object().expect("object literal").clone()
    }

    fn in_process_map() -> SyncedMap<MemoryAggregator> {
        let board = Arc::new(MergeBoard::new());
        SyncedMap::new(
            MemoryAggregator::new(board),
            FilterSet::new(),
            SyncConfig::default(),
        )
    }

    #[test]
    fn test_update_is_visible_before_any_sync() {
        let map = in_process_map();
        map.update(Patch::single("a", fields(json!({"x": 5}))));
        assert_eq!(map.get(&"a".into()), Some(fields(json!({"x": 5}))));
    }

    #[test]
    fn test_get_or_for_unset_identifier() {
        let map = in_process_map();
        let default = fields(json!({}));
        assert_eq!(map.get(&"missing".into()), None);
        assert_eq!(map.get_or(&"missing".into(), default.clone()), default);
    }

    #[tokio::test]
    async fn test_start_is_idempotent() {
        let map = in_process_map();
        map.start();
        map.start();
        map.stop().await;
        assert_eq!(map.worker_state(), WorkerState::Stopped);
    }

    #[tokio::test]
    async fn test_stop_without_start_is_a_noop() {
        let map = in_process_map();
        map.stop().await;
        assert_eq!(map.worker_state(), WorkerState::Idle);
    }

    #[tokio::test]
    async fn test_start_after_stop_stays_stopped() {
        let map = in_process_map();
        map.start();
        map.stop().await;
        map.start();
        assert_eq!(map.worker_state(), WorkerState::Stopped);
    }
}
