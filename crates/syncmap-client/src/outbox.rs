//! The outbound channel between the caller and the synchronization worker.
//!
//! Callers push one patch per `update`; the worker drains everything queued
//! each cycle and forwards only the most recent patch.

use syncmap_core::Patch;
use tokio::sync::mpsc;

/// Create a connected outbox pair.
pub fn channel() -> (Outbox, OutboxReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Outbox { tx }, OutboxReceiver { rx })
}

/// Producer half, held by the synchronized dictionary.
#[derive(Clone)]
pub struct Outbox {
    tx: mpsc::UnboundedSender<Patch>,
}

impl Outbox {
    /// Enqueue one patch for the worker.
    ///
    /// Never blocks. After the worker has exited the patch is silently
    /// dropped; the local state it came from has already been updated.
    pub fn push(&self, patch: Patch) {
        let _ = self.tx.send(patch);
    }
}

/// Consumer half, owned by the worker.
pub struct OutboxReceiver {
    rx: mpsc::UnboundedReceiver<Patch>,
}

impl OutboxReceiver {
    /// Remove everything currently queued and return only the most recent
    /// patch, or the empty patch if nothing was queued.
    ///
    /// Coalescing policy: send-latest-only. Earlier patches in the drain are
    /// discarded from the outbound payload (their effects are already in
    /// local state). Two updates with non-overlapping identifiers inside one
    /// cycle therefore transmit only the later one; a value dropped this way
    /// reaches the aggregator the next time its identifier is re-sent. This
    /// keeps the wire free of backlog when updates arrive faster than one
    /// round trip.
    pub fn drain_latest(&mut self) -> Patch {
        let mut latest = Patch::new();
        while let Ok(patch) = self.rx.try_recv() {
            latest = patch;
        }
        latest
    }
}
