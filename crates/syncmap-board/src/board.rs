//! The global merge board.

use std::collections::BTreeMap;
use std::sync::RwLock;

use syncmap_core::{merge_overwrite, FieldMap, ParticipantId, Patch, Snapshot};

/// The aggregator's global map, shared by all connected clients.
///
/// Thread-safe via an interior RwLock; merges take the write lock, reads the
/// read lock. All data is lost when the board is dropped; the aggregator is
/// deliberately stateless across restarts.
pub struct MergeBoard {
    inner: RwLock<BTreeMap<ParticipantId, FieldMap>>,
}

impl MergeBoard {
    /// Create a new empty board.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(BTreeMap::new()),
        }
    }

    /// Merge one partial update and echo back the complete merged map.
    ///
    /// This is the whole synchronization contract: per-identifier overwrite,
    /// last write wins, then a full snapshot in response. An empty patch
    /// merges nothing and simply returns the current state.
    pub fn merge(&self, patch: Patch) -> Snapshot {
        let mut inner = self.inner.write().unwrap();
        merge_overwrite(&mut inner, patch.into_entries());
        Snapshot::from_entries(inner.clone())
    }

    /// Read the current state without merging anything.
    pub fn snapshot(&self) -> Snapshot {
        let inner = self.inner.read().unwrap();
        Snapshot::from_entries(inner.clone())
    }

    /// Reset the board to empty.
    pub fn clear(&self) {
        let mut inner = self.inner.write().unwrap();
        inner.clear();
    }

    /// Number of participants currently on the board.
    pub fn len(&self) -> usize {
        self.inner.read().unwrap().len()
    }

    /// Check whether the board is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.read().unwrap().is_empty()
    }
}

impl Default for MergeBoard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    fn fields(value: serde_json::Value) -> FieldMap {
        value.as_object().expect("object literal").clone()
    }

    #[test]
    fn test_merge_echoes_full_state() {
        let board = MergeBoard::new();
        board.merge(Patch::single("a", fields(json!({"x": 1}))));

        let echoed = board.merge(Patch::single("b", fields(json!({"y": 2}))));
        assert_eq!(echoed.len(), 2);
        assert_eq!(echoed.get(&"a".into()), Some(&fields(json!({"x": 1}))));
        assert_eq!(echoed.get(&"b".into()), Some(&fields(json!({"y": 2}))));
    }

    #[test]
    fn test_empty_patch_returns_current_state() {
        let board = MergeBoard::new();
        board.merge(Patch::single("a", fields(json!({"x": 1}))));

        let echoed = board.merge(Patch::new());
        assert_eq!(echoed.len(), 1);
    }

    #[test]
    fn test_last_write_wins_per_identifier() {
        let board = MergeBoard::new();
        board.merge(Patch::single("a", fields(json!({"x": 1, "y": 2}))));
        board.merge(Patch::single("a", fields(json!({"x": 9}))));

        let snapshot = board.snapshot();
        assert_eq!(snapshot.get(&"a".into()), Some(&fields(json!({"x": 9}))));
    }

    #[test]
    fn test_clear_empties_the_board() {
        let board = MergeBoard::new();
        board.merge(Patch::single("a", fields(json!({"x": 1}))));
        board.clear();
        assert!(board.is_empty());
        assert!(board.snapshot().is_empty());
    }

    #[test]
    fn test_concurrent_merges_all_land() {
        let board = Arc::new(MergeBoard::new());

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let board = Arc::clone(&board);
                std::thread::spawn(move || {
                    for round in 0..50 {
                        board.merge(Patch::single(
                            format!("client-{i}"),
                            fields(json!({"round": round})),
                        ));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = board.snapshot();
        assert_eq!(snapshot.len(), 8);
        for i in 0..8 {
            let id = ParticipantId::from(format!("client-{i}"));
            assert_eq!(snapshot.get(&id), Some(&fields(json!({"round": 49}))));
        }
    }
}
