//! Aggregator transport abstraction.
//!
//! The synchronization protocol has exactly one exchange: send a partial
//! update, receive the complete merged map. Implementations may carry it
//! over HTTP (production) or keep it in-process (tests, embedding).

use async_trait::async_trait;

use syncmap_core::{Patch, Snapshot};

use crate::error::Result;

/// Transport to the aggregator's merge endpoint.
///
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait Aggregator: Send + Sync {
    /// Send one patch and await the complete merged snapshot.
    ///
    /// The empty patch is a legal request meaning "no local changes, send
    /// the current global state".
    async fn exchange(&self, patch: Patch) -> Result<Snapshot>;
}

/// A simple in-process aggregator for testing.
///
/// Backed by a shared [`MergeBoard`](syncmap_board::MergeBoard), so several
/// clients handed handles to the same board synchronize against each other
/// without any network.
pub mod memory {
    use std::sync::Arc;

    use syncmap_board::MergeBoard;

    use super::*;

    /// In-process aggregator implementation.
    pub struct MemoryAggregator {
        board: Arc<MergeBoard>,
    }

    impl MemoryAggregator {
        /// Create an aggregator endpoint over a shared board.
        pub fn new(board: Arc<MergeBoard>) -> Self {
            Self { board }
        }

        /// The board this endpoint merges into.
        pub fn board(&self) -> &Arc<MergeBoard> {
            &self.board
        }
    }

    #[async_trait]
    impl Aggregator for MemoryAggregator {
        async fn exchange(&self, patch: Patch) -> Result<Snapshot> {
            Ok(self.board.merge(patch))
        }
    }
}
