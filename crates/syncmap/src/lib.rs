//! # Syncmap
//!
//! A shared-state dictionary synchronized across processes through a
//! central merge-and-echo aggregator.
//!
//! ## Overview
//!
//! Each process holds a [`SyncedMap`]: a local key→value map it mutates and
//! reads synchronously, while a background worker ships local patches to
//! the aggregator and folds the merged global view back in. Identifiers
//! named in the [`FilterSet`] are locally authoritative: remote data never
//! overwrites them.
//!
//! ## Key properties
//!
//! - **Local echo**: an `update` is visible to `get` before the call
//!   returns, independent of network state.
//! - **Authority protection**: filtered identifiers only ever change
//!   through local updates.
//! - **Self-healing**: transport and protocol failures cost one cycle of
//!   staleness, never the synchronization loop.
//! - **Coalescing**: when updates outpace the round trip, only the most
//!   recent pending patch is transmitted each cycle.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use syncmap::{FilterSet, Patch, SyncConfig, SyncedMap};
//!
//! #[tokio::main]
//! async fn main() -> syncmap::Result<()> {
//!     let identifier = "player-1";
//!     let filter: FilterSet = [identifier].into_iter().collect();
//!
//!     let status = SyncedMap::over_http(
//!         "http://localhost:5000/update",
//!         filter,
//!         SyncConfig::default(),
//!     )?;
//!     status.start();
//!
//!     let mut fields = syncmap::FieldMap::new();
//!     fields.insert("center_x".into(), 120.into());
//!     status.update(Patch::single(identifier, fields));
//!
//!     // ... render loop reads status.get(..) / status.all() ...
//!
//!     status.stop().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `syncmap::core` - Data model (Patch, Snapshot, FilterSet, ...)
//! - `syncmap::board` - The aggregator's merge board
//! - `syncmap::client` - Synchronization internals (worker, transports)

pub mod synced_map;

// Re-export component crates
pub use syncmap_board as board;
pub use syncmap_client as client;
pub use syncmap_core as core;

// Re-export main types for convenience
pub use synced_map::SyncedMap;

pub use syncmap_board::MergeBoard;
pub use syncmap_client::{
    Aggregator, ClientError, HttpAggregator, MemoryAggregator, Result, SyncConfig, WorkerState,
};
pub use syncmap_core::{FieldMap, FilterSet, ParticipantId, Patch, Snapshot};
