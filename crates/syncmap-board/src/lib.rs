//! # Syncmap Board
//!
//! The aggregator side of syncmap: a single global map that every client's
//! patches merge into, echoed back in full after each merge.
//!
//! ## Contract
//!
//! - [`MergeBoard::merge`] folds one partial update in per-identifier
//!   (last write wins, no versioning) and returns the complete merged map.
//! - There is no per-client isolation: every client's patch merges into the
//!   same namespace, and two clients updating the same identifier
//!   concurrently race with no coordination.
//! - [`MergeBoard::clear`] resets the board; [`MergeBoard::snapshot`] reads
//!   it without merging. Neither is part of the synchronization cycle;
//!   they exist for operators and tests.
//!
//! The board is an explicit store object with interior locking, reachable
//! only through these operations. Serving it over HTTP is a transport
//! concern and lives outside this crate.

pub mod board;

pub use board::MergeBoard;
