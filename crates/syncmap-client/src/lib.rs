//! # Syncmap Client
//!
//! The synchronization core: local state, the outbound patch channel, the
//! aggregator transport, and the background worker that ties them together.
//!
//! ## Data flow
//!
//! ```text
//! caller ──update──▶ LocalState (synchronous, immediate)
//!    │
//!    └─────────────▶ Outbox ──drain latest──▶ SyncWorker
//!                                                │ POST patch
//!                                                ▼
//!                                           Aggregator
//!                                                │ merged snapshot
//!                                                ▼
//! LocalState ◀──merge (FilterSet stripped)───────┘
//! ```
//!
//! The caller's `update`/`get` path never blocks on network I/O; the worker
//! is the only place a request is awaited, and every failure there is a
//! logged, skipped cycle rather than a dead loop.
//!
//! ## Transports
//!
//! [`HttpAggregator`] speaks the production wire protocol (`POST` a JSON
//! patch, receive the merged map). [`transport::memory::MemoryAggregator`]
//! keeps the exchange in-process over a shared
//! [`MergeBoard`](syncmap_board::MergeBoard) for tests and embedding.

pub mod config;
pub mod error;
pub mod http;
pub mod outbox;
pub mod state;
pub mod transport;
pub mod worker;

pub use config::SyncConfig;
pub use error::{ClientError, Result};
pub use http::HttpAggregator;
pub use outbox::{Outbox, OutboxReceiver};
pub use state::LocalState;
pub use transport::{memory::MemoryAggregator, Aggregator};
pub use worker::{SyncWorker, WorkerState};
