//! # Syncmap Testkit
//!
//! Testing utilities for syncmap.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: an in-process harness wiring several clients to one
//!   shared merge board, plus fault-injecting aggregators for resilience
//!   and shutdown tests
//! - **Generators**: proptest strategies for identifiers, field maps, and
//!   patches
//!
//! ## Harness
//!
//! ```rust
//! use syncmap_testkit::fixtures::{fields, TestHarness};
//! use syncmap::Patch;
//! use serde_json::json;
//!
//! let harness = TestHarness::new();
//! let client = harness.client(["player-1"].into_iter().collect());
//! client.update(Patch::single("player-1", fields(json!({"x": 1}))));
//! ```
//!
//! ## Fault injection
//!
//! [`FlakyAggregator`] fails its first N exchanges and then behaves;
//! [`HangingAggregator`] never completes an exchange at all. Between them
//! they cover the two failure modes a worker has to survive: cycles that
//! error and cycles that would block forever.

pub mod fixtures;
pub mod generators;

pub use fixtures::{fields, FlakyAggregator, HangingAggregator, TestHarness};
pub use generators::{field_map, participant_id, patch};
