//! # Syncmap Core
//!
//! Data model for the syncmap shared-state dictionary.
//!
//! ## Overview
//!
//! A syncmap dictionary maps [`ParticipantId`]s to opaque JSON-shaped
//! [`FieldMap`]s. Clients mutate their local copy with [`Patch`]es and
//! receive the aggregator's merged view back as [`Snapshot`]s. A
//! [`FilterSet`] names the identifiers a client owns; those are never
//! overwritten by remote data.
//!
//! ## Merge rule
//!
//! There is exactly one merge rule in the whole system, applied locally and
//! on the aggregator alike: per-identifier overwrite, last write wins. The
//! incoming entry replaces the stored [`FieldMap`] wholesale; fields are not
//! merged individually, and identifiers absent from the incoming set are
//! left untouched. See [`merge::merge_overwrite`].
//!
//! ## Wire shape
//!
//! [`Patch`] and [`Snapshot`] both serialize as a plain JSON object:
//!
//! ```json
//! {"player-1": {"center_x": 120, "center_y": 80}}
//! ```
//!
//! The empty object `{}` is a legal patch and means "no local changes".

pub mod merge;
pub mod types;

pub use merge::merge_overwrite;
pub use types::{FieldMap, FilterSet, ParticipantId, Patch, Snapshot};
