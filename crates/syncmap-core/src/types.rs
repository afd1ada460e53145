//! Type definitions for the syncmap data model.
//!
//! Identifiers are newtypes to prevent misuse at compile time; patches and
//! snapshots are thin wrappers over ordered maps so their JSON form is a
//! plain object with deterministic key order.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// A unique string naming one participant's state within the shared
/// dictionary.
///
/// Serializes transparently, so it appears as a plain JSON object key on the
/// wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Create a new participant identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ParticipantId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// The value stored under one participant: a mapping from field name to
/// scalar.
///
/// Numbers in the observed use, but deliberately kept JSON-shaped and opaque
/// so callers can store whatever their application needs.
pub type FieldMap = serde_json::Map<String, serde_json::Value>;

/// A partial update supplied to one `update` call.
///
/// Each patch is an opaque unit: it is never merged with other pending
/// patches on its way to the aggregator, only applied (per-identifier
/// overwrite) wherever it lands.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Patch {
    entries: BTreeMap<ParticipantId, FieldMap>,
}

impl Patch {
    /// Create an empty patch.
    ///
    /// An empty patch is a legal request meaning "no local changes this
    /// cycle, send me the current global state".
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a patch carrying a single participant's fields.
    pub fn single(id: impl Into<ParticipantId>, fields: FieldMap) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(id.into(), fields);
        Self { entries }
    }

    /// Add or replace one participant's fields, returning the patch.
    pub fn with(mut self, id: impl Into<ParticipantId>, fields: FieldMap) -> Self {
        self.entries.insert(id.into(), fields);
        self
    }

    /// Set one participant's fields in place.
    pub fn set(&mut self, id: impl Into<ParticipantId>, fields: FieldMap) {
        self.entries.insert(id.into(), fields);
    }

    /// Get the fields for one participant, if present.
    pub fn get(&self, id: &ParticipantId) -> Option<&FieldMap> {
        self.entries.get(id)
    }

    /// Check whether the patch carries no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of participants in the patch.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate over the patch entries in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantId, &FieldMap)> {
        self.entries.iter()
    }

    /// Consume the patch, yielding its entries.
    pub fn into_entries(self) -> BTreeMap<ParticipantId, FieldMap> {
        self.entries
    }
}

impl FromIterator<(ParticipantId, FieldMap)> for Patch {
    fn from_iter<I: IntoIterator<Item = (ParticipantId, FieldMap)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// The complete merged state returned by the aggregator in one response.
///
/// Always a full replacement view of remote-known state, never a delta.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    entries: BTreeMap<ParticipantId, FieldMap>,
}

impl Snapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a snapshot from a full set of entries.
    pub fn from_entries(entries: BTreeMap<ParticipantId, FieldMap>) -> Self {
        Self { entries }
    }

    /// Get the fields for one participant, if present.
    pub fn get(&self, id: &ParticipantId) -> Option<&FieldMap> {
        self.entries.get(id)
    }

    /// Check whether a participant is present.
    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.entries.contains_key(id)
    }

    /// Check whether the snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of participants in the snapshot.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate over the entries in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantId, &FieldMap)> {
        self.entries.iter()
    }

    /// Drop every identifier named in `filter`.
    ///
    /// Applied before a snapshot is folded into local state so that locally
    /// authoritative values are never overwritten by remote data.
    pub fn strip_filtered(&mut self, filter: &FilterSet) {
        self.entries.retain(|id, _| !filter.contains(id));
    }

    /// Consume the snapshot, yielding its entries.
    pub fn into_entries(self) -> BTreeMap<ParticipantId, FieldMap> {
        self.entries
    }
}

impl FromIterator<(ParticipantId, FieldMap)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (ParticipantId, FieldMap)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Identifiers whose values are locally authoritative and immune to remote
/// overwrite.
///
/// Fixed at construction of a synchronized dictionary; values under these
/// identifiers can only change through local updates.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    ids: HashSet<ParticipantId>,
}

impl FilterSet {
    /// Create an empty filter set (no identifiers protected).
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether an identifier is protected.
    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.ids.contains(id)
    }

    /// Check whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of protected identifiers.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Iterate over the protected identifiers.
    pub fn iter(&self) -> impl Iterator<Item = &ParticipantId> {
        self.ids.iter()
    }
}

impl<I: Into<ParticipantId>> FromIterator<I> for FilterSet {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}
