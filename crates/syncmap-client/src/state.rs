//! The caller-facing local state map.
//!
//! Mutated by the owning thread through patches and by the worker thread
//! through snapshots, so every access goes through one explicit RwLock.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use syncmap_core::{merge_overwrite, FieldMap, FilterSet, ParticipantId, Patch, Snapshot};

/// The authoritative in-process map, shared between the caller and the
/// synchronization worker.
///
/// Cloning is cheap and yields a handle to the same underlying map. Local
/// reads always see the effects of prior local writes immediately,
/// independent of any in-flight network activity.
#[derive(Clone, Default)]
pub struct LocalState {
    inner: Arc<RwLock<BTreeMap<ParticipantId, FieldMap>>>,
}

impl LocalState {
    /// Create a new empty state map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one local patch, per-identifier overwrite.
    ///
    /// Takes effect before this call returns: a subsequent [`get`] for any
    /// identifier in the patch reflects the patch's value.
    ///
    /// [`get`]: LocalState::get
    pub fn apply_patch(&self, patch: &Patch) {
        let mut inner = self.inner.write().unwrap();
        merge_overwrite(&mut inner, patch.clone().into_entries());
    }

    /// Fold a remote snapshot in, skipping every identifier in `filter`.
    ///
    /// Filtered identifiers are the caller's own authoritative data; they
    /// can only change through [`apply_patch`]. Identifiers absent from the
    /// snapshot are left as they are.
    ///
    /// [`apply_patch`]: LocalState::apply_patch
    pub fn merge_snapshot(&self, mut snapshot: Snapshot, filter: &FilterSet) {
        snapshot.strip_filtered(filter);
        let mut inner = self.inner.write().unwrap();
        merge_overwrite(&mut inner, snapshot.into_entries());
    }

    /// Get one participant's fields, or `None` if the identifier is unset.
    pub fn get(&self, id: &ParticipantId) -> Option<FieldMap> {
        self.inner.read().unwrap().get(id).cloned()
    }

    /// Get one participant's fields, or a caller-supplied default.
    pub fn get_or(&self, id: &ParticipantId, default: FieldMap) -> FieldMap {
        self.get(id).unwrap_or(default)
    }

    /// Snapshot the entire current state for enumeration.
    pub fn all(&self) -> BTreeMap<ParticipantId, FieldMap> {
        self.inner.read().unwrap().clone()
    }

    /// Number of known participants.
    pub fn len(&self) -> usize {
        self.inner.read().unwrap().len()
    }

    /// Check whether no participants are known yet.
    pub fn is_empty(&self) -> bool {
        self.inner.read().unwrap().is_empty()
    }
}
