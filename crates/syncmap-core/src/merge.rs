//! The merge rule shared by clients and the aggregator.

use std::collections::BTreeMap;

use crate::types::{FieldMap, ParticipantId};

/// Per-identifier overwrite merge, last write wins.
///
/// Each incoming entry replaces the stored [`FieldMap`] under its identifier
/// wholesale. Fields are not merged individually, and identifiers absent
/// from `incoming` are left untouched; a merge never removes anything.
pub fn merge_overwrite(
    target: &mut BTreeMap<ParticipantId, FieldMap>,
    incoming: BTreeMap<ParticipantId, FieldMap>,
) {
    for (id, fields) in incoming {
        target.insert(id, fields);
    }
}
