//! Proptest strategies for syncmap values.

use proptest::prelude::*;

use syncmap_core::{FieldMap, ParticipantId, Patch};

/// Strategy for participant identifiers.
pub fn participant_id() -> impl Strategy<Value = ParticipantId> {
    "[a-z][a-z0-9-]{0,11}".prop_map(ParticipantId::from)
}

/// Strategy for field maps: up to four numeric fields.
pub fn field_map() -> impl Strategy<Value = FieldMap> {
    prop::collection::vec(("[a-z_]{1,10}", -10_000i64..10_000), 0..4).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(name, value)| (name, serde_json::Value::from(value)))
            .collect()
    })
}

/// Strategy for patches: up to four participants.
pub fn patch() -> impl Strategy<Value = Patch> {
    prop::collection::btree_map(participant_id(), field_map(), 0..4)
        .prop_map(|entries| entries.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn generated_patches_roundtrip_as_json(patch in patch()) {
            let encoded = serde_json::to_string(&patch).unwrap();
            let decoded: Patch = serde_json::from_str(&encoded).unwrap();
            prop_assert_eq!(patch, decoded);
        }
    }
}
