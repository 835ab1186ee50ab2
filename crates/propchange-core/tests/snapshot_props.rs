// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Property tests for the accepted-state codec.

use proptest::prelude::*;
use propchange_core::{is_scalar, Snapshot};
use serde_json::{json, Value};

fn property_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<String>().prop_map(Value::String),
        any::<i64>().prop_map(|n| json!(n)),
        any::<bool>().prop_map(Value::Bool),
        Just(Value::Null),
        any::<String>().prop_map(|id| json!({ "__identifier": id })),
        prop::collection::vec(any::<String>(), 0..3).prop_map(|v| json!(v)),
    ]
}

proptest! {
    #[test]
    fn decode_never_panics(raw in any::<String>()) {
        let _ = Snapshot::decode(Some(&raw));
    }

    #[test]
    fn recorded_snapshots_never_hold_objects(
        entries in prop::collection::btree_map("[a-z]{1,8}", property_value(), 0..12)
    ) {
        let mut snapshot = Snapshot::new();
        for (name, value) in &entries {
            snapshot.record(name.clone(), value);
        }
        let decoded = Snapshot::decode(Some(&snapshot.encode()));
        for (name, value) in &entries {
            prop_assert_eq!(decoded.contains(name), is_scalar(value));
        }
        prop_assert_eq!(decoded, snapshot);
    }
}
