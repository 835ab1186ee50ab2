// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Pure diffing of incoming node data against the accepted state.

use std::collections::BTreeMap;

use propchange_core::{scalars_match, PropertyValue, Snapshot, PROPERTY_CHANGE_STATE};
use serde_json::Map;

/// Observed properties of `properties` that differ from the accepted state.
///
/// When the data carries a `propertyChangeState` entry, a property is changed
/// if the snapshot lacks it or holds a different value. Without that entry
/// every observed property present in the data counts as changed, even if its
/// value is the same as before.
pub fn changed_properties(observed: &[String], properties: &Map<String, PropertyValue>) -> Vec<String> {
    match properties.get(PROPERTY_CHANGE_STATE) {
        Some(raw) => {
            let accepted = Snapshot::from_property(Some(raw));
            observed
                .iter()
                .filter(|name| {
                    match (properties.get(name.as_str()), accepted.get(name)) {
                        (Some(current), Some(previous)) => !scalars_match(current, previous),
                        _ => true,
                    }
                })
                .cloned()
                .collect()
        }
        None => observed
            .iter()
            .filter(|name| properties.contains_key(name.as_str()))
            .cloned()
            .collect(),
    }
}

/// Dependent properties a binding must flag, in first-seen order.
///
/// Union over every changed property that is a key of `notify`.
pub fn notify_properties(changed: &[String], notify: &BTreeMap<String, Vec<String>>) -> Vec<String> {
    let mut out = Vec::new();
    for name in changed {
        if let Some(dependents) = notify.get(name) {
            union_into(&mut out, dependents);
        }
    }
    out
}

/// Append the items of `extra` that `target` does not hold yet.
pub(crate) fn union_into<'a>(target: &mut Vec<String>, extra: impl IntoIterator<Item = &'a String>) {
    for item in extra {
        if !target.contains(item) {
            target.push(item.clone());
        }
    }
}
