// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Accepted-state snapshot codec.
//!
//! A snapshot maps property names to the last value an editor accepted. It is
//! persisted as a JSON object in a single text property on the node. Decoding
//! never fails: nodes created before the feature existed, hand-edited values and
//! future layouts all degrade to an empty snapshot.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::value::is_scalar;

/// Name of the node property that stores the encoded snapshot.
pub const PROPERTY_CHANGE_STATE: &str = "propertyChangeState";

/// Last-accepted scalar values keyed by property name.
///
/// Only scalars are ever stored; [`Snapshot::record`] refuses objects and
/// arrays, and [`Snapshot::decode`] drops them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    values: BTreeMap<String, Value>,
}

impl Snapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the raw text of a `propertyChangeState` property.
    ///
    /// `None`, blank text, malformed JSON and non-object JSON all yield an
    /// empty snapshot.
    pub fn decode(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::new();
        };
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => Self::from_map(map),
            Ok(other) => {
                debug!(kind = json_kind(&other), "accepted state is not an object; treating as empty");
                Self::new()
            }
            Err(err) => {
                debug!(%err, "accepted state is not valid JSON; treating as empty");
                Self::new()
            }
        }
    }

    /// Decode a snapshot from a property value of any shape.
    ///
    /// Only string values carry an encoded snapshot; anything else is empty.
    pub fn from_property(value: Option<&Value>) -> Self {
        Self::decode(value.and_then(Value::as_str))
    }

    fn from_map(map: Map<String, Value>) -> Self {
        let values = map
            .into_iter()
            .filter(|(_, value)| is_scalar(value))
            .collect();
        Self { values }
    }

    /// Encode as a JSON object. Readers must not rely on key order.
    pub fn encode(&self) -> String {
        let map: Map<String, Value> = self
            .values
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        Value::Object(map).to_string()
    }

    /// Store `value` as the accepted value of `name`.
    ///
    /// Returns `false` (and stores nothing) when `value` is not a scalar.
    pub fn record(&mut self, name: impl Into<String>, value: &Value) -> bool {
        if !is_scalar(value) {
            return false;
        }
        self.values.insert(name.into(), value.clone());
        true
    }

    /// Accepted value of `name`, if any.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Whether `name` has an accepted value.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of accepted properties.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` when nothing has been accepted.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate accepted values in property-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_and_blank_input_decode_empty() {
        assert!(Snapshot::decode(None).is_empty());
        assert!(Snapshot::decode(Some("")).is_empty());
        assert!(Snapshot::decode(Some("   ")).is_empty());
    }

    #[test]
    fn malformed_input_decodes_empty() {
        assert!(Snapshot::decode(Some("{\"title\":")).is_empty());
        assert!(Snapshot::decode(Some("not json")).is_empty());
    }

    #[test]
    fn non_object_json_decodes_empty() {
        // The UI historically defaulted to "[]".
        assert!(Snapshot::decode(Some("[]")).is_empty());
        assert!(Snapshot::decode(Some("\"title\"")).is_empty());
        assert!(Snapshot::decode(Some("42")).is_empty());
    }

    #[test]
    fn decode_keeps_scalars_and_drops_objects() {
        let snapshot = Snapshot::decode(Some(r#"{"title":"A","count":2,"image":{"id":"x"}}"#));
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get("title"), Some(&json!("A")));
        assert_eq!(snapshot.get("count"), Some(&json!(2)));
        assert!(!snapshot.contains("image"));
    }

    #[test]
    fn encode_produces_a_json_object() {
        let mut snapshot = Snapshot::new();
        snapshot.record("title", &json!("Hello"));
        snapshot.record("teaser", &json!(null));
        let encoded = snapshot.encode();
        let parsed: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(parsed, json!({"title": "Hello", "teaser": null}));
        assert_eq!(Snapshot::decode(Some(&encoded)), snapshot);
    }

    #[test]
    fn empty_snapshot_encodes_as_empty_object() {
        assert_eq!(Snapshot::new().encode(), "{}");
    }

    #[test]
    fn record_refuses_non_scalars() {
        let mut snapshot = Snapshot::new();
        assert!(!snapshot.record("image", &json!({"id": "x"})));
        assert!(!snapshot.record("tags", &json!(["a", "b"])));
        assert!(snapshot.is_empty());
        assert!(snapshot.record("title", &json!("A")));
        assert!(snapshot.record("title", &json!("B")));
        assert_eq!(snapshot.get("title"), Some(&json!("B")));
    }

    #[test]
    fn from_property_ignores_non_string_values() {
        assert!(Snapshot::from_property(Some(&json!({"title": "A"}))).is_empty());
        assert!(Snapshot::from_property(Some(&json!(null))).is_empty());
        let snapshot = Snapshot::from_property(Some(&json!(r#"{"title":"A"}"#)));
        assert_eq!(snapshot.get("title"), Some(&json!("A")));
    }
}
