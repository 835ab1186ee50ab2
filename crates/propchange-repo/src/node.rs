// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Node rows, live node handles and context paths.

use std::collections::BTreeMap;
use std::fmt;

use propchange_core::{PropertyValue, Snapshot, PROPERTY_CHANGE_STATE};
use serde::{Deserialize, Serialize};
use serde_json::Map;

/// Stored dimension values of a node row (`dimension -> allowed values`).
pub type DimensionValues = BTreeMap<String, Vec<String>>;

/// Composite node identifier: path, workspace and dimension context.
///
/// Rendered as `path@workspace` followed by `;dim=value&dim=value` when the
/// context carries dimensions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextPath(String);

impl ContextPath {
    /// Wrap an already rendered context path.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Render the context path of `path` in `workspace` under `dimensions`.
    pub fn build(path: &str, workspace: &str, dimensions: &BTreeMap<String, String>) -> Self {
        let mut raw = format!("{path}@{workspace}");
        if !dimensions.is_empty() {
            let pairs: Vec<String> = dimensions
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect();
            raw.push(';');
            raw.push_str(&pairs.join("&"));
        }
        Self(raw)
    }

    /// The rendered path.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContextPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persisted node row as returned by the storage query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRecord {
    /// Node identifier, shared by the node's workspace and dimension variants.
    pub identifier: String,
    /// Absolute node path.
    pub path: String,
    /// Node type name.
    pub node_type: String,
    /// Workspace the row lives in.
    pub workspace: String,
    /// Stored dimension values.
    #[serde(default)]
    pub dimension_values: DimensionValues,
    /// Set when the node was moved away from this row.
    #[serde(default)]
    pub moved_to: Option<String>,
    /// Tombstone flag.
    #[serde(default)]
    pub removed: bool,
    /// Property values.
    #[serde(default)]
    pub properties: Map<String, PropertyValue>,
}

impl NodeRecord {
    /// Key of this row among all variants of the node.
    pub fn row_key(&self) -> RowKey {
        RowKey {
            identifier: self.identifier.clone(),
            workspace: self.workspace.clone(),
            dimension_values: self.dimension_values.clone(),
        }
    }
}

/// Identity of one stored row.
///
/// A node identifier alone names every variant of the node; the workspace
/// and stored dimension values pick out a single row.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowKey {
    /// Node identifier.
    pub identifier: String,
    /// Workspace of the row.
    pub workspace: String,
    /// Stored dimension values of the row.
    pub dimension_values: DimensionValues,
}

/// Outcome of comparing a node's stored dimensions with its resolved context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionCheck {
    /// Every target dimension value is among the stored values.
    Matching,
    /// The node has no dimension values at all.
    Unset,
    /// Dimension values are present but do not cover the target context.
    Mismatched,
}

/// Live node handle materialized in a context matching its own row.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Node identifier.
    pub identifier: String,
    /// Key of the backing row; writes go to this row only.
    pub row: RowKey,
    /// Context path of the node in its resolved context.
    pub context_path: ContextPath,
    /// Absolute node path.
    pub path: String,
    /// Node type name.
    pub node_type: String,
    /// Dimension values stored on the row.
    pub dimension_values: DimensionValues,
    /// Target dimension values of the resolved context.
    pub target_dimensions: BTreeMap<String, String>,
    /// Property values.
    pub properties: Map<String, PropertyValue>,
}

impl Node {
    /// Whether the node has a value for `name`.
    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Current value of `name`.
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Decoded accepted-state snapshot; empty when missing or unreadable.
    pub fn accepted_state(&self) -> Snapshot {
        Snapshot::from_property(self.property(PROPERTY_CHANGE_STATE))
    }

    /// Compare stored dimension values against the resolved target context.
    pub fn dimension_check(&self) -> DimensionCheck {
        let matching = self.target_dimensions.iter().all(|(name, target)| {
            self.dimension_values
                .get(name)
                .is_some_and(|values| values.iter().any(|v| v == target))
        });
        if matching {
            DimensionCheck::Matching
        } else if self.dimension_values.is_empty() {
            DimensionCheck::Unset
        } else {
            DimensionCheck::Mismatched
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(stored: &[(&str, &[&str])], target: &[(&str, &str)]) -> Node {
        Node {
            identifier: "row-1".into(),
            row: RowKey::default(),
            context_path: ContextPath::new("/sites/demo@live"),
            path: "/sites/demo".into(),
            node_type: "Demo:Page".into(),
            dimension_values: stored
                .iter()
                .map(|(k, vs)| ((*k).to_owned(), vs.iter().map(|v| (*v).to_owned()).collect()))
                .collect(),
            target_dimensions: target
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
            properties: Map::new(),
        }
    }

    #[test]
    fn context_path_without_dimensions() {
        let path = ContextPath::build("/sites/demo/home", "live", &BTreeMap::new());
        assert_eq!(path.as_str(), "/sites/demo/home@live");
    }

    #[test]
    fn context_path_with_dimensions() {
        let dims = BTreeMap::from([
            ("language".to_owned(), "de".to_owned()),
            ("country".to_owned(), "at".to_owned()),
        ]);
        let path = ContextPath::build("/sites/demo", "user-admin", &dims);
        assert_eq!(path.to_string(), "/sites/demo@user-admin;country=at&language=de");
    }

    #[test]
    fn dimension_check_variants() {
        assert_eq!(node(&[], &[]).dimension_check(), DimensionCheck::Matching);
        assert_eq!(
            node(&[("language", &["en"][..])], &[("language", "en")]).dimension_check(),
            DimensionCheck::Matching
        );
        assert_eq!(
            node(&[], &[("language", "en")]).dimension_check(),
            DimensionCheck::Unset
        );
        assert_eq!(
            node(&[("language", &["fr"][..])], &[("language", "en")]).dimension_check(),
            DimensionCheck::Mismatched
        );
    }

    #[test]
    fn accepted_state_tolerates_garbage() {
        let mut n = node(&[], &[]);
        assert!(n.accepted_state().is_empty());
        n.properties
            .insert(PROPERTY_CHANGE_STATE.into(), json!("{broken"));
        assert!(n.accepted_state().is_empty());
        n.properties
            .insert(PROPERTY_CHANGE_STATE.into(), json!(r#"{"title":"A"}"#));
        assert_eq!(n.accepted_state().get("title"), Some(&json!("A")));
    }

    #[test]
    fn record_deserializes_with_defaults() {
        let record: NodeRecord = serde_json::from_value(json!({
            "identifier": "r1",
            "path": "/sites/demo",
            "nodeType": "Demo:Page",
            "workspace": "live"
        }))
        .unwrap();
        assert!(record.dimension_values.is_empty());
        assert!(record.moved_to.is_none());
        assert!(!record.removed);
        assert!(record.properties.is_empty());
    }
}
