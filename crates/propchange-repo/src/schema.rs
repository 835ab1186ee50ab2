// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Node-type schema port and the observed-property rule.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Node-type option holding the property-change settings.
pub const OPTIONS_KEY: &str = "propertyChanges";

/// Key inside [`OPTIONS_KEY`] listing the observed properties.
pub const OPTIONS_PROPERTIES_KEY: &str = "properties";

/// Schema entry for one property of a node type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyDef {
    /// Declared property type (`string`, `integer`, `reference`, ...).
    #[serde(rename = "type", default)]
    pub ty: Option<String>,
    /// UI settings of the property.
    #[serde(default)]
    pub ui: PropertyUi,
}

/// UI part of a property definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyUi {
    /// Label (usually a translation id).
    #[serde(default)]
    pub label: Option<String>,
}

/// Node-type definition as supplied by the schema registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeTypeDef {
    /// Fully qualified type name.
    pub name: String,
    /// Abstract types have no instances of their own.
    #[serde(rename = "abstract", default)]
    pub is_abstract: bool,
    /// Direct super types.
    #[serde(default)]
    pub super_types: Vec<String>,
    /// Declared properties.
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyDef>,
    /// Free-form options.
    #[serde(default)]
    pub options: Map<String, Value>,
}

impl NodeTypeDef {
    /// Declared type of `property`, if any.
    pub fn property_type(&self, property: &str) -> Option<&str> {
        self.properties.get(property)?.ty.as_deref()
    }

    /// Names of the properties tracked for this type.
    ///
    /// `options.propertyChanges.properties` wins when present (an explicit
    /// empty list disables tracking). Otherwise every `string` property is
    /// observed.
    pub fn observed_properties(&self) -> Vec<String> {
        let configured = self
            .options
            .get(OPTIONS_KEY)
            .and_then(Value::as_object)
            .and_then(|opts| opts.get(OPTIONS_PROPERTIES_KEY));
        match configured {
            Some(Value::Array(names)) => names
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect(),
            Some(other) => {
                warn!(
                    node_type = %self.name,
                    value = %other,
                    "propertyChanges.properties must be a list; observing nothing"
                );
                Vec::new()
            }
            None => self
                .properties
                .keys()
                .filter(|name| self.property_type(name) == Some("string"))
                .cloned()
                .collect(),
        }
    }
}

/// Read access to the node-type schema.
pub trait NodeTypeRegistry {
    /// Look up a type by name.
    fn node_type(&self, name: &str) -> Option<&NodeTypeDef>;

    /// All registered types.
    fn node_types(&self) -> Vec<&NodeTypeDef>;

    /// Every type that inherits (transitively) from `name`, excluding `name`.
    ///
    /// Abstract descendants are left out unless `include_abstract` is set.
    fn sub_node_types(&self, name: &str, include_abstract: bool) -> Vec<&NodeTypeDef>;
}

/// In-memory schema built from a list of definitions.
#[derive(Debug, Clone, Default)]
pub struct NodeTypeSchema {
    types: BTreeMap<String, NodeTypeDef>,
}

impl NodeTypeSchema {
    /// Build a schema; later definitions replace earlier ones of the same name.
    pub fn new(types: impl IntoIterator<Item = NodeTypeDef>) -> Self {
        Self {
            types: types.into_iter().map(|t| (t.name.clone(), t)).collect(),
        }
    }

    fn inherits_from(&self, candidate: &NodeTypeDef, ancestor: &str) -> bool {
        let mut seen = BTreeSet::new();
        let mut pending: Vec<&str> = candidate.super_types.iter().map(String::as_str).collect();
        while let Some(name) = pending.pop() {
            if name == ancestor {
                return true;
            }
            if !seen.insert(name) {
                continue;
            }
            if let Some(parent) = self.types.get(name) {
                pending.extend(parent.super_types.iter().map(String::as_str));
            }
        }
        false
    }
}

impl NodeTypeRegistry for NodeTypeSchema {
    fn node_type(&self, name: &str) -> Option<&NodeTypeDef> {
        self.types.get(name)
    }

    fn node_types(&self) -> Vec<&NodeTypeDef> {
        self.types.values().collect()
    }

    fn sub_node_types(&self, name: &str, include_abstract: bool) -> Vec<&NodeTypeDef> {
        self.types
            .values()
            .filter(|t| t.name != name)
            .filter(|t| include_abstract || !t.is_abstract)
            .filter(|t| self.inherits_from(t, name))
            .collect()
    }
}
