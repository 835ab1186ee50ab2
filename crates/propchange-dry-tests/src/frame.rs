// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Fake content-frame elements.

use std::collections::{BTreeMap, HashMap};

use propchange_ui::marker::{
    ATTR_BASE_URI, ATTR_CHANGED, ATTR_CONTEXT_PATH, ATTR_FOCUS, ATTR_NODE_TYPE, ATTR_NOTIFY, ATTR_OBSERVE,
};
use propchange_ui::{ElementId, MarkerElement};

/// Frame element backed by an attribute map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FakeElement {
    /// Element handle.
    pub id: u64,
    /// Raw attributes.
    pub attributes: HashMap<String, String>,
}

impl FakeElement {
    /// Element `id` without attributes.
    pub fn new(id: u64) -> Self {
        Self {
            id,
            attributes: HashMap::new(),
        }
    }

    /// Set attribute `name` to `value`.
    #[must_use]
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_owned(), value.to_owned());
        self
    }
}

impl MarkerElement for FakeElement {
    fn id(&self) -> ElementId {
        ElementId(self.id)
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.get(name).cloned()
    }
}

/// Builder for a fully marked [`FakeElement`].
///
/// # Example
///
/// ```
/// use propchange_dry_tests::MarkerBuilder;
/// use propchange_ui::Marker;
///
/// let element = MarkerBuilder::new(1, "/sites/demo@live", "Demo:Page")
///     .observe(&["title"])
///     .build();
/// let marker = Marker::parse(&element).unwrap();
/// assert_eq!(marker.observed, vec!["title"]);
/// ```
#[derive(Debug, Clone)]
pub struct MarkerBuilder {
    id: u64,
    context_path: String,
    node_type: String,
    observed: Vec<String>,
    changed: Vec<String>,
    notify: BTreeMap<String, Vec<String>>,
    focus: bool,
    base_uri: Option<String>,
}

impl MarkerBuilder {
    /// Marker of element `id` for the node at `context_path`.
    pub fn new(id: u64, context_path: &str, node_type: &str) -> Self {
        Self {
            id,
            context_path: context_path.to_owned(),
            node_type: node_type.to_owned(),
            observed: Vec::new(),
            changed: Vec::new(),
            notify: BTreeMap::new(),
            focus: false,
            base_uri: None,
        }
    }

    /// Observed properties.
    #[must_use]
    pub fn observe(mut self, properties: &[&str]) -> Self {
        self.observed = properties.iter().map(|p| (*p).to_owned()).collect();
        self
    }

    /// Properties already changed at render time.
    #[must_use]
    pub fn changed(mut self, properties: &[&str]) -> Self {
        self.changed = properties.iter().map(|p| (*p).to_owned()).collect();
        self
    }

    /// Flag `dependents` whenever `property` changes.
    #[must_use]
    pub fn notify(mut self, property: &str, dependents: &[&str]) -> Self {
        self.notify.insert(
            property.to_owned(),
            dependents.iter().map(|p| (*p).to_owned()).collect(),
        );
        self
    }

    /// Mark the element as focus target.
    #[must_use]
    pub fn focus(mut self) -> Self {
        self.focus = true;
        self
    }

    /// Accept endpoint.
    #[must_use]
    pub fn base_uri(mut self, uri: &str) -> Self {
        self.base_uri = Some(uri.to_owned());
        self
    }

    /// Render the attributes.
    pub fn build(self) -> FakeElement {
        let mut element = FakeElement::new(self.id)
            .with_attribute(ATTR_OBSERVE, &json_list(&self.observed))
            .with_attribute(ATTR_CHANGED, &json_list(&self.changed))
            .with_attribute(ATTR_CONTEXT_PATH, &self.context_path)
            .with_attribute(ATTR_NODE_TYPE, &self.node_type);
        if !self.notify.is_empty() {
            let notify = serde_json::to_value(&self.notify).unwrap_or_default();
            element = element.with_attribute(ATTR_NOTIFY, &notify.to_string());
        }
        if self.focus {
            element = element.with_attribute(ATTR_FOCUS, "true");
        }
        if let Some(uri) = &self.base_uri {
            element = element.with_attribute(ATTR_BASE_URI, uri);
        }
        element
    }
}

fn json_list(items: &[String]) -> String {
    serde_json::Value::from(items.to_vec()).to_string()
}
