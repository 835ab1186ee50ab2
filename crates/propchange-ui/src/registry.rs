// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Observation registry: who watches which node.

use std::collections::{BTreeMap, HashMap};

use crate::diff::union_into;
use crate::marker::{ElementId, Marker};

/// One element bound to an observed node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Element receiving the affordances.
    pub element: ElementId,
    /// Observed property -> dependent properties to flag.
    pub notify: BTreeMap<String, Vec<String>>,
    /// Focus target when several bindings fire at once.
    pub focus: bool,
    /// Accept endpoint of the element.
    pub base_uri: Option<String>,
}

/// Everything registered for one context path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    /// Union of the observed properties of all bindings, in first-seen order.
    pub observed: Vec<String>,
    /// Node type reported by the first registered element.
    pub node_type: String,
    /// Bindings in registration order.
    pub bindings: Vec<Binding>,
}

/// Registry keyed by context path. Rebuilt from scratch on every frame load.
#[derive(Debug, Clone, Default)]
pub struct ObservationRegistry {
    entries: HashMap<String, RegistryEntry>,
}

impl ObservationRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the binding described by `marker`.
    pub fn register(&mut self, marker: &Marker) {
        let entry = self
            .entries
            .entry(marker.context_path.clone())
            .or_insert_with(|| RegistryEntry {
                observed: Vec::new(),
                node_type: marker.node_type.clone(),
                bindings: Vec::new(),
            });
        union_into(&mut entry.observed, &marker.observed);
        entry.bindings.push(Binding {
            element: marker.element,
            notify: marker.notify.clone(),
            focus: marker.focus,
            base_uri: marker.base_uri.clone(),
        });
    }

    /// Entry of `context_path`.
    pub fn entry(&self, context_path: &str) -> Option<&RegistryEntry> {
        self.entries.get(context_path)
    }

    /// Whether anything observes `context_path`.
    pub fn observes(&self, context_path: &str) -> bool {
        self.entries.contains_key(context_path)
    }

    /// Context path and binding of `element`.
    pub fn binding(&self, element: ElementId) -> Option<(&str, &Binding)> {
        self.entries.iter().find_map(|(path, entry)| {
            entry
                .bindings
                .iter()
                .find(|b| b.element == element)
                .map(|b| (path.as_str(), b))
        })
    }

    /// Number of observed context paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when nothing is observed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(element: u64, path: &str, observed: &[&str]) -> Marker {
        Marker {
            element: ElementId(element),
            observed: observed.iter().map(|s| (*s).to_owned()).collect(),
            changed: Vec::new(),
            context_path: path.to_owned(),
            node_type: "Demo:Page".to_owned(),
            notify: BTreeMap::new(),
            focus: false,
            base_uri: None,
        }
    }

    #[test]
    fn groups_by_context_path_and_unions_observed() {
        let mut registry = ObservationRegistry::new();
        registry.register(&marker(1, "/a@live", &["title", "teaser"]));
        registry.register(&marker(2, "/a@live", &["teaser", "summary"]));
        registry.register(&marker(3, "/b@live", &["title"]));

        assert_eq!(registry.len(), 2);
        let entry = registry.entry("/a@live").unwrap();
        assert_eq!(entry.observed, vec!["title", "teaser", "summary"]);
        let elements: Vec<ElementId> = entry.bindings.iter().map(|b| b.element).collect();
        assert_eq!(elements, vec![ElementId(1), ElementId(2)]);
        assert!(!registry.observes("/c@live"));
    }

    #[test]
    fn finds_binding_by_element() {
        let mut registry = ObservationRegistry::new();
        registry.register(&marker(1, "/a@live", &["title"]));
        registry.register(&marker(9, "/b@live", &["title"]));
        let (path, binding) = registry.binding(ElementId(9)).unwrap();
        assert_eq!(path, "/b@live");
        assert_eq!(binding.element, ElementId(9));
        assert!(registry.binding(ElementId(4)).is_none());
    }
}
