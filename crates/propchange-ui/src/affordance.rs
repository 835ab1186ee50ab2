// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Accept affordances and the ports used to render and label them.

use std::sync::Arc;

use crate::marker::ElementId;

/// Translation id of the hint text; `{0}` is replaced by the property label.
pub const HINT_KEY: &str = "Mindscreen.PropertyChanges:Main:propertyChanged.hint";
/// Translation id of the accept button.
pub const ACCEPT_KEY: &str = "Mindscreen.PropertyChanges:Main:propertyChanged.accept";

const HINT_FALLBACK: &str = "Property \"{0}\" has changed";
const ACCEPT_FALLBACK: &str = "Accept";

/// A rendered offer to accept one changed property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Affordance {
    /// Property the accept action targets.
    pub property_name: String,
    /// Human-readable property label.
    pub label: String,
    /// Hint text shown next to the button.
    pub hint: String,
    /// Button text.
    pub accept_label: String,
}

/// Rendering port for affordances inside frame elements.
pub trait AffordanceRenderer {
    /// Replace every affordance of `element` with `affordances`.
    fn replace(&mut self, element: ElementId, affordances: Vec<Affordance>);

    /// Remove the affordance for `property_name` from `element`.
    fn remove(&mut self, element: ElementId, property_name: &str);

    /// Move input focus to `element`.
    fn focus(&mut self, _element: ElementId) {}
}

/// Handle on the host's translation registry.
pub trait Translator {
    /// Translate `id`, returning `fallback` when no translation exists.
    fn translate(&self, id: &str, fallback: &str) -> String;
}

/// Handle on the host's node-type definitions.
pub trait NodeTypeLookup {
    /// Configured UI label (usually a translation id) of `property`.
    fn property_label(&self, node_type: &str, property: &str) -> Option<String>;
}

/// Builds labelled affordances from the host's node types and translations.
#[derive(Clone)]
pub struct LabelResolver {
    node_types: Arc<dyn NodeTypeLookup>,
    translator: Arc<dyn Translator>,
}

impl LabelResolver {
    /// Wrap the host registries.
    pub fn new(node_types: Arc<dyn NodeTypeLookup>, translator: Arc<dyn Translator>) -> Self {
        Self {
            node_types,
            translator,
        }
    }

    /// Label of `property`; falls back to the property name.
    pub fn label(&self, node_type: &str, property: &str) -> String {
        match self.node_types.property_label(node_type, property) {
            Some(label) if !label.is_empty() => self.translator.translate(&label, property),
            _ => property.to_owned(),
        }
    }

    /// Affordance for `property` of a node of `node_type`.
    pub fn affordance(&self, node_type: &str, property: &str) -> Affordance {
        let label = self.label(node_type, property);
        let hint = self
            .translator
            .translate(HINT_KEY, HINT_FALLBACK)
            .replace("{0}", &label);
        Affordance {
            property_name: property.to_owned(),
            hint,
            accept_label: self.translator.translate(ACCEPT_KEY, ACCEPT_FALLBACK),
            label,
        }
    }

    /// Affordances for `properties`, in order.
    pub fn affordances(&self, node_type: &str, properties: &[String]) -> Vec<Affordance> {
        properties
            .iter()
            .map(|property| self.affordance(node_type, property))
            .collect()
    }
}

impl std::fmt::Debug for LabelResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelResolver").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Labels;

    impl NodeTypeLookup for Labels {
        fn property_label(&self, node_type: &str, property: &str) -> Option<String> {
            (node_type == "Demo:Page" && property == "title").then(|| "Demo:Page:title".to_owned())
        }
    }

    struct German;

    impl Translator for German {
        fn translate(&self, id: &str, fallback: &str) -> String {
            match id {
                "Demo:Page:title" => "Titel".to_owned(),
                ACCEPT_KEY => "Übernehmen".to_owned(),
                _ => fallback.to_owned(),
            }
        }
    }

    fn resolver() -> LabelResolver {
        LabelResolver::new(Arc::new(Labels), Arc::new(German))
    }

    #[test]
    fn translated_label_and_texts() {
        let affordance = resolver().affordance("Demo:Page", "title");
        assert_eq!(affordance.property_name, "title");
        assert_eq!(affordance.label, "Titel");
        assert_eq!(affordance.hint, "Property \"Titel\" has changed");
        assert_eq!(affordance.accept_label, "Übernehmen");
    }

    #[test]
    fn unknown_label_falls_back_to_property_name() {
        let resolver = resolver();
        assert_eq!(resolver.label("Demo:Page", "teaser"), "teaser");
        assert_eq!(resolver.label("Demo:Other", "title"), "title");
    }
}
