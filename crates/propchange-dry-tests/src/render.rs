// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Recording renderer and static label sources.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use propchange_ui::{Affordance, AffordanceRenderer, ElementId, LabelResolver, NodeTypeLookup, Translator};

/// Renderer that keeps the affordances of every element in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    /// Current affordances per element.
    pub rendered: BTreeMap<ElementId, Vec<Affordance>>,
    /// Elements focused, in call order.
    pub focused: Vec<ElementId>,
    /// Number of `replace` calls per element.
    pub replace_calls: BTreeMap<ElementId, usize>,
}

impl RecordingRenderer {
    /// Empty renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Property names currently offered on `element`.
    pub fn properties(&self, element: ElementId) -> Vec<String> {
        self.rendered
            .get(&element)
            .map(|affordances| affordances.iter().map(|a| a.property_name.clone()).collect())
            .unwrap_or_default()
    }

    /// `replace` calls seen for `element`.
    pub fn replace_count(&self, element: ElementId) -> usize {
        self.replace_calls.get(&element).copied().unwrap_or(0)
    }
}

impl AffordanceRenderer for RecordingRenderer {
    fn replace(&mut self, element: ElementId, affordances: Vec<Affordance>) {
        *self.replace_calls.entry(element).or_insert(0) += 1;
        self.rendered.insert(element, affordances);
    }

    fn remove(&mut self, element: ElementId, property_name: &str) {
        if let Some(affordances) = self.rendered.get_mut(&element) {
            affordances.retain(|a| a.property_name != property_name);
        }
    }

    fn focus(&mut self, element: ElementId) {
        self.focused.push(element);
    }
}

/// Fixed labels and translations.
#[derive(Debug, Clone, Default)]
pub struct StaticLabels {
    labels: HashMap<(String, String), String>,
    translations: HashMap<String, String>,
}

impl StaticLabels {
    /// No labels, no translations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Label `property` of `node_type` with translation id `label`.
    #[must_use]
    pub fn label(mut self, node_type: &str, property: &str, label: &str) -> Self {
        self.labels
            .insert((node_type.to_owned(), property.to_owned()), label.to_owned());
        self
    }

    /// Translate `id` to `text`.
    #[must_use]
    pub fn translate(mut self, id: &str, text: &str) -> Self {
        self.translations.insert(id.to_owned(), text.to_owned());
        self
    }

    /// Resolver backed by these labels.
    pub fn resolver(self) -> LabelResolver {
        let shared = Arc::new(self);
        let node_types = Arc::clone(&shared) as Arc<dyn NodeTypeLookup>;
        LabelResolver::new(node_types, shared)
    }
}

impl NodeTypeLookup for StaticLabels {
    fn property_label(&self, node_type: &str, property: &str) -> Option<String> {
        self.labels
            .get(&(node_type.to_owned(), property.to_owned()))
            .cloned()
    }
}

impl Translator for StaticLabels {
    fn translate(&self, id: &str, fallback: &str) -> String {
        self.translations
            .get(id)
            .cloned()
            .unwrap_or_else(|| fallback.to_owned())
    }
}

/// Resolver without labels or translations: labels are property names.
pub fn labels() -> LabelResolver {
    StaticLabels::new().resolver()
}
