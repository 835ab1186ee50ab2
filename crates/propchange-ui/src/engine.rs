// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The change-detection engine.

use std::cell::RefCell;
use std::rc::Rc;

use propchange_core::wire::AcceptRequest;
use tracing::{debug, warn};

use crate::accept_client::{AcceptCall, AcceptTransport};
use crate::affordance::{AffordanceRenderer, LabelResolver};
use crate::diff::{changed_properties, notify_properties};
use crate::error::AcceptError;
use crate::feedback::{FeedbackHandler, Next, NodeData, NodeInfoFeedback};
use crate::marker::{ElementId, Marker, MarkerElement};
use crate::registry::ObservationRegistry;

/// Result of diffing one node update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotifyOutcome {
    /// Context path of the updated node.
    pub context_path: String,
    /// Observed properties that differ from the accepted state.
    pub changed: Vec<String>,
    /// Elements whose affordances were replaced, with the flagged properties.
    pub notified: Vec<(ElementId, Vec<String>)>,
    /// First notified element carrying the focus flag.
    pub focus: Option<ElementId>,
}

/// Owns the observation registry and renders affordances through `R`.
#[derive(Debug)]
pub struct ChangeDetectionEngine<R> {
    registry: ObservationRegistry,
    labels: LabelResolver,
    renderer: R,
}

impl<R: AffordanceRenderer> ChangeDetectionEngine<R> {
    /// Engine with an empty registry.
    pub fn new(renderer: R, labels: LabelResolver) -> Self {
        Self {
            registry: ObservationRegistry::new(),
            labels,
            renderer,
        }
    }

    /// Current registry.
    pub fn registry(&self) -> &ObservationRegistry {
        &self.registry
    }

    /// Rendering port.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The content frame finished loading: replace the registry with the
    /// markers found in `elements` and seed their initial affordances.
    ///
    /// Elements with missing or malformed marker attributes are skipped.
    /// Returns the number of registered elements.
    pub fn rebuild<I, E>(&mut self, elements: I) -> usize
    where
        I: IntoIterator<Item = E>,
        E: MarkerElement,
    {
        let mut registry = ObservationRegistry::new();
        let mut registered = 0;
        for element in elements {
            let marker = match Marker::parse(&element) {
                Ok(marker) => marker,
                Err(err) => {
                    warn!(element = %element.id(), %err, "skipping property-change marker");
                    continue;
                }
            };
            registry.register(&marker);
            let affordances = self.labels.affordances(&marker.node_type, &marker.changed);
            self.renderer.replace(marker.element, affordances);
            registered += 1;
        }
        debug!(elements = registered, nodes = registry.len(), "property-change registry rebuilt");
        self.registry = registry;
        registered
    }

    /// Diff the update of `context_path` and re-render affected bindings.
    ///
    /// Returns `None` when nothing observes the node.
    pub fn apply_update(&mut self, context_path: &str, data: &NodeData) -> Option<NotifyOutcome> {
        let Some(entry) = self.registry.entry(context_path) else {
            debug!(context_path, "ignoring update of unobserved node");
            return None;
        };
        let changed = changed_properties(&entry.observed, &data.properties);

        let mut outcome = NotifyOutcome {
            context_path: context_path.to_owned(),
            changed,
            ..NotifyOutcome::default()
        };
        for binding in &entry.bindings {
            let notify = notify_properties(&outcome.changed, &binding.notify);
            if notify.is_empty() {
                continue;
            }
            if outcome.focus.is_none() && binding.focus {
                outcome.focus = Some(binding.element);
            }
            let affordances = self.labels.affordances(&data.node_type, &notify);
            self.renderer.replace(binding.element, affordances);
            outcome.notified.push((binding.element, notify));
        }
        Some(outcome)
    }

    /// Apply every node update in `feedback`.
    pub fn apply_feedback(&mut self, feedback: &NodeInfoFeedback) -> Vec<NotifyOutcome> {
        feedback
            .by_context_path
            .iter()
            .filter_map(|(path, data)| self.apply_update(path, data))
            .collect()
    }

    /// [`apply_feedback`](Self::apply_feedback), then move focus to each
    /// reported focus target.
    pub fn process_feedback(&mut self, feedback: &NodeInfoFeedback) -> Vec<NotifyOutcome> {
        let outcomes = self.apply_feedback(feedback);
        for element in outcomes.iter().filter_map(|o| o.focus) {
            self.renderer.focus(element);
        }
        outcomes
    }

    /// The editor clicked accept for `property_name` on `element`.
    ///
    /// Posts to the element's endpoint and removes the affordance once the
    /// server completed. The registry is left as is; the next reload
    /// reconciles it.
    pub fn accept_clicked<T>(
        &mut self,
        transport: &mut T,
        element: ElementId,
        property_name: &str,
    ) -> Result<(), AcceptError>
    where
        T: AcceptTransport + ?Sized,
    {
        let (context_path, binding) = self
            .registry
            .binding(element)
            .ok_or(AcceptError::UnknownElement(element.0))?;
        let uri = binding
            .base_uri
            .clone()
            .ok_or(AcceptError::MissingEndpoint(element.0))?;
        let request = AcceptRequest {
            node: context_path.to_owned(),
            property_name: property_name.to_owned(),
        };
        let call = AcceptCall::new(uri, request, transport.csrf_token()?);
        transport.send(&call)?;
        self.renderer.remove(element, property_name);
        Ok(())
    }
}

impl<R: AffordanceRenderer> FeedbackHandler for ChangeDetectionEngine<R> {
    fn handle(&mut self, feedback: &NodeInfoFeedback, next: Next<'_>) {
        self.process_feedback(feedback);
        next.run(feedback);
    }
}

/// Pipeline stage forwarding to a shared engine.
///
/// The host keeps the other handle to call
/// [`rebuild`](ChangeDetectionEngine::rebuild) on frame reloads.
pub fn shared_stage<R>(engine: &Rc<RefCell<ChangeDetectionEngine<R>>>) -> impl FeedbackHandler
where
    R: AffordanceRenderer + 'static,
{
    let engine = Rc::clone(engine);
    move |feedback: &NodeInfoFeedback, next: Next<'_>| {
        // release the engine before later stages run
        engine.borrow_mut().process_feedback(feedback);
        next.run(feedback);
    }
}
