// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Client-side change detection for the property-change tracker.
//!
//! The [`ChangeDetectionEngine`] owns the observation registry. It reacts to
//! exactly two triggers, processed in arrival order on one logical thread:
//!
//! 1. the content frame finished loading: [`ChangeDetectionEngine::rebuild`]
//!    scans marker elements and replaces the registry wholesale;
//! 2. node-update feedback arrived: the engine diffs each observed node
//!    against its accepted-state snapshot and re-renders accept affordances.
//!
//! The engine joins the host's feedback handling as one stage of a
//! [`FeedbackPipeline`] and always hands the feedback on to the next stage.
//! DOM access, rendering, translation and transport stay behind ports.

pub mod accept_client;
pub mod affordance;
pub mod diff;
pub mod engine;
pub mod error;
pub mod feedback;
pub mod marker;
pub mod registry;

pub use accept_client::{AcceptCall, AcceptTransport};
pub use affordance::{Affordance, AffordanceRenderer, LabelResolver, NodeTypeLookup, Translator};
pub use diff::{changed_properties, notify_properties};
pub use engine::{shared_stage, ChangeDetectionEngine, NotifyOutcome};
pub use error::{AcceptError, MarkerError, TransportError};
pub use feedback::{FeedbackHandler, FeedbackPipeline, FeedbackRegistry, Next, NodeData, NodeInfoFeedback};
pub use marker::{ElementId, Marker, MarkerElement};
pub use registry::{Binding, ObservationRegistry, RegistryEntry};
