// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Server feedback and the interceptor pipeline that delivers it.
//!
//! Feedback handlers are registered under a key. Decorating a key prepends a
//! stage to that key's pipeline; each stage does its own work and then calls
//! [`Next::run`] to hand the same feedback to the remaining stages.

use std::collections::{BTreeMap, HashMap};

use propchange_core::PropertyValue;
use serde::{Deserialize, Serialize};
use serde_json::Map;

/// Key of the host's node-info update handler.
pub const UPDATE_NODE_INFO: &str = "Neos.Neos.Ui:UpdateNodeInfo/Main";

/// Updated data of one node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    /// Node type name.
    #[serde(default)]
    pub node_type: String,
    /// Current property values.
    #[serde(default)]
    pub properties: Map<String, PropertyValue>,
}

/// Node-info update feedback: updated node data keyed by context path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInfoFeedback {
    /// Updated nodes.
    pub by_context_path: BTreeMap<String, NodeData>,
}

/// One stage of a feedback pipeline.
pub trait FeedbackHandler {
    /// Process `feedback`, then (normally) pass it on with `next.run(feedback)`.
    fn handle(&mut self, feedback: &NodeInfoFeedback, next: Next<'_>);
}

impl<F> FeedbackHandler for F
where
    F: FnMut(&NodeInfoFeedback, Next<'_>),
{
    fn handle(&mut self, feedback: &NodeInfoFeedback, next: Next<'_>) {
        self(feedback, next);
    }
}

/// Remaining stages after the current one.
pub struct Next<'a> {
    rest: &'a mut [Box<dyn FeedbackHandler>],
}

impl Next<'_> {
    /// Hand `feedback` to the next stage, if any.
    pub fn run(self, feedback: &NodeInfoFeedback) {
        let Next { rest } = self;
        if let Some((head, tail)) = rest.split_first_mut() {
            head.handle(feedback, Next { rest: tail });
        }
    }
}

/// Ordered list of feedback stages.
#[derive(Default)]
pub struct FeedbackPipeline {
    stages: Vec<Box<dyn FeedbackHandler>>,
}

impl FeedbackPipeline {
    /// Empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `handler` after the existing stages.
    pub fn push(&mut self, handler: impl FeedbackHandler + 'static) {
        self.stages.push(Box::new(handler));
    }

    /// Run `handler` before the existing stages.
    pub fn prepend(&mut self, handler: impl FeedbackHandler + 'static) {
        self.stages.insert(0, Box::new(handler));
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// `true` without stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Deliver `feedback` to the first stage.
    pub fn dispatch(&mut self, feedback: &NodeInfoFeedback) {
        Next {
            rest: &mut self.stages,
        }
        .run(feedback);
    }
}

impl std::fmt::Debug for FeedbackPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedbackPipeline")
            .field("stages", &self.stages.len())
            .finish()
    }
}

/// Feedback pipelines keyed by handler name.
#[derive(Debug, Default)]
pub struct FeedbackRegistry {
    pipelines: HashMap<String, FeedbackPipeline>,
}

impl FeedbackRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `handler` as the innermost stage of `key`.
    pub fn set(&mut self, key: &str, handler: impl FeedbackHandler + 'static) {
        self.pipelines.entry(key.to_owned()).or_default().push(handler);
    }

    /// Wrap the handlers of `key` with `handler`, which runs first.
    pub fn decorate(&mut self, key: &str, handler: impl FeedbackHandler + 'static) {
        self.pipelines
            .entry(key.to_owned())
            .or_default()
            .prepend(handler);
    }

    /// Deliver `feedback` to the pipeline of `key`. Returns `false` if none exists.
    pub fn dispatch(&mut self, key: &str, feedback: &NodeInfoFeedback) -> bool {
        match self.pipelines.get_mut(key) {
            Some(pipeline) => {
                pipeline.dispatch(feedback);
                true
            }
            None => false,
        }
    }
}
