// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Accepting a property: fold its current value into the node's snapshot.

use propchange_core::wire::{AcceptRequest, AcceptResponse};
use propchange_core::{PropertyValue, Snapshot, PROPERTY_CHANGE_STATE};
use tracing::debug;

use crate::error::{RepairError, StoreError};
use crate::node::{ContextPath, Node};
use crate::store::{ContentStore, Persistence};

/// Accept the current value of `property_name` on `node`.
///
/// The resulting snapshot is written back even when nothing changed. An empty
/// result (nothing accepted before, and the node lacks the property) is
/// returned without a write.
pub fn accept_property(
    store: &dyn ContentStore,
    node: &Node,
    property_name: &str,
) -> Result<Snapshot, StoreError> {
    let mut state = node.accepted_state();
    if let Some(value) = node.property(property_name) {
        if !state.record(property_name, value) {
            debug!(property = property_name, "object value cannot be accepted");
        }
    }
    if !state.is_empty() {
        store.set_property(
            node,
            PROPERTY_CHANGE_STATE,
            PropertyValue::String(state.encode()),
        )?;
    }
    Ok(state)
}

/// Request handler behind the accept-property endpoint.
pub struct AcceptService<'a> {
    store: &'a dyn ContentStore,
    persistence: &'a dyn Persistence,
}

impl<'a> AcceptService<'a> {
    /// Wire the handler to its collaborators.
    pub fn new(store: &'a dyn ContentStore, persistence: &'a dyn Persistence) -> Self {
        Self { store, persistence }
    }

    /// Resolve the node, accept the property and commit.
    pub fn handle(&self, request: &AcceptRequest) -> Result<AcceptResponse, RepairError> {
        let path = ContextPath::new(request.node.as_str());
        let node = self
            .store
            .node(&path)?
            .ok_or_else(|| StoreError::NotFound(request.node.clone()))?;
        let value = accept_property(self.store, &node, &request.property_name)?;
        if !value.is_empty() {
            self.persistence.persist_all()?;
        }
        Ok(AcceptResponse { value })
    }
}
