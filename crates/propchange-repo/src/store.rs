// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Ports to the content repository and its persistence layer.
//!
//! Adapters take `&self` and keep their own interior state; writes made
//! through [`ContentStore::set_property`] stay pending until
//! [`Persistence::persist_all`] commits them in one batch.

use std::collections::BTreeSet;

use propchange_core::PropertyValue;

use crate::error::StoreError;
use crate::node::{ContextPath, Node, NodeRecord};

/// Selection of node rows by type and workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeQuery<'a> {
    /// Exact node type name.
    pub node_type: &'a str,
    /// Workspace name.
    pub workspace: &'a str,
}

impl<'a> NodeQuery<'a> {
    /// Query rows of `node_type` in `workspace`.
    pub fn new(node_type: &'a str, workspace: &'a str) -> Self {
        Self {
            node_type,
            workspace,
        }
    }

    /// `nodeType = :nodeType AND workspace = :workspace AND (movedTo IS NULL OR removed = false)`.
    pub fn matches(&self, record: &NodeRecord) -> bool {
        record.node_type == self.node_type
            && record.workspace == self.workspace
            && (record.moved_to.is_none() || !record.removed)
    }

    /// Apply the predicate to `records`, keeping the first row per
    /// [`RowKey`](crate::node::RowKey).
    ///
    /// Dimension variants of one node share an identifier and stay distinct.
    pub fn select<'r>(&self, records: impl IntoIterator<Item = &'r NodeRecord>) -> Vec<NodeRecord> {
        let mut seen = BTreeSet::new();
        records
            .into_iter()
            .filter(|record| self.matches(record))
            .filter(|record| seen.insert(record.row_key()))
            .cloned()
            .collect()
    }
}

/// Storage port: row queries, node materialization and staged writes.
pub trait ContentStore {
    /// Distinct rows matching `query`.
    fn find_records(&self, query: &NodeQuery<'_>) -> Result<Vec<NodeRecord>, StoreError>;

    /// Materialize `record` in a context matching its own dimension values.
    ///
    /// Returns `None` when the row does not resolve to a live node.
    fn materialize(&self, record: &NodeRecord) -> Option<Node>;

    /// Resolve a live node by context path.
    fn node(&self, path: &ContextPath) -> Result<Option<Node>, StoreError>;

    /// Stage a property write on `node`.
    fn set_property(&self, node: &Node, name: &str, value: PropertyValue) -> Result<(), StoreError>;
}

/// Persistence port: commit every staged write at once.
pub trait Persistence {
    /// Commit all pending writes.
    fn persist_all(&self) -> Result<(), StoreError>;
}
