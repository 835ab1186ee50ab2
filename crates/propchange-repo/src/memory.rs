// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! In-process content store.
//!
//! Holds node rows in memory and resolves their context from a configured set
//! of content dimensions. Reads only see committed values: staged writes are
//! applied by [`Persistence::persist_all`] and are lost if it never runs.

use std::cell::RefCell;
use std::collections::BTreeMap;

use propchange_core::PropertyValue;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::node::{ContextPath, Node, NodeRecord, RowKey};
use crate::store::{ContentStore, NodeQuery, Persistence};

/// A content dimension (e.g. `language`) with its fallback value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentDimension {
    /// Value used when a row does not carry a valid one.
    pub default: String,
    /// Allowed values; empty accepts anything.
    #[serde(default)]
    pub presets: Vec<String>,
}

impl ContentDimension {
    /// A dimension with a default and no preset restriction.
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            default: default.into(),
            presets: Vec::new(),
        }
    }

    fn allows(&self, value: &str) -> bool {
        self.presets.is_empty() || self.presets.iter().any(|p| p == value)
    }
}

#[derive(Debug, Clone)]
struct PendingWrite {
    row: RowKey,
    name: String,
    value: PropertyValue,
}

#[derive(Debug, Default)]
struct Inner {
    records: Vec<NodeRecord>,
    pending: Vec<PendingWrite>,
    persist_count: usize,
}

/// Content store over an in-memory list of rows.
#[derive(Debug, Default)]
pub struct MemoryContentStore {
    dimensions: BTreeMap<String, ContentDimension>,
    inner: RefCell<Inner>,
}

impl MemoryContentStore {
    /// Store over `records` without content dimensions.
    pub fn new(records: impl IntoIterator<Item = NodeRecord>) -> Self {
        Self {
            dimensions: BTreeMap::new(),
            inner: RefCell::new(Inner {
                records: records.into_iter().collect(),
                ..Inner::default()
            }),
        }
    }

    /// Configure the content dimensions used to resolve node contexts.
    #[must_use]
    pub fn with_dimensions(mut self, dimensions: BTreeMap<String, ContentDimension>) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// Configured content dimensions.
    pub fn dimensions(&self) -> &BTreeMap<String, ContentDimension> {
        &self.dimensions
    }

    /// Committed rows.
    pub fn records(&self) -> Vec<NodeRecord> {
        self.inner.borrow().records.clone()
    }

    /// First committed row with `identifier`, in any workspace or variant.
    pub fn record(&self, identifier: &str) -> Option<NodeRecord> {
        self.inner
            .borrow()
            .records
            .iter()
            .find(|r| r.identifier == identifier)
            .cloned()
    }

    /// Committed row with key `row`.
    pub fn row(&self, row: &RowKey) -> Option<NodeRecord> {
        self.inner
            .borrow()
            .records
            .iter()
            .find(|r| r.row_key() == *row)
            .cloned()
    }

    /// Number of writes waiting for a commit.
    pub fn pending_writes(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    /// Number of commits so far.
    pub fn persist_count(&self) -> usize {
        self.inner.borrow().persist_count
    }

    fn target_dimensions(&self, record: &NodeRecord) -> BTreeMap<String, String> {
        self.dimensions
            .iter()
            .map(|(name, dimension)| {
                let value = record
                    .dimension_values
                    .get(name)
                    .and_then(|values| values.first())
                    .filter(|value| dimension.allows(value))
                    .cloned()
                    .unwrap_or_else(|| dimension.default.clone());
                (name.clone(), value)
            })
            .collect()
    }
}

impl ContentStore for MemoryContentStore {
    fn find_records(&self, query: &NodeQuery<'_>) -> Result<Vec<NodeRecord>, StoreError> {
        Ok(query.select(&self.inner.borrow().records))
    }

    fn materialize(&self, record: &NodeRecord) -> Option<Node> {
        if record.removed {
            return None;
        }
        let target_dimensions = self.target_dimensions(record);
        Some(Node {
            identifier: record.identifier.clone(),
            row: record.row_key(),
            context_path: ContextPath::build(&record.path, &record.workspace, &target_dimensions),
            path: record.path.clone(),
            node_type: record.node_type.clone(),
            dimension_values: record.dimension_values.clone(),
            target_dimensions,
            properties: record.properties.clone(),
        })
    }

    fn node(&self, path: &ContextPath) -> Result<Option<Node>, StoreError> {
        let records = self.records();
        Ok(records
            .iter()
            .filter(|record| record.moved_to.is_none())
            .filter_map(|record| self.materialize(record))
            .find(|node| &node.context_path == path))
    }

    fn set_property(&self, node: &Node, name: &str, value: PropertyValue) -> Result<(), StoreError> {
        let mut inner = self.inner.borrow_mut();
        if !inner.records.iter().any(|r| r.row_key() == node.row) {
            return Err(StoreError::NotFound(node.context_path.to_string()));
        }
        inner.pending.push(PendingWrite {
            row: node.row.clone(),
            name: name.to_owned(),
            value,
        });
        Ok(())
    }
}

impl Persistence for MemoryContentStore {
    fn persist_all(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.borrow_mut();
        let pending = std::mem::take(&mut inner.pending);
        for write in pending {
            if let Some(record) = inner
                .records
                .iter_mut()
                .find(|r| r.row_key() == write.row)
            {
                record.properties.insert(write.name, write.value);
            }
        }
        inner.persist_count += 1;
        Ok(())
    }
}
