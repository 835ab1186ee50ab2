// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Accepted-state backfill.
//!
//! Seeds the `propertyChangeState` snapshot of existing nodes with their
//! current values so that the first deployment of the feature does not flag
//! every property as changed. Runs synchronously to completion; all writes
//! are committed in one batch at the end, so an interrupted run changes
//! nothing.

use std::collections::BTreeSet;

use propchange_core::{PropertyValue, Snapshot, PROPERTY_CHANGE_STATE};
use tracing::{debug, info};

use crate::error::RepairError;
use crate::node::{DimensionCheck, Node, NodeRecord};
use crate::schema::{NodeTypeDef, NodeTypeRegistry};
use crate::store::{ContentStore, NodeQuery, Persistence};

/// Parameters of one backfill run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackfillRequest {
    /// Restrict to this type and its concrete descendants.
    pub node_type: Option<String>,
    /// Workspace to scan.
    pub workspace: String,
    /// Count intended updates without writing.
    pub dry_run: bool,
}

impl Default for BackfillRequest {
    fn default() -> Self {
        Self {
            node_type: None,
            workspace: "live".to_owned(),
            dry_run: false,
        }
    }
}

/// Counters of a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackfillReport {
    /// Nodes whose snapshot was (or, in a dry run, would have been) written.
    pub updated: usize,
    /// Rows skipped because they did not materialize or had a mismatched context.
    pub skipped: usize,
    /// Types skipped because they observe no properties.
    pub skipped_types: usize,
}

/// Backfill engine over injected schema, store and persistence ports.
pub struct Backfill<'a> {
    schema: &'a dyn NodeTypeRegistry,
    store: &'a dyn ContentStore,
    persistence: &'a dyn Persistence,
}

impl<'a> Backfill<'a> {
    /// Wire the engine to its collaborators.
    pub fn new(
        schema: &'a dyn NodeTypeRegistry,
        store: &'a dyn ContentStore,
        persistence: &'a dyn Persistence,
    ) -> Self {
        Self {
            schema,
            store,
            persistence,
        }
    }

    /// Run a backfill.
    ///
    /// # Errors
    ///
    /// [`RepairError::UnknownNodeType`] when the filter names a missing type;
    /// nothing is processed in that case. Store failures abort the run before
    /// the commit.
    pub fn run(&self, request: &BackfillRequest) -> Result<BackfillReport, RepairError> {
        match &request.node_type {
            Some(name) => info!(
                "Checking nodes of type \"{name}\" for missing property-change state ..."
            ),
            None => info!("Checking for missing property-change state ..."),
        }
        let targets = self.resolve_types(request.node_type.as_deref())?;

        let mut report = BackfillReport::default();
        for node_type in targets {
            let observed = node_type.observed_properties();
            if observed.is_empty() {
                debug!(node_type = %node_type.name, "no observed properties; skipping type");
                report.skipped_types += 1;
                continue;
            }
            let query = NodeQuery::new(&node_type.name, &request.workspace);
            for record in self.store.find_records(&query)? {
                if self.backfill_record(&record, &observed, request.dry_run)? {
                    report.updated += 1;
                } else {
                    report.skipped += 1;
                }
            }
        }

        if report.updated > 0 {
            if !request.dry_run {
                self.persistence.persist_all()?;
            }
            info!("Updated property-change states on {} nodes", report.updated);
        }
        Ok(report)
    }

    /// Target types: the filter plus its concrete descendants, or every
    /// concrete type. Each type appears once.
    fn resolve_types(&self, filter: Option<&str>) -> Result<Vec<&'a NodeTypeDef>, RepairError> {
        let candidates: Vec<&'a NodeTypeDef> = match filter {
            Some(name) => {
                let root = self
                    .schema
                    .node_type(name)
                    .ok_or_else(|| RepairError::UnknownNodeType(name.to_owned()))?;
                let mut types = vec![root];
                types.extend(self.schema.sub_node_types(name, false));
                types
            }
            None => self
                .schema
                .node_types()
                .into_iter()
                .filter(|t| !t.is_abstract)
                .collect(),
        };
        let mut seen = BTreeSet::new();
        Ok(candidates
            .into_iter()
            .filter(|t| seen.insert(t.name.as_str()))
            .collect())
    }

    /// Returns whether the node counts as updated.
    fn backfill_record(
        &self,
        record: &NodeRecord,
        observed: &[String],
        dry_run: bool,
    ) -> Result<bool, RepairError> {
        let Some(node) = self.store.materialize(record) else {
            debug!(path = %record.path, "row does not resolve to a live node; skipping");
            return Ok(false);
        };
        match node.dimension_check() {
            DimensionCheck::Matching => {}
            DimensionCheck::Unset => {
                info!(
                    "Skipping node {} because it has no dimension values set",
                    node.path
                );
                return Ok(false);
            }
            DimensionCheck::Mismatched => {
                info!(
                    "Skipping node {} because it has invalid dimension values: {}",
                    node.path,
                    serde_json::to_string(&node.dimension_values).unwrap_or_default()
                );
                return Ok(false);
            }
        }

        let state = seed_state(&node, observed);
        if !dry_run {
            self.store.set_property(
                &node,
                PROPERTY_CHANGE_STATE,
                PropertyValue::String(state.encode()),
            )?;
        }
        Ok(true)
    }
}

/// Existing snapshot overwritten with the node's current scalar values.
fn seed_state(node: &Node, observed: &[String]) -> Snapshot {
    let mut state = node.accepted_state();
    for name in observed {
        if let Some(value) = node.property(name) {
            // object values are never tracked
            state.record(name.as_str(), value);
        }
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryContentStore;
    use crate::schema::NodeTypeSchema;
    use serde_json::json;

    fn schema() -> NodeTypeSchema {
        NodeTypeSchema::new([serde_json::from_value::<NodeTypeDef>(json!({
            "name": "Demo:Page",
            "properties": {"title": {"type": "string"}}
        }))
        .unwrap()])
    }

    fn row(id: &str, title: serde_json::Value) -> NodeRecord {
        serde_json::from_value(json!({
            "identifier": id,
            "path": format!("/sites/demo/{id}"),
            "nodeType": "Demo:Page",
            "workspace": "live",
            "properties": {"title": title}
        }))
        .unwrap()
    }

    #[test]
    fn seeds_and_commits_once() {
        let schema = schema();
        let store = MemoryContentStore::new([row("a", json!("A")), row("b", json!("B"))]);
        let report = Backfill::new(&schema, &store, &store)
            .run(&BackfillRequest::default())
            .unwrap();
        assert_eq!(report.updated, 2);
        assert_eq!(store.persist_count(), 1);
        let state = store.record("a").unwrap().properties[PROPERTY_CHANGE_STATE].clone();
        assert_eq!(state, json!(r#"{"title":"A"}"#));
    }

    #[test]
    fn unknown_filter_is_fatal() {
        let schema = schema();
        let store = MemoryContentStore::new([row("a", json!("A"))]);
        let request = BackfillRequest {
            node_type: Some("Demo:Missing".into()),
            ..BackfillRequest::default()
        };
        let err = Backfill::new(&schema, &store, &store).run(&request).unwrap_err();
        assert!(matches!(err, RepairError::UnknownNodeType(name) if name == "Demo:Missing"));
        assert_eq!(store.pending_writes(), 0);
        assert_eq!(store.persist_count(), 0);
    }

    #[test]
    fn nothing_to_update_skips_commit() {
        let schema = schema();
        let store = MemoryContentStore::new(Vec::new());
        let report = Backfill::new(&schema, &store, &store)
            .run(&BackfillRequest::default())
            .unwrap();
        assert_eq!(report, BackfillReport::default());
        assert_eq!(store.persist_count(), 0);
    }
}
