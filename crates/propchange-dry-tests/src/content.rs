// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Node-type and node-row builders for backfill and accept tests.

use std::cell::Cell;
use std::collections::BTreeMap;

use propchange_core::PropertyValue;
use propchange_repo::memory::ContentDimension;
use propchange_repo::{
    Backfill, MemoryContentStore, NodeRecord, NodeTypeDef, NodeTypeSchema, Persistence, PropertyDef,
    StoreError,
};

/// Concrete node type declaring `string_properties` as `string`.
pub fn node_type(name: &str, string_properties: &[&str]) -> NodeTypeDef {
    NodeTypeDef {
        name: name.to_owned(),
        properties: string_properties
            .iter()
            .map(|p| {
                (
                    (*p).to_owned(),
                    PropertyDef {
                        ty: Some("string".to_owned()),
                        ..PropertyDef::default()
                    },
                )
            })
            .collect(),
        ..NodeTypeDef::default()
    }
}

/// Builder for [`NodeRecord`] rows.
///
/// Rows default to the `live` workspace, no dimensions and no properties.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    record: NodeRecord,
}

impl RecordBuilder {
    /// Row `identifier` at `path` of `node_type`.
    pub fn new(identifier: &str, path: &str, node_type: &str) -> Self {
        Self {
            record: NodeRecord {
                identifier: identifier.to_owned(),
                path: path.to_owned(),
                node_type: node_type.to_owned(),
                workspace: "live".to_owned(),
                dimension_values: BTreeMap::new(),
                moved_to: None,
                removed: false,
                properties: serde_json::Map::new(),
            },
        }
    }

    /// Move the row to `workspace`.
    #[must_use]
    pub fn workspace(mut self, workspace: &str) -> Self {
        self.record.workspace = workspace.to_owned();
        self
    }

    /// Store `values` for dimension `name`.
    #[must_use]
    pub fn dimension(mut self, name: &str, values: &[&str]) -> Self {
        self.record
            .dimension_values
            .insert(name.to_owned(), values.iter().map(|v| (*v).to_owned()).collect());
        self
    }

    /// Set property `name`.
    #[must_use]
    pub fn property(mut self, name: &str, value: impl Into<PropertyValue>) -> Self {
        self.record.properties.insert(name.to_owned(), value.into());
        self
    }

    /// Mark the row as moved away to `target`.
    #[must_use]
    pub fn moved_to(mut self, target: &str) -> Self {
        self.record.moved_to = Some(target.to_owned());
        self
    }

    /// Tombstone the row.
    #[must_use]
    pub fn removed(mut self) -> Self {
        self.record.removed = true;
        self
    }

    /// Finish the row.
    pub fn build(self) -> NodeRecord {
        self.record
    }
}

/// Schema plus in-memory store, ready to back a [`Backfill`].
#[derive(Debug)]
pub struct ContentFixture {
    /// Node-type schema.
    pub schema: NodeTypeSchema,
    /// Content rows.
    pub store: MemoryContentStore,
}

impl ContentFixture {
    /// Fixture over `types` and `records` without content dimensions.
    pub fn new(
        types: impl IntoIterator<Item = NodeTypeDef>,
        records: impl IntoIterator<Item = NodeRecord>,
    ) -> Self {
        Self {
            schema: NodeTypeSchema::new(types),
            store: MemoryContentStore::new(records),
        }
    }

    /// Add a `language` dimension with `default` and `presets`.
    #[must_use]
    pub fn with_language(mut self, default: &str, presets: &[&str]) -> Self {
        let dimension = ContentDimension {
            default: default.to_owned(),
            presets: presets.iter().map(|p| (*p).to_owned()).collect(),
        };
        let mut dimensions = self.store.dimensions().clone();
        dimensions.insert("language".to_owned(), dimension);
        self.store = self.store.with_dimensions(dimensions);
        self
    }

    /// Backfill committing through the store itself.
    pub fn backfill(&self) -> Backfill<'_> {
        Backfill::new(&self.schema, &self.store, &self.store)
    }

    /// Property `name` of committed row `identifier`.
    pub fn committed(&self, identifier: &str, name: &str) -> Option<PropertyValue> {
        self.store
            .record(identifier)
            .and_then(|r| r.properties.get(name).cloned())
    }

    /// Property `name` of the committed `live` row `identifier` stored for
    /// `language`.
    pub fn committed_variant(&self, identifier: &str, language: &str, name: &str) -> Option<PropertyValue> {
        let row = RecordBuilder::new(identifier, "", "")
            .dimension("language", &[language])
            .build()
            .row_key();
        self.store
            .row(&row)
            .and_then(|r| r.properties.get(name).cloned())
    }
}

/// Persistence fake that counts commits and optionally fails them.
///
/// Successful commits are forwarded to the wrapped store.
#[derive(Debug)]
pub struct FlakyPersistence<'a> {
    inner: &'a MemoryContentStore,
    fail: Cell<bool>,
    attempts: Cell<usize>,
}

impl<'a> FlakyPersistence<'a> {
    /// Wrap `inner`; commits succeed until [`set_fail`](Self::set_fail).
    pub fn new(inner: &'a MemoryContentStore) -> Self {
        Self {
            inner,
            fail: Cell::new(false),
            attempts: Cell::new(0),
        }
    }

    /// Make every commit fail.
    pub fn set_fail(&self, fail: bool) {
        self.fail.set(fail);
    }

    /// Commit attempts, including failed ones.
    pub fn attempts(&self) -> usize {
        self.attempts.get()
    }
}

impl Persistence for FlakyPersistence<'_> {
    fn persist_all(&self) -> Result<(), StoreError> {
        self.attempts.set(self.attempts.get() + 1);
        if self.fail.get() {
            return Err(StoreError::Other("simulated commit failure".into()));
        }
        self.inner.persist_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use propchange_repo::NodeTypeRegistry;

    #[test]
    fn node_type_observes_its_string_properties() {
        let def = node_type("Demo:Page", &["title", "teaser"]);
        assert_eq!(def.observed_properties(), vec!["teaser", "title"]);
        let schema = NodeTypeSchema::new([def]);
        assert!(schema.node_type("Demo:Page").is_some());
    }

    #[test]
    fn flaky_persistence_keeps_writes_pending_on_failure() {
        let fixture = ContentFixture::new(
            [node_type("Demo:Page", &["title"])],
            [RecordBuilder::new("a", "/sites/a", "Demo:Page").build()],
        );
        let persistence = FlakyPersistence::new(&fixture.store);
        persistence.set_fail(true);
        assert!(persistence.persist_all().is_err());
        assert_eq!(persistence.attempts(), 1);
        assert_eq!(fixture.store.persist_count(), 0);
    }
}
