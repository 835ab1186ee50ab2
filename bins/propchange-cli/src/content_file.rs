// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Content store backed by a JSON dump file.
//!
//! The whole dump is read on open. A commit applies the staged writes in
//! memory and then rewrites the file once.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use propchange_core::PropertyValue;
use propchange_repo::memory::ContentDimension;
use propchange_repo::{
    ContentStore, ContextPath, MemoryContentStore, Node, NodeQuery, NodeRecord, NodeTypeDef,
    NodeTypeSchema, Persistence, StoreError,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// On-disk layout of a content dump.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDump {
    /// Content dimensions with their defaults and presets.
    #[serde(default)]
    pub content_dimensions: BTreeMap<String, ContentDimension>,
    /// Node-type definitions.
    #[serde(default)]
    pub node_types: Vec<NodeTypeDef>,
    /// Node rows.
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
}

/// [`MemoryContentStore`] that writes committed rows back to its file.
#[derive(Debug)]
pub struct FileContentStore {
    path: PathBuf,
    node_types: Vec<NodeTypeDef>,
    schema: NodeTypeSchema,
    store: MemoryContentStore,
}

impl FileContentStore {
    /// Read the dump at `path`.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let dump: ContentDump = serde_json::from_slice(&fs::read(path)?)?;
        debug!(
            path = %path.display(),
            node_types = dump.node_types.len(),
            nodes = dump.nodes.len(),
            "content dump loaded"
        );
        Ok(Self {
            path: path.to_path_buf(),
            schema: NodeTypeSchema::new(dump.node_types.iter().cloned()),
            node_types: dump.node_types,
            store: MemoryContentStore::new(dump.nodes).with_dimensions(dump.content_dimensions),
        })
    }

    /// Node-type schema of the dump.
    pub fn schema(&self) -> &NodeTypeSchema {
        &self.schema
    }

    fn dump(&self) -> ContentDump {
        ContentDump {
            content_dimensions: self.store.dimensions().clone(),
            node_types: self.node_types.clone(),
            nodes: self.store.records(),
        }
    }
}

impl ContentStore for FileContentStore {
    fn find_records(&self, query: &NodeQuery<'_>) -> Result<Vec<NodeRecord>, StoreError> {
        self.store.find_records(query)
    }

    fn materialize(&self, record: &NodeRecord) -> Option<Node> {
        self.store.materialize(record)
    }

    fn node(&self, path: &ContextPath) -> Result<Option<Node>, StoreError> {
        self.store.node(path)
    }

    fn set_property(&self, node: &Node, name: &str, value: PropertyValue) -> Result<(), StoreError> {
        self.store.set_property(node, name, value)
    }
}

impl Persistence for FileContentStore {
    fn persist_all(&self) -> Result<(), StoreError> {
        self.store.persist_all()?;
        let bytes = serde_json::to_vec_pretty(&self.dump())?;
        fs::write(&self.path, bytes)?;
        debug!(path = %self.path.display(), "content dump written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use propchange_core::PROPERTY_CHANGE_STATE;
    use serde_json::json;

    fn write_dump(dir: &Path) -> PathBuf {
        let path = dir.join("content.json");
        let dump = json!({
            "contentDimensions": {"language": {"default": "en", "presets": ["en", "de"]}},
            "nodeTypes": [{"name": "Demo:Page", "properties": {"title": {"type": "string"}}}],
            "nodes": [{
                "identifier": "a",
                "path": "/sites/demo/a",
                "nodeType": "Demo:Page",
                "workspace": "live",
                "dimensionValues": {"language": ["en"]},
                "properties": {"title": "Hello"}
            }]
        });
        fs::write(&path, dump.to_string()).unwrap();
        path
    }

    #[test]
    fn commit_rewrites_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_dump(dir.path());
        let content = FileContentStore::open(&path).unwrap();
        let node = content
            .node(&ContextPath::new("/sites/demo/a@live;language=en"))
            .unwrap()
            .unwrap();
        content
            .set_property(&node, PROPERTY_CHANGE_STATE, json!("{}"))
            .unwrap();

        let untouched: ContentDump = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert!(untouched.nodes[0].properties.get(PROPERTY_CHANGE_STATE).is_none());

        content.persist_all().unwrap();
        let reread: ContentDump = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(reread.nodes[0].properties[PROPERTY_CHANGE_STATE], json!("{}"));
        assert_eq!(reread.content_dimensions["language"].default, "en");
        assert_eq!(reread.node_types.len(), 1);
    }

    #[test]
    fn malformed_dump_is_a_serde_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{nodes: ").unwrap();
        assert!(matches!(FileContentStore::open(&path), Err(StoreError::Serde(_))));
    }
}
