use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::store::{ChildRef, PropertyValue, Store, StoreError};

/// One node of the configuration tree.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, PropertyValue>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, Node>,
}

/// In-memory store backed by a JSON snapshot file.
///
/// Node and property names preserve the case they were written with, but
/// every lookup is case-insensitive, matching the semantics of the store
/// the catalog describes.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotStore {
    root: Node,
}

fn components(path: &str) -> impl Iterator<Item = &str> {
    path.split('\\').filter(|c| !c.is_empty())
}

fn child_key(node: &Node, name: &str) -> Option<String> {
    node.children
        .keys()
        .find(|k| k.eq_ignore_ascii_case(name))
        .cloned()
}

fn property_key(node: &Node, name: &str) -> Option<String> {
    node.properties
        .keys()
        .find(|k| k.eq_ignore_ascii_case(name))
        .cloned()
}

impl SnapshotStore {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read store snapshot {}", path.display()))?;
        serde_json::from_str(&data)
            .with_context(|| format!("invalid store snapshot {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(path, data)
            .with_context(|| format!("cannot write store snapshot {}", path.display()))
    }

    fn node(&self, path: &str) -> Option<&Node> {
        let mut cur = &self.root;
        for comp in components(path) {
            let key = child_key(cur, comp)?;
            cur = &cur.children[&key];
        }
        Some(cur)
    }

    fn node_mut(&mut self, path: &str) -> Option<&mut Node> {
        let mut cur = &mut self.root;
        for comp in components(path) {
            let key = child_key(cur, comp)?;
            cur = cur.children.get_mut(&key).unwrap();
        }
        Some(cur)
    }

    /// Create the node at `path` (and any missing ancestors) and return it.
    /// Intended for fixture construction; existing nodes are reused.
    pub fn ensure_node(&mut self, path: &str) -> &mut Node {
        let comps: Vec<&str> = components(path).collect();
        let mut cur = &mut self.root;
        for comp in comps {
            let key = child_key(cur, comp).unwrap_or_else(|| comp.to_string());
            cur = cur.children.entry(key).or_default();
        }
        cur
    }

    /// Fixture helper: create the node if needed and set one property.
    pub fn set_property(&mut self, path: &str, name: &str, value: PropertyValue) {
        self.ensure_node(path).properties.insert(name.to_string(), value);
    }
}

impl Store for SnapshotStore {
    fn exists(&self, path: &str) -> Result<bool, StoreError> {
        Ok(self.node(path).is_some())
    }

    fn list_children(&self, path: &str) -> Result<Vec<ChildRef>, StoreError> {
        let node = self
            .node(path)
            .ok_or_else(|| StoreError::NotFound(path.to_string()))?;
        Ok(node
            .children
            .keys()
            .map(|name| ChildRef {
                name: name.clone(),
                full_path: self.join_path(path, name),
            })
            .collect())
    }

    fn list_properties(&self, path: &str) -> Result<Vec<String>, StoreError> {
        let node = self
            .node(path)
            .ok_or_else(|| StoreError::NotFound(path.to_string()))?;
        Ok(node.properties.keys().cloned().collect())
    }

    fn read_property(&self, path: &str, name: &str) -> Result<PropertyValue, StoreError> {
        let node = self
            .node(path)
            .ok_or_else(|| StoreError::NotFound(path.to_string()))?;
        let key = property_key(node, name)
            .ok_or_else(|| StoreError::NotFound(format!("{path}\\{name}")))?;
        Ok(node.properties[&key].clone())
    }

    fn write_property(
        &mut self,
        path: &str,
        name: &str,
        value: PropertyValue,
    ) -> Result<(), StoreError> {
        let node = self
            .node_mut(path)
            .ok_or_else(|| StoreError::NotFound(path.to_string()))?;
        // Overwrite under the stored key's original casing when present.
        let key = property_key(node, name).unwrap_or_else(|| name.to_string());
        node.properties.insert(key, value);
        Ok(())
    }

    fn delete_node(&mut self, path: &str) -> Result<(), StoreError> {
        let comps: Vec<&str> = components(path).collect();
        let Some((leaf, parents)) = comps.split_last() else {
            return Err(StoreError::Malformed("cannot delete the root".into()));
        };
        let parent_path = parents.join("\\");
        let parent = self
            .node_mut(&parent_path)
            .ok_or_else(|| StoreError::NotFound(path.to_string()))?;
        let key =
            child_key(parent, leaf).ok_or_else(|| StoreError::NotFound(path.to_string()))?;
        parent.children.remove(&key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_ignore_case() {
        let mut store = SnapshotStore::default();
        store.set_property(
            r"SYSTEM\Services\Tcpip",
            "Bind",
            PropertyValue::Single("x".into()),
        );

        assert!(store.exists(r"system\SERVICES\tcpip").unwrap());
        assert_eq!(
            store.read_property(r"system\services\tcpip", "BIND").unwrap(),
            PropertyValue::Single("x".into())
        );
    }

    #[test]
    fn delete_node_removes_subtree() {
        let mut store = SnapshotStore::default();
        store.ensure_node(r"a\b\c");
        store.delete_node(r"a\B").unwrap();
        assert!(!store.exists(r"a\b").unwrap());
        assert!(!store.exists(r"a\b\c").unwrap());
        assert!(store.exists("a").unwrap());
    }

    #[test]
    fn missing_paths_report_not_found() {
        let store = SnapshotStore::default();
        assert!(store.list_children("nope").unwrap_err().is_not_found());
        assert!(store
            .read_property("nope", "prop")
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn write_preserves_original_property_casing() {
        let mut store = SnapshotStore::default();
        store.set_property("n", "Bind", PropertyValue::List(vec!["a".into()]));
        store
            .write_property("n", "BIND", PropertyValue::List(vec![]))
            .unwrap();
        assert_eq!(store.list_properties("n").unwrap(), vec!["Bind".to_string()]);
    }

    #[test]
    fn snapshot_round_trips_through_json() {
        let mut store = SnapshotStore::default();
        store.set_property(
            r"SYSTEM\CurrentControlSet\Services\Tcpip\Linkage",
            "Bind",
            PropertyValue::List(vec![r"\Device\{AAA}".into()]),
        );
        let json = serde_json::to_string(&store).unwrap();
        let back: SnapshotStore = serde_json::from_str(&json).unwrap();
        assert_eq!(back, store);
    }
}
