use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A property value attached to a node: a single string or an ordered
/// list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Single(String),
    List(Vec<String>),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("access denied: {0}")]
    AccessDenied(String),
    #[error("malformed store data: {0}")]
    Malformed(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

/// A child node reference returned by enumeration.
#[derive(Debug, Clone)]
pub struct ChildRef {
    pub name: String,
    pub full_path: String,
}

/// The hierarchical configuration store the engine operates on.
///
/// Paths are backslash-separated; node and property lookups are
/// case-insensitive. All calls are synchronous and blocking, and the
/// engine assumes it is the only writer for the duration of a run.
pub trait Store {
    fn exists(&self, path: &str) -> Result<bool, StoreError>;

    /// Immediate children of `path`. Fails with NotFound if the node is
    /// absent.
    fn list_children(&self, path: &str) -> Result<Vec<ChildRef>, StoreError>;

    /// Names of the properties on `path`. Fails with NotFound if the node
    /// is absent.
    fn list_properties(&self, path: &str) -> Result<Vec<String>, StoreError>;

    /// Fails with NotFound if the node or the property is absent.
    fn read_property(&self, path: &str, name: &str) -> Result<PropertyValue, StoreError>;

    fn write_property(
        &mut self,
        path: &str,
        name: &str,
        value: PropertyValue,
    ) -> Result<(), StoreError>;

    /// Delete the node and all of its descendants.
    fn delete_node(&mut self, path: &str) -> Result<(), StoreError>;

    fn join_path(&self, base: &str, component: &str) -> String {
        format!("{base}\\{component}")
    }
}
