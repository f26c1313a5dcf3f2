//! The format-neutral resource model.

use serde::{Deserialize, Serialize};

/// The value of one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceValue {
    /// A string.
    String(String),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// A value of an external type, kept in its serialized text form.
    Typed {
        /// Fully qualified type, e.g. `Widgets.Color, Widgets`.
        type_name: String,
        /// Serialized value.
        value: String,
    },
}

impl ResourceValue {
    /// Returns the string if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ResourceValue::String(s) => Some(s),
            _ => None,
        }
    }
}

/// One named resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// The resource name.
    pub name: String,
    /// Its value.
    pub value: ResourceValue,
    /// Optional translator comment.
    #[serde(default)]
    pub comment: Option<String>,
}

impl Resource {
    /// A string resource without a comment.
    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: ResourceValue::String(value.into()),
            comment: None,
        }
    }
}

/// An ordered set of uniquely named resources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSet {
    entries: Vec<Resource>,
}

impl ResourceSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a resource unless one with the same name exists.
    ///
    /// Returns `false` (and keeps the existing entry) on a duplicate.
    pub fn insert(&mut self, resource: Resource) -> bool {
        if self.get(&resource.name).is_some() {
            return false;
        }
        self.entries.push(resource);
        true
    }

    /// Looks up a resource by name.
    pub fn get(&self, name: &str) -> Option<&Resource> {
        self.entries.iter().find(|r| r.name == name)
    }

    /// Resource names in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|r| r.name.clone()).collect()
    }

    /// Iterates the resources in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.entries.iter()
    }

    /// Number of resources.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no resources.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
