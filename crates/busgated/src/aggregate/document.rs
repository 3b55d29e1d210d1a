//! Typed JSON-like tree accumulated for one response.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// One value in a [`Document`].
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// JSON `null`.
    Null,
    Bool(bool),
    /// Signed integer, serialised without a fractional part.
    Integer(i64),
    Unsigned(u64),
    /// Floating point value; non-finite values serialise as `null`.
    Float(f64),
    String(String),
    /// Ordered list; entries keep their insertion order.
    Array(Vec<Node>),
    /// Nested object with sorted keys.
    Object(Document),
}

impl Node {
    /// The nested object, if this is one.
    #[must_use]
    pub fn as_object(&self) -> Option<&Document> {
        match self {
            Self::Object(document) => Some(document),
            _ => None,
        }
    }

    /// The array entries, if this is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Node]> {
        match self {
            Self::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// The string value, if this is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Integer value, accepting unsigned values that fit in `i64`.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            Self::Unsigned(value) => i64::try_from(*value).ok(),
            _ => None,
        }
    }

    /// The float value; integers are not widened.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// This node as an object, replacing any other value with an empty one.
    fn coerce_object(&mut self) -> &mut Document {
        if let Self::Object(document) = self {
            return document;
        }
        *self = Self::Object(Document::new());
        self.coerce_object()
    }

    /// This node as an array, replacing any other value with an empty one.
    fn coerce_array(&mut self) -> &mut Vec<Node> {
        if let Self::Array(items) = self {
            return items;
        }
        *self = Self::Array(Vec::new());
        self.coerce_array()
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<u64> for Node {
    fn from(value: u64) -> Self {
        Self::Unsigned(value)
    }
}

impl From<f64> for Node {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Document> for Node {
    fn from(value: Document) -> Self {
        Self::Object(value)
    }
}

impl From<Vec<Node>> for Node {
    fn from(value: Vec<Node>) -> Self {
        Self::Array(value)
    }
}

/// Object node: string keys mapped to [`Node`]s.
///
/// Writers address disjoint keys; when two writers use the same key the
/// last one wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    entries: BTreeMap<String, Node>,
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Node>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Builder form of [`Document::insert`].
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Node>) -> Self {
        self.insert(key, value);
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.get(key)
    }

    /// Nested object at `key`, created (or replacing a non-object) on demand.
    pub fn object_mut(&mut self, key: &str) -> &mut Self {
        self.entries
            .entry(key.to_owned())
            .or_insert(Node::Null)
            .coerce_object()
    }

    /// Array at `key`, created (or replacing a non-array) on demand.
    pub fn array_mut(&mut self, key: &str) -> &mut Vec<Node> {
        self.entries
            .entry(key.to_owned())
            .or_insert(Node::Null)
            .coerce_array()
    }

    /// Appends `entry` to the array at `key`.
    pub fn push(&mut self, key: &str, entry: impl Into<Node>) {
        self.array_mut(key).push(entry.into());
    }

    /// Object at `path`, each segment naming a nested object.
    #[must_use]
    pub fn pointer(&self, path: &[&str]) -> Option<&Node> {
        let (last, parents) = path.split_last()?;
        let mut current = self;
        for key in parents {
            current = current.get(key)?.as_object()?;
        }
        current.get(last)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(value) => serializer.serialize_bool(*value),
            Self::Integer(value) => serializer.serialize_i64(*value),
            Self::Unsigned(value) => serializer.serialize_u64(*value),
            Self::Float(value) => serializer.serialize_f64(*value),
            Self::String(value) => serializer.serialize_str(value),
            Self::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Object(document) => document.serialize(serializer),
        }
    }
}

impl Serialize for Document {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, node) in &self.entries {
            map.serialize_entry(key, node)?;
        }
        map.end()
    }
}
