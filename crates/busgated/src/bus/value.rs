use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A typed property value as carried on the bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Double(f64),
    Str(String),
    /// Arrays and structs; a struct travels as the list of its members.
    List(Vec<PropertyValue>),
}

impl PropertyValue {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[PropertyValue]> {
        match self {
            Self::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Integer view of the value; unsigned values above `i64::MAX` are rejected.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::UInt(value) => i64::try_from(*value).ok(),
            _ => None,
        }
    }

    /// Returns the final dot-separated segment of a string value.
    ///
    /// Enumerations travel as fully qualified names such as
    /// `xyz.openbmc_project.State.Host.HostState.Running`.
    #[must_use]
    pub fn enum_suffix(&self) -> Option<&str> {
        self.as_str()
            .map(|value| value.rsplit_once('.').map_or(value, |(_, suffix)| suffix))
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<Vec<PropertyValue>> for PropertyValue {
    fn from(value: Vec<PropertyValue>) -> Self {
        Self::List(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Property name to value.
pub type PropertyMap = BTreeMap<String, PropertyValue>;

/// Interface name to its properties.
pub type InterfaceMap = BTreeMap<String, PropertyMap>;

/// One object returned by `GetManagedObjects`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ManagedObject {
    pub path: String,
    pub interfaces: InterfaceMap,
}

impl ManagedObject {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            interfaces: InterfaceMap::new(),
        }
    }

    /// Adds (or replaces) one property on `interface`.
    #[must_use]
    pub fn with_property(
        mut self,
        interface: &str,
        property: &str,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.interfaces
            .entry(interface.to_owned())
            .or_default()
            .insert(property.to_owned(), value.into());
        self
    }

    /// Properties of `interface`, when the object implements it.
    #[must_use]
    pub fn interface(&self, interface: &str) -> Option<&PropertyMap> {
        self.interfaces.get(interface)
    }

    /// Last path segment.
    #[must_use]
    pub fn leaf_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or_default()
    }
}

/// One object path reported by the object mapper, with the services (and
/// their interfaces) that expose it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubTreeEntry {
    pub path: String,
    pub services: BTreeMap<String, Vec<String>>,
}

impl SubTreeEntry {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            services: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_service(mut self, service: &str, interfaces: &[&str]) -> Self {
        self.services.insert(
            service.to_owned(),
            interfaces.iter().map(|name| (*name).to_owned()).collect(),
        );
        self
    }
}
