use std::fmt;

use super::names::{
    DELETE_ALL, DELETE_ALL_INTERFACE, GET, GET_ALL, GET_MANAGED_OBJECTS, GET_SUB_TREE,
    OBJECT_MANAGER_INTERFACE, OBJECT_MAPPER_INTERFACE, OBJECT_MAPPER_PATH, OBJECT_MAPPER_SERVICE,
    PROPERTIES_INTERFACE,
};

/// Argument marshalled into a bus call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusArg {
    Str(String),
    Int(i64),
    StrList(Vec<String>),
}

/// A single method call addressed to one service object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusCall {
    pub service: String,
    pub path: String,
    pub interface: String,
    pub method: String,
    pub args: Vec<BusArg>,
}

impl BusCall {
    /// Builds a call with no arguments.
    #[must_use]
    pub fn new(
        service: impl Into<String>,
        path: impl Into<String>,
        interface: impl Into<String>,
        method: impl Into<String>,
    ) -> Self {
        Self {
            service: service.into(),
            path: path.into(),
            interface: interface.into(),
            method: method.into(),
            args: Vec::new(),
        }
    }

    /// Appends an argument.
    #[must_use]
    pub fn arg(mut self, arg: BusArg) -> Self {
        self.args.push(arg);
        self
    }

    /// Asks the object mapper for every object below `root` (at most `depth`
    /// levels down, 0 meaning unbounded) implementing one of `interfaces`.
    #[must_use]
    pub fn get_sub_tree(root: &str, depth: i64, interfaces: &[&str]) -> Self {
        Self::new(
            OBJECT_MAPPER_SERVICE,
            OBJECT_MAPPER_PATH,
            OBJECT_MAPPER_INTERFACE,
            GET_SUB_TREE,
        )
        .arg(BusArg::Str(root.to_owned()))
        .arg(BusArg::Int(depth))
        .arg(BusArg::StrList(
            interfaces.iter().map(|name| (*name).to_owned()).collect(),
        ))
    }

    /// Enumerates every object `service` manages below `path`.
    #[must_use]
    pub fn get_managed_objects(service: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(service, path, OBJECT_MANAGER_INTERFACE, GET_MANAGED_OBJECTS)
    }

    /// Reads every property of `interface` on one object.
    #[must_use]
    pub fn get_all(
        service: impl Into<String>,
        path: impl Into<String>,
        interface: impl Into<String>,
    ) -> Self {
        Self::new(service, path, PROPERTIES_INTERFACE, GET_ALL).arg(BusArg::Str(interface.into()))
    }

    /// Reads a single property.
    #[must_use]
    pub fn get_property(
        service: impl Into<String>,
        path: impl Into<String>,
        interface: impl Into<String>,
        property: impl Into<String>,
    ) -> Self {
        Self::new(service, path, PROPERTIES_INTERFACE, GET)
            .arg(BusArg::Str(interface.into()))
            .arg(BusArg::Str(property.into()))
    }

    /// Removes every entry of the collection rooted at `path`.
    #[must_use]
    pub fn delete_all(service: impl Into<String>, path: impl Into<String>) -> Self {
        Self::new(service, path, DELETE_ALL_INTERFACE, DELETE_ALL)
    }

    /// Returns the string argument at `index`.
    #[must_use]
    pub fn str_arg(&self, index: usize) -> Option<&str> {
        match self.args.get(index) {
            Some(BusArg::Str(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Returns the integer argument at `index`.
    #[must_use]
    pub fn int_arg(&self, index: usize) -> Option<i64> {
        match self.args.get(index) {
            Some(BusArg::Int(value)) => Some(*value),
            _ => None,
        }
    }

    /// Returns the string-list argument at `index`.
    #[must_use]
    pub fn str_list_arg(&self, index: usize) -> Option<&[String]> {
        match self.args.get(index) {
            Some(BusArg::StrList(values)) => Some(values.as_slice()),
            _ => None,
        }
    }
}

impl fmt::Display for BusCall {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{} {} {}.{}",
            self.service, self.path, self.interface, self.method
        )
    }
}
