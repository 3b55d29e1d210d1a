use thiserror::Error;

use super::value::{ManagedObject, PropertyMap, PropertyValue, SubTreeEntry};

/// Successful payload of a bus call.
#[derive(Debug, Clone, PartialEq)]
pub enum BusReply {
    SubTree(Vec<SubTreeEntry>),
    ManagedObjects(Vec<ManagedObject>),
    Properties(PropertyMap),
    Value(PropertyValue),
    /// Methods that return nothing.
    Unit,
}

impl BusReply {
    fn kind(&self) -> &'static str {
        match self {
            Self::SubTree(_) => "sub-tree",
            Self::ManagedObjects(_) => "managed objects",
            Self::Properties(_) => "properties",
            Self::Value(_) => "value",
            Self::Unit => "unit",
        }
    }

    /// Unwraps an object mapper sub-tree.
    pub fn into_sub_tree(self) -> Result<Vec<SubTreeEntry>, BusError> {
        match self {
            Self::SubTree(entries) => Ok(entries),
            other => Err(BusError::unexpected_reply("sub-tree", other.kind())),
        }
    }

    /// Unwraps an object manager enumeration.
    pub fn into_managed_objects(self) -> Result<Vec<ManagedObject>, BusError> {
        match self {
            Self::ManagedObjects(objects) => Ok(objects),
            other => Err(BusError::unexpected_reply("managed objects", other.kind())),
        }
    }

    /// Unwraps a `GetAll` property map.
    pub fn into_properties(self) -> Result<PropertyMap, BusError> {
        match self {
            Self::Properties(properties) => Ok(properties),
            other => Err(BusError::unexpected_reply("properties", other.kind())),
        }
    }

    /// Unwraps a single `Get` value.
    pub fn into_value(self) -> Result<PropertyValue, BusError> {
        match self {
            Self::Value(value) => Ok(value),
            other => Err(BusError::unexpected_reply("value", other.kind())),
        }
    }
}

/// Failure reported for a bus call: a non-zero code plus a description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("bus call failed with code {code}: {message}")]
pub struct BusError {
    code: i32,
    message: String,
}

impl BusError {
    pub const NOT_FOUND: i32 = 2;
    pub const BAD_MESSAGE: i32 = 74;
    pub const NOT_SUPPORTED: i32 = 95;
    pub const UNREACHABLE: i32 = 113;
    pub const CANCELLED: i32 = 125;

    /// Builds an error with an explicit code.
    #[must_use]
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// The addressed service, object or interface does not exist.
    #[must_use]
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::new(Self::NOT_FOUND, format!("{} not found", what.into()))
    }

    /// The service does not implement the requested method.
    #[must_use]
    pub fn unsupported_method(method: &str) -> Self {
        Self::new(
            Self::NOT_SUPPORTED,
            format!("method '{method}' is not supported"),
        )
    }

    /// The service exists but cannot be reached.
    #[must_use]
    pub fn unavailable(service: &str) -> Self {
        Self::new(
            Self::UNREACHABLE,
            format!("service '{service}' is unavailable"),
        )
    }

    /// The reply carried a different payload shape than the caller expected.
    #[must_use]
    pub fn unexpected_reply(expected: &str, actual: &str) -> Self {
        Self::new(
            Self::BAD_MESSAGE,
            format!("expected a {expected} reply, received {actual}"),
        )
    }

    /// The call was dropped before it produced an outcome.
    #[must_use]
    pub fn abandoned() -> Self {
        Self::new(Self::CANCELLED, "call abandoned before completion")
    }

    /// Numeric error code; never zero.
    #[must_use]
    pub fn code(&self) -> i32 {
        self.code
    }

    /// Human-readable description.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_reply_shape_is_an_error() {
        let error = BusReply::Value(PropertyValue::Int(1))
            .into_managed_objects()
            .expect_err("shape mismatch");
        assert_eq!(error.code(), BusError::BAD_MESSAGE);
        assert!(error.message().contains("managed objects"));
    }

    #[test]
    fn matching_reply_shape_unwraps() {
        let properties = BusReply::Properties(PropertyMap::new())
            .into_properties()
            .expect("properties reply");
        assert!(properties.is_empty());
    }
}
