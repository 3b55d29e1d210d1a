//! Request line parsing.

use serde::Deserialize;

use super::errors::DispatchError;

/// One client request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResourceRequest {
    pub method: String,
    pub path: String,
    /// Request payload; read-only resources ignore it.
    #[serde(default)]
    pub body: Option<serde_json::Value>,
}

impl ResourceRequest {
    /// Parses one JSONL request line. Trailing whitespace is ignored.
    pub fn parse(line: &[u8]) -> Result<Self, DispatchError> {
        let trimmed = line.trim_ascii_end();
        if trimmed.is_empty() {
            return Err(DispatchError::malformed("empty request line"));
        }
        serde_json::from_slice(trimmed).map_err(DispatchError::from_json_error)
    }

    /// Rejects empty method or path fields.
    pub fn validate(&self) -> Result<(), DispatchError> {
        if self.method().is_empty() {
            return Err(DispatchError::invalid_structure("method field is empty"));
        }
        if self.path().is_empty() {
            return Err(DispatchError::invalid_structure("path field is empty"));
        }
        Ok(())
    }

    /// Method name, trimmed.
    #[must_use]
    pub fn method(&self) -> &str {
        self.method.trim()
    }

    /// Path without surrounding whitespace or query string.
    #[must_use]
    pub fn path(&self) -> &str {
        let path = self.path.trim();
        path.split_once('?').map_or(path, |(resource, _)| resource)
    }
}
