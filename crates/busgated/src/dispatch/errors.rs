//! Failures surfaced before a request reaches a resource handler.

use std::io;
use std::time::Duration;

use thiserror::Error;

use crate::aggregate::{Response, StatusCode};
use crate::transport::LineError;

/// Errors raised while reading, routing or answering a request.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Request line is not valid JSON for the request schema.
    #[error("malformed request: {message}")]
    MalformedJsonl {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Request parsed but a required field is empty.
    #[error("invalid request: {message}")]
    InvalidStructure { message: String },

    #[error("request exceeds the {limit} byte limit")]
    RequestTooLarge { limit: usize },

    #[error("no resource at '{path}'")]
    ResourceNotFound { path: String },

    #[error("method '{method}' is not allowed on '{path}'")]
    MethodNotAllowed { method: String, path: String },

    /// The handler's scope did not finalise in time.
    #[error("no response within {}ms", .waited.as_millis())]
    Timeout { waited: Duration },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to serialize response: {0}")]
    SerializeResponse(#[from] serde_json::Error),

    #[error("internal error: {message}")]
    Internal { message: String },
}

impl DispatchError {
    pub fn from_json_error(source: serde_json::Error) -> Self {
        Self::MalformedJsonl {
            message: source.to_string(),
            source: Some(source),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedJsonl {
            message: message.into(),
            source: None,
        }
    }

    pub fn invalid_structure(message: impl Into<String>) -> Self {
        Self::InvalidStructure {
            message: message.into(),
        }
    }

    pub fn not_found(path: impl Into<String>) -> Self {
        Self::ResourceNotFound { path: path.into() }
    }

    pub fn method_not_allowed(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self::MethodNotAllowed {
            method: method.into(),
            path: path.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Status reported to the client.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MalformedJsonl { .. } | Self::InvalidStructure { .. } => StatusCode::BadRequest,
            Self::RequestTooLarge { .. } => StatusCode::PayloadTooLarge,
            Self::ResourceNotFound { .. } => StatusCode::NotFound,
            Self::MethodNotAllowed { .. } => StatusCode::MethodNotAllowed,
            Self::Timeout { .. } => StatusCode::GatewayTimeout,
            Self::Io(_) | Self::SerializeResponse(_) | Self::Internal { .. } => {
                StatusCode::InternalServerError
            }
        }
    }

    /// Machine-readable error code reported to the client.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedJsonl { .. } => "Base.1.0.MalformedJSON",
            Self::InvalidStructure { .. } => "Base.1.0.PropertyMissing",
            Self::RequestTooLarge { .. } => "Base.1.0.PayloadTooLarge",
            Self::ResourceNotFound { .. } => "Base.1.0.ResourceMissingAtURI",
            Self::MethodNotAllowed { .. } => "Base.1.0.OperationNotAllowed",
            Self::Timeout { .. } => "Base.1.0.ServiceTemporarilyUnavailable",
            Self::Io(_) | Self::SerializeResponse(_) | Self::Internal { .. } => {
                "Base.1.0.InternalError"
            }
        }
    }

    /// Error-shaped response for this failure.
    #[must_use]
    pub fn to_response(&self) -> Response {
        Response::error(self.status(), self.code(), &self.to_string())
    }
}

impl From<LineError> for DispatchError {
    fn from(error: LineError) -> Self {
        match error {
            LineError::TooLarge { limit } => Self::RequestTooLarge { limit },
            LineError::Io(source) => Self::Io(source),
        }
    }
}
