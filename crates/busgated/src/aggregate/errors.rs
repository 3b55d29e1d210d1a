use thiserror::Error;

use super::response::{Response, StatusCode};
use crate::bus::BusError;

/// Error recorded against a request scope and reported at finalisation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct ScopeError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ScopeError {
    pub const INTERNAL_ERROR: &'static str = "Base.1.0.InternalError";
    pub const RESOURCE_MISSING: &'static str = "Base.1.0.ResourceMissingAtURI";
    pub const RESOURCE_NOT_FOUND: &'static str = "Base.1.0.ResourceNotFound";

    #[must_use]
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// A backend call failed.
    #[must_use]
    pub fn backend(error: &BusError) -> Self {
        Self::new(
            StatusCode::InternalServerError,
            Self::INTERNAL_ERROR,
            error.to_string(),
        )
    }

    /// The addressed resource does not exist.
    #[must_use]
    pub fn resource_missing(path: &str) -> Self {
        Self::new(
            StatusCode::NotFound,
            Self::RESOURCE_MISSING,
            format!("resource '{path}' was not found"),
        )
    }

    /// A named member of a resource does not exist.
    #[must_use]
    pub fn not_found(kind: &str, id: &str) -> Self {
        Self::new(
            StatusCode::NotFound,
            Self::RESOURCE_NOT_FOUND,
            format!("{kind} '{id}' was not found"),
        )
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn code(&self) -> &'static str {
        self.code
    }

    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Error-shaped response carrying this error.
    #[must_use]
    pub fn to_response(&self) -> Response {
        Response::error(self.status, self.code, &self.message)
    }
}
