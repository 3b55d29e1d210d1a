//! Finalised responses and the sink that receives them.

use serde::{Serialize, Serializer};

use super::document::Document;

/// HTTP-style status attached to a finalised response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    Ok,
    NoContent,
    BadRequest,
    NotFound,
    MethodNotAllowed,
    PayloadTooLarge,
    InternalServerError,
    GatewayTimeout,
}

impl StatusCode {
    /// Numeric status code.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::NoContent => 204,
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::MethodNotAllowed => 405,
            Self::PayloadTooLarge => 413,
            Self::InternalServerError => 500,
            Self::GatewayTimeout => 504,
        }
    }

    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Ok | Self::NoContent)
    }
}

impl Serialize for StatusCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u16(self.as_u16())
    }
}

/// A complete response: status plus JSON body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub status: StatusCode,
    pub body: Document,
}

impl Response {
    #[must_use]
    pub fn new(status: StatusCode, body: Document) -> Self {
        Self { status, body }
    }

    /// Error response with the `{"error": {"code", "message"}}` body shape.
    #[must_use]
    pub fn error(status: StatusCode, code: &str, message: &str) -> Self {
        let detail = Document::new()
            .with("code", code)
            .with("message", message);
        Self {
            status,
            body: Document::new().with("error", detail),
        }
    }
}

/// Receives the single finalised response of one request.
pub trait ResponseSink: Send + Sync {
    /// Called exactly once per request.
    fn complete(&self, response: Response);
}
