//! Fan-out/join machinery shared by every resource handler.
//!
//! A handler creates one [`Scope`] per request. Each asynchronous operation
//! that contributes to the response holds its own clone of the scope and
//! writes into the shared [`Document`]. When the last clone is dropped the
//! scope finalises: the document (or the first recorded error) is handed to
//! the request's [`ResponseSink`] exactly once.

mod document;
mod errors;
mod response;
mod scope;

pub use self::document::{Document, Node};
pub use self::errors::ScopeError;
pub use self::response::{Response, ResponseSink, StatusCode};
pub use self::scope::Scope;

pub(crate) const AGGREGATE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::aggregate");
