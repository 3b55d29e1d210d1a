//! Socket transport for the JSONL request protocol.
//!
//! The listener binds a TCP or Unix endpoint, accepts on a background
//! thread and serves every connection on its own thread through a
//! [`ConnectionHandler`].

mod errors;
mod handler;
mod listener;

pub use self::errors::ListenerError;
pub use self::handler::{ConnectionHandler, ConnectionStream, LineError, read_request_line};
pub use self::listener::{ListenerHandle, SocketListener};

const LISTENER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::transport");
