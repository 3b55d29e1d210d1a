//! Connection handler that answers one JSONL request per connection.

use std::io::Write;
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

use tracing::{debug, warn};

use super::DISPATCH_TARGET;
use super::errors::DispatchError;
use super::request::ResourceRequest;
use super::response::ResponseWriter;
use super::router::{ResourceRouter, RouteMatch};
use super::sink::ChannelSink;
use crate::aggregate::{Document, Response};
use crate::bus::LoopHandle;
use crate::resources::ServiceContext;
use crate::transport::{ConnectionHandler, ConnectionStream, read_request_line};

/// Upper bound on one request line.
pub const MAX_REQUEST_BYTES: usize = 64 * 1024;

/// Bridges listener connections to resource handlers on the event loop.
#[derive(Debug, Clone)]
pub struct DispatchConnectionHandler {
    router: Arc<ResourceRouter>,
    context: ServiceContext,
    loop_handle: LoopHandle,
    timeout: Duration,
}

impl DispatchConnectionHandler {
    #[must_use]
    pub fn new(context: ServiceContext, loop_handle: LoopHandle, timeout: Duration) -> Self {
        Self {
            router: Arc::new(ResourceRouter::with_default_routes()),
            context,
            loop_handle,
            timeout,
        }
    }

    /// Reads, routes and answers one request on `stream`.
    pub fn dispatch(&self, mut stream: ConnectionStream) {
        if let Err(error) = stream.set_read_timeout(Some(self.timeout)) {
            warn!(target: DISPATCH_TARGET, %error, "failed to set read timeout");
        }

        let response = match self.serve(&mut stream) {
            Ok(Some(response)) => response,
            Ok(None) => {
                debug!(target: DISPATCH_TARGET, "client closed without a request");
                return;
            }
            Err(error) => {
                debug!(target: DISPATCH_TARGET, %error, "request failed");
                error.to_response()
            }
        };

        debug!(
            target: DISPATCH_TARGET,
            status = response.status.as_u16(),
            "writing response"
        );
        if let Err(error) = write_response(&mut stream, &response) {
            warn!(target: DISPATCH_TARGET, %error, "failed to write response");
        }
    }

    fn serve(&self, stream: &mut ConnectionStream) -> Result<Option<Response>, DispatchError> {
        let Some(line) = read_request_line(stream, MAX_REQUEST_BYTES)? else {
            return Ok(None);
        };
        let request = ResourceRequest::parse(&line)?;
        request.validate()?;
        debug!(
            target: DISPATCH_TARGET,
            method = request.method(),
            path = request.path(),
            "request received"
        );

        let matched = self.router.route(&request)?;
        let head = matched.head;
        let mut response = self.execute(matched)?;
        if head {
            response.body = Document::new();
        }
        Ok(Some(response))
    }

    /// Runs the handler on the event loop and waits for its scope to finish.
    fn execute(&self, matched: RouteMatch) -> Result<Response, DispatchError> {
        let (sender, receiver) = mpsc::channel();
        let sink = Arc::new(ChannelSink::new(sender));
        let context = self.context.clone();
        let RouteMatch {
            handler, params, ..
        } = matched;

        self.loop_handle
            .post(move || handler(&context, &params, sink))
            .map_err(|error| DispatchError::internal(error.to_string()))?;

        match receiver.recv_timeout(self.timeout) {
            Ok(response) => Ok(response),
            Err(RecvTimeoutError::Timeout) => Err(DispatchError::Timeout {
                waited: self.timeout,
            }),
            Err(RecvTimeoutError::Disconnected) => Err(DispatchError::internal(
                "request finished without a response",
            )),
        }
    }
}

impl ConnectionHandler for DispatchConnectionHandler {
    fn handle(&self, stream: ConnectionStream) {
        self.dispatch(stream);
    }
}

fn write_response<W: Write>(writer: W, response: &Response) -> Result<(), DispatchError> {
    ResponseWriter::new(writer).write_response(response)
}
