//! Reference-counted completion token for one request.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use tracing::{debug, warn};

use super::AGGREGATE_TARGET;
use super::document::Document;
use super::errors::ScopeError;
use super::response::{Response, ResponseSink, StatusCode};
use crate::bus::{BusCall, BusError, BusReply, Completion, PropertyBus};

/// Shared handle to the result document and response of one request.
///
/// Every asynchronous operation that contributes to the response owns a
/// clone. Dropping a handle (or calling [`Scope::release`]) gives up that
/// ownership; when the last handle goes away the response is finalised
/// and delivered to the sink. Finalisation therefore happens exactly once
/// and needs no explicit call from any contributor.
#[derive(Clone)]
pub struct Scope {
    inner: Arc<ScopeInner>,
}

struct ScopeInner {
    document: Mutex<Document>,
    error: OnceLock<ScopeError>,
    status: Mutex<StatusCode>,
    sink: Arc<dyn ResponseSink>,
}

impl Scope {
    /// Opens a scope with an empty document bound to `sink`.
    #[must_use]
    pub fn new(sink: Arc<dyn ResponseSink>) -> Self {
        Self {
            inner: Arc::new(ScopeInner {
                document: Mutex::new(Document::new()),
                error: OnceLock::new(),
                status: Mutex::new(StatusCode::Ok),
                sink,
            }),
        }
    }

    /// Gives up this handle's ownership.
    pub fn release(self) {
        drop(self);
    }

    /// Records `error` unless an earlier error is already recorded.
    ///
    /// Returns `true` when this call recorded the error. Sibling operations
    /// keep running; their writes are discarded at finalisation.
    pub fn mark_error(&self, error: ScopeError) -> bool {
        let code = error.code();
        let recorded = self.inner.error.set(error).is_ok();
        if recorded {
            debug!(target: AGGREGATE_TARGET, code, "scope error recorded");
        } else {
            debug!(target: AGGREGATE_TARGET, code, "later scope error ignored");
        }
        recorded
    }

    /// The first recorded error, if any.
    #[must_use]
    pub fn error(&self) -> Option<&ScopeError> {
        self.inner.error.get()
    }

    /// Status sent with the document when no error is recorded.
    pub fn set_status(&self, status: StatusCode) {
        *self
            .inner
            .status
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = status;
    }

    /// Locks the shared document for writing.
    pub fn document(&self) -> MutexGuard<'_, Document> {
        self.inner
            .document
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of live handles, this one included.
    #[must_use]
    pub fn owners(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Issues `call` on `bus` while holding a clone of this scope.
    ///
    /// `handler` runs with the reply when the call succeeds. A failed call,
    /// or a handler returning an error, records a backend error on the
    /// scope. The clone is released when the completion has run.
    pub fn query<F>(&self, bus: &dyn PropertyBus, call: BusCall, handler: F)
    where
        F: FnOnce(&Scope, BusReply) -> Result<(), BusError> + Send + 'static,
    {
        let scope = self.clone();
        let description = call.to_string();
        bus.invoke(
            call,
            Completion::new(move |result| {
                if let Err(error) = result.and_then(|reply| handler(&scope, reply)) {
                    warn!(
                        target: AGGREGATE_TARGET,
                        call = %description,
                        code = error.code(),
                        message = error.message(),
                        "backend call failed"
                    );
                    scope.mark_error(ScopeError::backend(&error));
                }
            }),
        );
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Scope")
            .field("owners", &self.owners())
            .field("error", &self.error())
            .finish_non_exhaustive()
    }
}

impl Drop for ScopeInner {
    fn drop(&mut self) {
        let response = match self.error.take() {
            Some(error) => error.to_response(),
            None => {
                let document = self
                    .document
                    .get_mut()
                    .unwrap_or_else(PoisonError::into_inner);
                let status = *self
                    .status
                    .get_mut()
                    .unwrap_or_else(PoisonError::into_inner);
                Response::new(status, std::mem::take(document))
            }
        };
        debug!(
            target: AGGREGATE_TARGET,
            status = response.status.as_u16(),
            "scope finalised"
        );
        self.sink.complete(response);
    }
}
