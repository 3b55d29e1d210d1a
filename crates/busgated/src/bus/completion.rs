use std::fmt;

use super::reply::{BusError, BusReply};

/// Outcome delivered to a [`Completion`].
pub type BusResult = Result<BusReply, BusError>;

type Callback = Box<dyn FnOnce(BusResult) + Send>;

/// Callback that receives the outcome of one bus call exactly once.
///
/// Dropping a completion without finishing it delivers
/// [`BusError::abandoned`], so whatever the callback owns (typically an
/// aggregation scope handle) is always released.
pub struct Completion {
    callback: Option<Callback>,
}

impl Completion {
    /// Wraps `callback`.
    pub fn new<F>(callback: F) -> Self
    where
        F: FnOnce(BusResult) + Send + 'static,
    {
        Self {
            callback: Some(Box::new(callback)),
        }
    }

    /// Delivers `result` to the callback.
    pub fn complete(mut self, result: BusResult) {
        if let Some(callback) = self.callback.take() {
            callback(result);
        }
    }

    /// Delivers a successful reply.
    pub fn succeed(self, reply: BusReply) {
        self.complete(Ok(reply));
    }

    /// Delivers a failure.
    pub fn fail(self, error: BusError) {
        self.complete(Err(error));
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if let Some(callback) = self.callback.take() {
            callback(Err(BusError::abandoned()));
        }
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Completion")
            .field("pending", &self.callback.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::bus::PropertyMap;

    fn recording() -> (Completion, Arc<Mutex<Vec<BusResult>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let completion = Completion::new(move |result| {
            sink.lock().expect("results lock").push(result);
        });
        (completion, seen)
    }

    #[test]
    fn completes_once_with_the_supplied_result() {
        let (completion, seen) = recording();
        completion.succeed(BusReply::Properties(PropertyMap::new()));

        let results = seen.lock().expect("results lock");
        assert_eq!(results.len(), 1);
        assert!(results[0].is_ok());
    }

    #[test]
    fn dropping_reports_an_abandoned_call() {
        let (completion, seen) = recording();
        drop(completion);

        let results = seen.lock().expect("results lock");
        assert_eq!(results.as_slice(), &[Err(BusError::abandoned())]);
    }
}
