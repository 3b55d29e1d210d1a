use std::sync::Mutex;

use mockall::mock;

use crate::aggregate::{Response, ResponseSink};

mock! {
    pub Sink {}
    impl ResponseSink for Sink {
        fn complete(&self, response: Response);
    }
}

/// Sink that keeps every response it receives.
#[derive(Debug, Default)]
pub struct RecordingSink {
    responses: Mutex<Vec<Response>>,
}

impl RecordingSink {
    pub fn responses(&self) -> Vec<Response> {
        self.responses.lock().expect("responses lock").clone()
    }

    /// The only response received; panics unless exactly one arrived.
    pub fn single(&self) -> Response {
        let responses = self.responses();
        assert_eq!(
            responses.len(),
            1,
            "expected exactly one response, got {responses:?}"
        );
        responses.into_iter().next().expect("one response")
    }
}

impl ResponseSink for RecordingSink {
    fn complete(&self, response: Response) {
        self.responses.lock().expect("responses lock").push(response);
    }
}
