use std::sync::mpsc::Sender;

use tracing::debug;

use super::DISPATCH_TARGET;
use crate::aggregate::{Response, ResponseSink};

/// Forwards the finalised response to the waiting connection thread.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: Sender<Response>,
}

impl ChannelSink {
    #[must_use]
    pub fn new(sender: Sender<Response>) -> Self {
        Self { sender }
    }
}

impl ResponseSink for ChannelSink {
    fn complete(&self, response: Response) {
        if self.sender.send(response).is_err() {
            debug!(
                target: DISPATCH_TARGET,
                "response arrived after the connection stopped waiting"
            );
        }
    }
}
