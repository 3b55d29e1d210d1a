//! Health reporter double that records lifecycle events.

use std::sync::Mutex;

use busgate_config::{Config, SocketEndpoint};

use crate::bootstrap::BootstrapError;
use crate::health::HealthReporter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthEvent {
    BootstrapStarting,
    BootstrapSucceeded,
    BootstrapFailed(String),
    Serving(String),
    Stopped,
}

#[derive(Debug, Default)]
pub struct RecordingHealthReporter {
    events: Mutex<Vec<HealthEvent>>,
}

impl RecordingHealthReporter {
    pub fn events(&self) -> Vec<HealthEvent> {
        self.events.lock().expect("events lock").clone()
    }

    fn record(&self, event: HealthEvent) {
        self.events.lock().expect("events lock").push(event);
    }
}

impl HealthReporter for RecordingHealthReporter {
    fn bootstrap_starting(&self) {
        self.record(HealthEvent::BootstrapStarting);
    }

    fn bootstrap_succeeded(&self, _config: &Config) {
        self.record(HealthEvent::BootstrapSucceeded);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        self.record(HealthEvent::BootstrapFailed(error.to_string()));
    }

    fn serving(&self, endpoint: &SocketEndpoint) {
        self.record(HealthEvent::Serving(endpoint.to_string()));
    }

    fn stopped(&self) {
        self.record(HealthEvent::Stopped);
    }
}
