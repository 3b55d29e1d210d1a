//! Lifecycle events reported while the daemon starts and stops.

use std::sync::Arc;

use busgate_config::{Config, SocketEndpoint};

use crate::bootstrap::BootstrapError;

const HEALTH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::health");

/// Observer of daemon lifecycle events.
pub trait HealthReporter: Send + Sync {
    fn bootstrap_starting(&self);

    fn bootstrap_succeeded(&self, config: &Config);

    fn bootstrap_failed(&self, error: &BootstrapError);

    /// The listener is bound and accepting requests.
    fn serving(&self, endpoint: &SocketEndpoint);

    /// Shutdown finished; no request is in flight.
    fn stopped(&self);
}

impl<T> HealthReporter for Arc<T>
where
    T: HealthReporter + ?Sized,
{
    fn bootstrap_starting(&self) {
        (**self).bootstrap_starting();
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        (**self).bootstrap_succeeded(config);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        (**self).bootstrap_failed(error);
    }

    fn serving(&self, endpoint: &SocketEndpoint) {
        (**self).serving(endpoint);
    }

    fn stopped(&self) {
        (**self).stopped();
    }
}

/// Reporter that records lifecycle events through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredHealthReporter;

impl StructuredHealthReporter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl HealthReporter for StructuredHealthReporter {
    fn bootstrap_starting(&self) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_starting",
            "starting daemon bootstrap"
        );
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_succeeded",
            listen = %config.listen(),
            discovery_mode = %config.discovery_mode(),
            log_filter = %config.log_filter(),
            log_format = ?config.log_format(),
            response_timeout_ms = config.response_timeout_ms,
            "daemon bootstrap completed"
        );
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "bootstrap_failed",
            error = %error,
            "daemon bootstrap failed"
        );
    }

    fn serving(&self, endpoint: &SocketEndpoint) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "serving",
            endpoint = %endpoint,
            "accepting requests"
        );
    }

    fn stopped(&self) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "stopped",
            "daemon stopped"
        );
    }
}
