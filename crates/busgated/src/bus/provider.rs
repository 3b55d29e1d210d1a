//! Connection to the property bus at startup.

use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use busgate_config::Config;

use super::{BUS_TARGET, BusSnapshot, DynBus, FixtureBus, LoopHandle};

/// Errors surfaced when the bus connection cannot be established.
#[derive(Debug, Error)]
#[error("failed to connect to the property bus: {message}")]
pub struct BusStartupError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl BusStartupError {
    /// Builds an error without an underlying source.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Builds an error that wraps an underlying source.
    #[must_use]
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Human-readable message describing the failure.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Opens the bus used by request handlers.
pub trait BusProvider {
    /// Connects using the resolved configuration; completions are posted to
    /// `loop_handle`.
    fn connect(&self, config: &Config, loop_handle: LoopHandle) -> Result<DynBus, BusStartupError>;
}

/// Serves the snapshot named by `bus_fixture`, or an empty bus when none is
/// configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureBusProvider;

impl BusProvider for FixtureBusProvider {
    fn connect(&self, config: &Config, loop_handle: LoopHandle) -> Result<DynBus, BusStartupError> {
        let bus = match config.bus_fixture() {
            Some(path) => FixtureBus::load(path, loop_handle)
                .map_err(|error| BusStartupError::with_source("unable to load bus fixture", error))?,
            None => {
                warn!(
                    target: BUS_TARGET,
                    "no bus fixture configured; serving an empty property store"
                );
                FixtureBus::new(BusSnapshot::default(), loop_handle)
            }
        };
        Ok(Arc::new(bus))
    }
}
