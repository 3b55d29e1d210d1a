//! Daemon bootstrap: configuration, telemetry, event loop and bus.

use std::io;
use std::sync::Arc;

use ortho_config::{OrthoConfig, OrthoError};
use thiserror::Error;

use busgate_config::{Config, SocketPreparationError};

use crate::bus::{BusProvider, BusStartupError, EventLoop};
use crate::health::HealthReporter;
use crate::resources::ServiceContext;
use crate::telemetry::{self, TelemetryError, TelemetryHandle};

/// Source of the daemon configuration.
pub trait ConfigLoader: Send + Sync {
    fn load(&self) -> Result<Config, Arc<OrthoError>>;
}

/// Loader that layers defaults, file, environment and command line.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemConfigLoader;

impl ConfigLoader for SystemConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load()
    }
}

/// Loader that hands out an already resolved configuration.
#[derive(Debug, Clone)]
pub struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(self.config.clone())
    }
}

/// Errors surfaced during bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("failed to load configuration: {source}")]
    Configuration {
        #[source]
        source: Arc<OrthoError>,
    },
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        #[source]
        source: TelemetryError,
    },
    #[error("failed to prepare listen socket: {source}")]
    Socket {
        #[source]
        source: SocketPreparationError,
    },
    #[error("failed to start the event loop: {source}")]
    EventLoop {
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Bus {
        #[from]
        source: BusStartupError,
    },
}

/// Everything a running daemon needs apart from its listener.
pub struct Daemon {
    config: Config,
    context: ServiceContext,
    event_loop: EventLoop,
    telemetry: TelemetryHandle,
    reporter: Arc<dyn HealthReporter>,
}

impl Daemon {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Collaborators handed to every request handler.
    #[must_use]
    pub fn context(&self) -> &ServiceContext {
        &self.context
    }

    #[must_use]
    pub fn event_loop(&self) -> &EventLoop {
        &self.event_loop
    }

    #[must_use]
    pub fn telemetry(&self) -> TelemetryHandle {
        self.telemetry
    }

    #[must_use]
    pub fn reporter(&self) -> &Arc<dyn HealthReporter> {
        &self.reporter
    }

    /// Drains the event loop and reports the daemon as stopped.
    pub fn shutdown(self) {
        let Self {
            context,
            event_loop,
            reporter,
            ..
        } = self;
        drop(context);
        event_loop.shutdown();
        reporter.stopped();
    }
}

impl std::fmt::Debug for Daemon {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Daemon")
            .field("config", &self.config)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

/// Bootstraps the daemon using the supplied collaborators.
pub fn bootstrap_with<P>(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
    provider: &P,
) -> Result<Daemon, BootstrapError>
where
    P: BusProvider + ?Sized,
{
    reporter.bootstrap_starting();
    match assemble(loader, provider) {
        Ok((config, context, event_loop, telemetry)) => {
            reporter.bootstrap_succeeded(&config);
            Ok(Daemon {
                config,
                context,
                event_loop,
                telemetry,
                reporter,
            })
        }
        Err(error) => {
            reporter.bootstrap_failed(&error);
            Err(error)
        }
    }
}

fn assemble<P>(
    loader: &dyn ConfigLoader,
    provider: &P,
) -> Result<(Config, ServiceContext, EventLoop, TelemetryHandle), BootstrapError>
where
    P: BusProvider + ?Sized,
{
    let config = loader
        .load()
        .map_err(|source| BootstrapError::Configuration { source })?;
    let telemetry =
        telemetry::initialise(&config).map_err(|source| BootstrapError::Telemetry { source })?;
    config
        .listen()
        .prepare_filesystem()
        .map_err(|source| BootstrapError::Socket { source })?;
    let event_loop = EventLoop::start().map_err(|source| BootstrapError::EventLoop { source })?;
    let bus = provider.connect(&config, event_loop.handle())?;
    let context = ServiceContext::new(bus, config.discovery_mode())
        .with_domain_name(config.domain_name().map(str::to_owned));
    Ok((config, context, event_loop, telemetry))
}
