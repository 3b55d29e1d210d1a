//! Shared configuration for the busgate management daemon.
//!
//! Values are layered by [`ortho_config`]: built-in defaults first, then a
//! TOML file (`--config-path` or `BUSGATE_CONFIG_PATH`), then `BUSGATE_*`
//! environment variables, and finally command-line flags such as
//! `--listen tcp://0.0.0.0:18080` or `--discovery-mode index-filtered`.

mod defaults;
mod discovery;
mod logging;
mod socket;

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_LISTEN_PORT, DEFAULT_LOG_FILTER, DEFAULT_RESPONSE_TIMEOUT_MS, default_discovery_mode,
    default_listen_endpoint, default_log_filter, default_log_filter_string, default_log_format,
    default_response_timeout_ms,
};
pub use discovery::{DiscoveryMode, DiscoveryModeParseError};
pub use logging::{LogFormat, LogFormatParseError};
pub use socket::{SocketEndpoint, SocketParseError, SocketPreparationError};

/// Resolved daemon configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "BUSGATE")]
pub struct Config {
    /// Endpoint the resource dispatcher listens on.
    #[serde(default = "default_listen_endpoint")]
    #[ortho_config(default = default_listen_endpoint())]
    pub listen: SocketEndpoint,
    /// `tracing` filter expression applied to the daemon's subscriber.
    #[serde(default = "default_log_filter_string")]
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Output format for structured logs.
    #[serde(default = "default_log_format")]
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
    /// Strategy used to discover sensor objects.
    #[serde(default = "default_discovery_mode")]
    #[ortho_config(default = default_discovery_mode())]
    pub discovery_mode: DiscoveryMode,
    /// JSON snapshot served by the in-process property bus.
    #[serde(default)]
    pub bus_fixture: Option<Utf8PathBuf>,
    /// DNS domain appended to the host name to form the manager's FQDN.
    #[serde(default)]
    pub domain_name: Option<String>,
    /// Upper bound a connection waits for its response to be finalised.
    #[serde(default = "default_response_timeout_ms")]
    #[ortho_config(default = default_response_timeout_ms())]
    pub response_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: default_listen_endpoint(),
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            discovery_mode: default_discovery_mode(),
            bus_fixture: None,
            domain_name: None,
            response_timeout_ms: default_response_timeout_ms(),
        }
    }
}

impl Config {
    /// Endpoint the dispatcher binds to.
    #[must_use]
    pub fn listen(&self) -> &SocketEndpoint {
        &self.listen
    }

    /// Filter expression handed to `tracing_subscriber::EnvFilter`.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Selected log format.
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Selected discovery strategy.
    #[must_use]
    pub fn discovery_mode(&self) -> DiscoveryMode {
        self.discovery_mode
    }

    /// Path of the bus fixture, when one is configured.
    #[must_use]
    pub fn bus_fixture(&self) -> Option<&Utf8Path> {
        self.bus_fixture.as_deref()
    }

    /// Domain used when reporting fully qualified host names.
    #[must_use]
    pub fn domain_name(&self) -> Option<&str> {
        self.domain_name.as_deref()
    }

    /// Timeout applied by the transport while awaiting a finalised response.
    #[must_use]
    pub fn response_timeout(&self) -> Duration {
        Duration::from_millis(self.response_timeout_ms)
    }
}
