use crate::discovery::DiscoveryMode;
use crate::logging::LogFormat;
use crate::socket::SocketEndpoint;

/// Port the management service has historically listened on.
pub const DEFAULT_LISTEN_PORT: u16 = 18080;

/// Default log filter expression used by the daemon.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default transport wait for a finalised response, in milliseconds.
pub const DEFAULT_RESPONSE_TIMEOUT_MS: u64 = 5_000;

/// Default log filter expression used by the daemon.
#[must_use]
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format.
#[must_use]
pub fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// Default sensor discovery strategy.
#[must_use]
pub fn default_discovery_mode() -> DiscoveryMode {
    DiscoveryMode::DirectoryPrefixed
}

/// Loopback TCP endpoint on [`DEFAULT_LISTEN_PORT`].
#[must_use]
pub fn default_listen_endpoint() -> SocketEndpoint {
    SocketEndpoint::tcp("127.0.0.1", DEFAULT_LISTEN_PORT)
}

#[must_use]
pub fn default_response_timeout_ms() -> u64 {
    DEFAULT_RESPONSE_TIMEOUT_MS
}
