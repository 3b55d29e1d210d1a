//! Configuration loaders for bootstrap scenarios.

use std::ffi::OsString;
use std::sync::Arc;

use camino::Utf8PathBuf;
use ortho_config::{OrthoConfig, OrthoError};

use busgate_config::{Config, SocketEndpoint};

use crate::bootstrap::ConfigLoader;

use super::DEMO_FIXTURE;

/// Loader that serves the demo fixture on an ephemeral loopback port.
pub struct TestConfigLoader {
    bus_fixture: Option<Utf8PathBuf>,
}

impl TestConfigLoader {
    pub fn new() -> Self {
        Self {
            bus_fixture: Some(Utf8PathBuf::from(DEMO_FIXTURE)),
        }
    }

    /// Loader whose configuration names `path` as the bus fixture.
    pub fn with_fixture(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            bus_fixture: Some(path.into()),
        }
    }
}

impl ConfigLoader for TestConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(Config {
            listen: SocketEndpoint::tcp("127.0.0.1", 0),
            bus_fixture: self.bus_fixture.clone(),
            ..Config::default()
        })
    }
}

/// Loader that fails by passing an unparseable listen endpoint.
pub struct FailingConfigLoader;

impl ConfigLoader for FailingConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        let args = vec![
            OsString::from("busgated"),
            OsString::from("--listen"),
            OsString::from("invalid://socket"),
        ];
        Config::load_from_iter(args)
    }
}
