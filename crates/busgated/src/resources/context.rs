use busgate_config::DiscoveryMode;
use tracing::warn;

use super::RESOURCES_TARGET;
use crate::bus::DynBus;

/// Collaborators shared by every request handler.
#[derive(Clone)]
pub struct ServiceContext {
    bus: DynBus,
    discovery: DiscoveryMode,
    host_name: String,
    domain_name: Option<String>,
}

impl ServiceContext {
    /// Context over `bus`, reporting the host name of the running machine.
    #[must_use]
    pub fn new(bus: DynBus, discovery: DiscoveryMode) -> Self {
        Self {
            bus,
            discovery,
            host_name: system_host_name(),
            domain_name: None,
        }
    }

    #[must_use]
    pub fn with_host_name(mut self, host_name: impl Into<String>) -> Self {
        self.host_name = host_name.into();
        self
    }

    #[must_use]
    pub fn with_domain_name(mut self, domain_name: Option<String>) -> Self {
        self.domain_name = domain_name;
        self
    }

    /// Bus every backend call is issued on.
    #[must_use]
    pub fn bus(&self) -> &DynBus {
        &self.bus
    }

    #[must_use]
    pub fn discovery(&self) -> DiscoveryMode {
        self.discovery
    }

    #[must_use]
    pub fn host_name(&self) -> &str {
        &self.host_name
    }

    /// Host name qualified by the configured domain, when there is one.
    #[must_use]
    pub fn fqdn(&self) -> String {
        match self.domain_name.as_deref().filter(|domain| !domain.is_empty()) {
            Some(domain) => format!("{}.{domain}", self.host_name),
            None => self.host_name.clone(),
        }
    }
}

fn system_host_name() -> String {
    match nix::unistd::gethostname() {
        Ok(name) => name.to_string_lossy().into_owned(),
        Err(error) => {
            warn!(target: RESOURCES_TARGET, %error, "failed to read the host name");
            String::new()
        }
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ServiceContext")
            .field("discovery", &self.discovery)
            .field("host_name", &self.host_name)
            .field("domain_name", &self.domain_name)
            .finish_non_exhaustive()
    }
}

