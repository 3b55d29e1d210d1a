//! Management daemon that answers Redfish-style resource requests by
//! aggregating properties from an asynchronous property bus.
//!
//! Each request is routed to a resource handler, which opens one
//! [`aggregate::Scope`] over the connection's response sink and fans out
//! bus calls. Every callback holds its own scope handle; when the last one
//! is released the accumulated document (or the first recorded error) is
//! sent exactly once. All callbacks run on a single [`bus::EventLoop`]
//! thread, so a document is never written by two callbacks at the same
//! time.
//!
//! Sensor resources are built by the pipeline in [`sensors`]: discover the
//! services that own sensor objects, fetch each service's objects and
//! project the requested categories through the field tables in
//! [`projection`].

pub mod aggregate;
mod bootstrap;
pub mod bus;
pub mod dispatch;
mod health;
mod process;
pub mod projection;
pub mod resources;
pub mod sensors;
mod telemetry;
pub mod transport;

pub use bootstrap::{
    BootstrapError, ConfigLoader, Daemon, StaticConfigLoader, SystemConfigLoader, bootstrap_with,
};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use process::{
    LaunchError, ShutdownError, ShutdownSignal, SystemShutdownSignal, run_daemon, run_daemon_with,
};
pub use telemetry::{TelemetryError, TelemetryHandle};

#[cfg(test)]
mod tests;
