//! Test doubles shared by the daemon's unit and behavioural suites.

mod config_loader;
mod manual_bus;
mod reporter;
mod sink;

pub use config_loader::{FailingConfigLoader, TestConfigLoader};
pub use manual_bus::ManualBus;
pub use reporter::{HealthEvent, RecordingHealthReporter};
pub use sink::{MockSink, RecordingSink};

/// Snapshot served by the behavioural suites.
pub const DEMO_FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/demo-bus.json");
