//! Sensor discovery and projection for the Thermal and Power resources.
//!
//! Sensors live on whichever services expose the sensor value interface
//! below [`SENSORS_ROOT`]. The pipeline finds those services through the
//! object mapper, enumerates each one and projects every matching object
//! into the category's output collection.

mod category;
mod fields;
mod path;
mod pipeline;

pub use self::category::{POWER_CATEGORIES, SensorCategory, THERMAL_CATEGORIES};
pub use self::path::SensorPath;
pub use self::pipeline::{SensorQuery, collect_sensors, project_sensor};

/// Namespace every sensor object lives under.
pub const SENSORS_ROOT: &str = "/xyz/openbmc_project/sensors";

/// Interface carrying a sensor's reading.
pub const VALUE_INTERFACE: &str = "xyz.openbmc_project.Sensor.Value";

/// Inventory index consulted by index-filtered discovery.
pub const ENTITY_MANAGER_SERVICE: &str = "xyz.openbmc_project.EntityManager";

pub(crate) const SENSORS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::sensors");
