use super::fields;
use crate::projection::FieldSpec;

/// Sensor kind inferred from the category segment of an object path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SensorCategory {
    Temperature,
    Fan,
    Voltage,
    Power,
    Current,
}

/// Categories reported by the Thermal resource.
pub const THERMAL_CATEGORIES: &[SensorCategory] =
    &[SensorCategory::Temperature, SensorCategory::Fan];

/// Categories reported by the Power resource.
pub const POWER_CATEGORIES: &[SensorCategory] = &[
    SensorCategory::Voltage,
    SensorCategory::Power,
    SensorCategory::Current,
];

impl SensorCategory {
    /// Maps a path segment to its category. Tachometer fans report as `fan_tach`.
    #[must_use]
    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "temperature" => Some(Self::Temperature),
            "fan" | "fan_tach" => Some(Self::Fan),
            "voltage" => Some(Self::Voltage),
            "power" => Some(Self::Power),
            "current" => Some(Self::Current),
            _ => None,
        }
    }

    /// Output array the category's entries are appended to.
    #[must_use]
    pub const fn collection_key(self) -> &'static str {
        match self {
            Self::Temperature => "Temperatures",
            Self::Fan => "Fans",
            Self::Voltage => "Voltages",
            Self::Power | Self::Current => "PowerSupplies",
        }
    }

    /// Destination of the sensor's primary reading.
    #[must_use]
    pub const fn reading_key(self) -> &'static str {
        match self {
            Self::Temperature => "ReadingCelsius",
            Self::Fan => "Reading",
            Self::Voltage => "ReadingVolts",
            Self::Power | Self::Current => "LastPowerOutputWatts",
        }
    }

    #[must_use]
    pub const fn odata_type(self) -> &'static str {
        match self {
            Self::Temperature => "#Thermal.v1_3_0.Temperature",
            Self::Fan => "#Thermal.v1_3_0.Fan",
            Self::Voltage => "#Power.v1_0_0.Voltage",
            Self::Power | Self::Current => "#Power.v1_5_0.PowerSupply",
        }
    }

    /// Whether numeric fields are emitted as integers.
    #[must_use]
    pub const fn force_int(self) -> bool {
        matches!(self, Self::Fan)
    }

    /// Static field map used to project sensors of this category.
    #[must_use]
    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            Self::Temperature => &fields::TEMPERATURE,
            Self::Fan => &fields::FAN,
            Self::Voltage => &fields::VOLTAGE,
            Self::Power => &fields::POWER,
            Self::Current => &fields::CURRENT,
        }
    }
}
