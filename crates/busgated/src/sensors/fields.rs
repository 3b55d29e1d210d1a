//! Load-once field maps, one per sensor category.

use crate::projection::{FieldSpec, Transform};

use super::VALUE_INTERFACE;
use super::category::SensorCategory;

const WARNING: &str = "xyz.openbmc_project.Sensor.Threshold.Warning";
const CRITICAL: &str = "xyz.openbmc_project.Sensor.Threshold.Critical";
const FATAL: &str = "xyz.openbmc_project.Sensor.Threshold.Fatal";

/// Numeric conversion for every scaled field of `category`.
const fn numeric(category: SensorCategory) -> Transform {
    Transform::ScaledNumeric {
        force_int: category.force_int(),
    }
}

/// The primary reading of `category`.
const fn reading(category: SensorCategory) -> FieldSpec {
    FieldSpec::new(
        VALUE_INTERFACE,
        "Value",
        category.reading_key(),
        numeric(category),
    )
}

const FLOAT: Transform = numeric(SensorCategory::Temperature);
const INTEGER: Transform = numeric(SensorCategory::Fan);

const fn thresholds(transform: Transform) -> [FieldSpec; 6] {
    [
        FieldSpec::new(WARNING, "WarningHigh", "UpperThresholdNonCritical", transform),
        FieldSpec::new(WARNING, "WarningLow", "LowerThresholdNonCritical", transform),
        FieldSpec::new(CRITICAL, "CriticalHigh", "UpperThresholdCritical", transform),
        FieldSpec::new(CRITICAL, "CriticalLow", "LowerThresholdCritical", transform),
        FieldSpec::new(FATAL, "FatalHigh", "UpperThresholdFatal", transform),
        FieldSpec::new(FATAL, "FatalLow", "LowerThresholdFatal", transform),
    ]
}

const FLOAT_THRESHOLDS: [FieldSpec; 6] = thresholds(FLOAT);
const INTEGER_THRESHOLDS: [FieldSpec; 6] = thresholds(INTEGER);

const SENSOR_NUMBER: FieldSpec =
    FieldSpec::new(VALUE_INTERFACE, "SensorID", "SensorNumber", Transform::CopyIntVerbatim);

pub(super) static TEMPERATURE: [FieldSpec; 10] = [
    reading(SensorCategory::Temperature),
    FLOAT_THRESHOLDS[0],
    FLOAT_THRESHOLDS[1],
    FLOAT_THRESHOLDS[2],
    FLOAT_THRESHOLDS[3],
    FLOAT_THRESHOLDS[4],
    FLOAT_THRESHOLDS[5],
    FieldSpec::new(VALUE_INTERFACE, "MinValue", "MinReadingRangeTemp", FLOAT),
    FieldSpec::new(VALUE_INTERFACE, "MaxValue", "MaxReadingRangeTemp", FLOAT),
    SENSOR_NUMBER,
];

pub(super) static FAN: [FieldSpec; 9] = [
    reading(SensorCategory::Fan),
    INTEGER_THRESHOLDS[0],
    INTEGER_THRESHOLDS[1],
    INTEGER_THRESHOLDS[2],
    INTEGER_THRESHOLDS[3],
    INTEGER_THRESHOLDS[4],
    INTEGER_THRESHOLDS[5],
    FieldSpec::new(VALUE_INTERFACE, "MinValue", "MinReadingRange", INTEGER),
    FieldSpec::new(VALUE_INTERFACE, "MaxValue", "MaxReadingRange", INTEGER),
];

pub(super) static VOLTAGE: [FieldSpec; 8] = [
    reading(SensorCategory::Voltage),
    FLOAT_THRESHOLDS[0],
    FLOAT_THRESHOLDS[1],
    FLOAT_THRESHOLDS[2],
    FLOAT_THRESHOLDS[3],
    FLOAT_THRESHOLDS[4],
    FLOAT_THRESHOLDS[5],
    SENSOR_NUMBER,
];

pub(super) static POWER: [FieldSpec; 7] = [
    reading(SensorCategory::Power),
    FLOAT_THRESHOLDS[0],
    FLOAT_THRESHOLDS[1],
    FLOAT_THRESHOLDS[2],
    FLOAT_THRESHOLDS[3],
    FLOAT_THRESHOLDS[4],
    FLOAT_THRESHOLDS[5],
];

pub(super) static CURRENT: [FieldSpec; 9] = [
    reading(SensorCategory::Current),
    FLOAT_THRESHOLDS[0],
    FLOAT_THRESHOLDS[1],
    FLOAT_THRESHOLDS[2],
    FLOAT_THRESHOLDS[3],
    FLOAT_THRESHOLDS[4],
    FLOAT_THRESHOLDS[5],
    FieldSpec::new(VALUE_INTERFACE, "MinValue", "MinReadingRange", FLOAT),
    FieldSpec::new(VALUE_INTERFACE, "MaxValue", "MaxReadingRange", FLOAT),
];
