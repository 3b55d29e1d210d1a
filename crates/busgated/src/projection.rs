//! Field maps and the pure projection of bus properties into documents.
//!
//! A field map is static data: each [`FieldSpec`] names a source interface
//! and property, the destination key, and how the value is converted.
//! Projection never fails; missing or mistyped properties are omitted.

use tracing::trace;

use crate::aggregate::{Document, Node};
use crate::bus::{InterfaceMap, PropertyMap, PropertyValue};

const PROJECTION_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::projection");

/// Property carrying the decimal exponent of a reading.
pub const SCALE_PROPERTY: &str = "Scale";

/// Conversion applied to one projected property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// String values only.
    CopyString,
    /// Boolean values only.
    CopyBool,
    /// Any value, unmodified.
    CopyIntVerbatim,
    /// Numeric values multiplied by `10^scale`.
    ScaledNumeric { force_int: bool },
}

/// One row of a field map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub interface: &'static str,
    pub property: &'static str,
    pub destination: &'static str,
    pub transform: Transform,
}

impl FieldSpec {
    #[must_use]
    pub const fn new(
        interface: &'static str,
        property: &'static str,
        destination: &'static str,
        transform: Transform,
    ) -> Self {
        Self {
            interface,
            property,
            destination,
            transform,
        }
    }
}

/// Reads the `Scale` property from `properties`, defaulting to zero.
#[must_use]
pub fn scale_of(properties: Option<&PropertyMap>) -> i64 {
    properties
        .and_then(|map| map.get(SCALE_PROPERTY))
        .and_then(PropertyValue::as_i64)
        .unwrap_or(0)
}

/// Copies every field of `fields` present in `interfaces` into `target`.
///
/// Returns the number of fields written.
pub fn project_fields(
    fields: &[FieldSpec],
    interfaces: &InterfaceMap,
    scale: i64,
    target: &mut Document,
) -> usize {
    let mut written = 0;
    for field in fields {
        let Some(value) = interfaces
            .get(field.interface)
            .and_then(|properties| properties.get(field.property))
        else {
            continue;
        };
        match convert(value, field.transform, scale) {
            Some(node) => {
                target.insert(field.destination, node);
                written += 1;
            }
            None => trace!(
                target: PROJECTION_TARGET,
                property = field.property,
                destination = field.destination,
                "property type does not match its field; omitted"
            ),
        }
    }
    written
}

/// Converts one property value according to `transform`.
#[must_use]
pub fn convert(value: &PropertyValue, transform: Transform, scale: i64) -> Option<Node> {
    match transform {
        Transform::CopyString => value.as_str().map(Node::from),
        Transform::CopyBool => value.as_bool().map(Node::from),
        Transform::CopyIntVerbatim => Some(raw(value)),
        Transform::ScaledNumeric { force_int } => Some(scaled(value, scale, force_int)),
    }
}

/// Applies `10^scale` to a numeric value; non-numeric values pass through.
///
/// Integer readings stay integers while the scale is non-negative. Forced
/// fields are truncated to integers whatever the scale.
#[must_use]
pub fn scaled(value: &PropertyValue, scale: i64, force_int: bool) -> Node {
    let raw_number = match value {
        PropertyValue::Int(number) => {
            if let Some(exact) = scale_integer(*number, scale) {
                return Node::Integer(exact);
            }
            *number as f64
        }
        PropertyValue::UInt(number) => match i64::try_from(*number) {
            Ok(signed) => return scaled(&PropertyValue::Int(signed), scale, force_int),
            Err(_) => *number as f64,
        },
        PropertyValue::Double(number) => *number,
        PropertyValue::Bool(_) | PropertyValue::Str(_) | PropertyValue::List(_) => {
            return raw(value);
        }
    };
    let scaled = apply_scale(raw_number, scale);
    if force_int {
        Node::Integer(scaled.trunc() as i64)
    } else {
        Node::Float(scaled)
    }
}

fn apply_scale(number: f64, scale: i64) -> f64 {
    let exponent = i32::try_from(scale.unsigned_abs()).unwrap_or(i32::MAX);
    let factor = 10_f64.powi(exponent);
    if scale < 0 {
        number / factor
    } else {
        number * factor
    }
}

fn scale_integer(number: i64, scale: i64) -> Option<i64> {
    let exponent = u32::try_from(scale).ok()?;
    10_i64
        .checked_pow(exponent)
        .and_then(|factor| number.checked_mul(factor))
}

fn raw(value: &PropertyValue) -> Node {
    match value {
        PropertyValue::Bool(flag) => Node::Bool(*flag),
        PropertyValue::Int(number) => Node::Integer(*number),
        PropertyValue::UInt(number) => Node::Unsigned(*number),
        PropertyValue::Double(number) => Node::Float(*number),
        PropertyValue::Str(text) => Node::String(text.clone()),
        PropertyValue::List(items) => Node::Array(items.iter().map(raw).collect()),
    }
}
