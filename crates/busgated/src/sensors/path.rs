/// Category and sensor name parsed from a sensor object path.
///
/// Paths have the shape `/xyz/openbmc_project/sensors/<category>/<name>`;
/// anything shorter is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorPath<'a> {
    /// Raw category segment, such as `temperature` or `fan_tach`.
    pub category: &'a str,
    /// Sensor name; reported as the entry's `Name` and `MemberId`.
    pub name: &'a str,
}

const CATEGORY_SEGMENT: usize = 4;
const NAME_SEGMENT: usize = 5;

impl<'a> SensorPath<'a> {
    /// Splits `path`, ignoring segments past the name.
    #[must_use]
    pub fn parse(path: &'a str) -> Option<Self> {
        let mut segments = path.split('/');
        let category = segments.nth(CATEGORY_SEGMENT)?;
        let name = segments.nth(NAME_SEGMENT - CATEGORY_SEGMENT - 1)?;
        Some(Self { category, name })
    }
}
