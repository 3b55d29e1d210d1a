//! Sensor discovery strategies.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How the sensor pipeline decides which bus objects belong to a chassis.
///
/// `DirectoryPrefixed` trusts the object mapper: every sensor under the
/// sensors namespace whose category was requested is reported.
/// `IndexFiltered` first asks the inventory index which sensors belong to the
/// requested chassis and reports only those, failing with *not found* when
/// the chassis owns nothing.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, Hash, EnumString, Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum DiscoveryMode {
    /// Filter by namespace prefix and category only.
    #[default]
    #[serde(alias = "directory_prefixed")]
    DirectoryPrefixed,
    /// Additionally filter by the chassis membership recorded in the inventory index.
    #[serde(alias = "index_filtered")]
    IndexFiltered,
}

impl DiscoveryMode {
    /// Returns `true` when an inventory lookup must precede discovery.
    #[must_use]
    pub fn requires_index(self) -> bool {
        matches!(self, Self::IndexFiltered)
    }
}

/// Errors encountered while parsing a [`DiscoveryMode`] from text.
pub type DiscoveryModeParseError = strum::ParseError;
