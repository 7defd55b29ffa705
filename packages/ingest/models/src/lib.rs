#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation configuration, progress, and result types.

pub mod progress;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Which entity level transactions are grouped by.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Granularity {
    /// One record per county + town.
    #[default]
    Town,
    /// One record per county.
    County,
}

impl Granularity {
    /// Default output file name for this granularity.
    #[must_use]
    pub const fn default_output(self) -> &'static str {
        match self {
            Self::Town => "stats_by_town_quarter.json",
            Self::County => "stats_by_county_quarter.json",
        }
    }
}

/// Row filters applied before aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CleaningThresholds {
    /// Rows must have a total price strictly above this, in NT$.
    pub min_total_price: f64,
    /// Rows must have a unit price strictly above this, in NT$ per ping.
    pub min_unit_price_ping: f64,
    /// Rows must have a unit price strictly below this, in NT$ per ping.
    pub max_unit_price_ping: f64,
}

/// Everything the aggregation needs besides the input directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateConfig {
    /// First letter of a CSV file name to county name.
    pub counties: BTreeMap<String, String>,
    /// Cities whose CSVs may lack district information, with the districts
    /// that receive the city-wide record.
    #[serde(default)]
    pub city_wide: BTreeMap<String, Vec<String>>,
    /// Row filters.
    pub cleaning: CleaningThresholds,
    /// Records with fewer samples are left out of the output.
    #[serde(default = "default_min_sample_count")]
    pub min_sample_count: u64,
}

const fn default_min_sample_count() -> u64 {
    1
}

impl AggregateConfig {
    /// Looks up the county for a CSV file code letter, case-insensitively.
    #[must_use]
    pub fn county_for_code(&self, code: char) -> Option<&str> {
        self.counties
            .get(&code.to_ascii_lowercase().to_string())
            .map(String::as_str)
    }
}

/// Outcome of aggregating one input directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregateSummary {
    /// Quarters written, in order.
    pub quarters: Vec<String>,
    /// CSV files read.
    pub files_read: u64,
    /// CSV files skipped for an unknown county code.
    pub files_skipped: u64,
    /// Rows that passed cleaning.
    pub rows_kept: u64,
    /// Rows dropped for a bad date or by cleaning.
    pub rows_dropped: u64,
}
