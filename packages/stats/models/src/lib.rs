#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregated real-estate price statistics types.
//!
//! The stats table is produced offline (see `price_map_ingest`) and loaded
//! once per session. It maps a reporting period (e.g. `"2023Q1"`) to the
//! per-entity records of that period, where an entity is a county or a
//! town within a county identified by its [`EntityKey`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A reporting period label such as `"2025Q4"`.
pub type PeriodLabel = String;

/// Composite key identifying a county or a town-within-county record.
///
/// Built as `trim(county_name + town_name)` with no separator. This is a
/// contract with the data producer, not something derivable from geometry.
pub type EntityKey = String;

/// All records of one period, keyed by entity.
pub type PeriodStats = BTreeMap<EntityKey, StatRecord>;

/// The metric a view is colored and charted by.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum MetricKind {
    /// Median total transaction price, in NT$.
    #[default]
    #[serde(rename = "median_total_price")]
    #[strum(serialize = "median_total_price")]
    TotalPriceMedian,
    /// Median unit price, in NT$ per ping.
    #[serde(rename = "median_unit_price_ping")]
    #[strum(serialize = "median_unit_price_ping")]
    UnitPriceMedian,
}

impl MetricKind {
    /// Every metric, in selector order.
    pub const ALL: &[Self] = &[Self::TotalPriceMedian, Self::UnitPriceMedian];
}

/// Aggregated sales for one entity in one period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatRecord {
    /// Number of cleaned transactions behind the medians.
    #[serde(default)]
    pub count: u64,
    /// Median total price.
    #[serde(default)]
    pub median_total_price: Option<f64>,
    /// Median unit price per ping.
    #[serde(default)]
    pub median_unit_price_ping: Option<f64>,
    /// Set when the record was copied from city-wide statistics onto a
    /// district that had no district-level data of its own.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub synthetic: bool,
}

impl StatRecord {
    /// Returns the value of `metric`, if present.
    #[must_use]
    pub const fn value(&self, metric: MetricKind) -> Option<f64> {
        match metric {
            MetricKind::TotalPriceMedian => self.median_total_price,
            MetricKind::UnitPriceMedian => self.median_unit_price_ping,
        }
    }

    /// Whether the record has at least `min_count` samples.
    #[must_use]
    pub const fn meets_count(&self, min_count: u64) -> bool {
        self.count >= min_count
    }
}

/// Per-period, per-entity statistics as loaded from the stats JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsTable {
    /// Period labels in chronological order.
    #[serde(default)]
    pub quarters: Vec<PeriodLabel>,
    /// Period label to that period's records.
    #[serde(default)]
    pub data: BTreeMap<PeriodLabel, PeriodStats>,
}

impl StatsTable {
    /// Returns the records of `period`, if the period is in the table.
    #[must_use]
    pub fn period(&self, period: &str) -> Option<&PeriodStats> {
        self.data.get(period)
    }

    /// Returns the most recent period label.
    #[must_use]
    pub fn latest_quarter(&self) -> Option<&str> {
        self.quarters.last().map(String::as_str)
    }

    /// Whether `period` is one of the listed quarters.
    #[must_use]
    pub fn has_quarter(&self, period: &str) -> bool {
        self.quarters.iter().any(|q| q == period)
    }
}

/// Outcome of looking a record up in a [`StatsTable`].
///
/// Keeps "no such period" distinct from "no such entity in that period".
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    /// The record exists.
    Found(&'a StatRecord),
    /// The period exists but holds no record for the entity.
    EntityAbsent,
    /// The period itself is missing from the table.
    PeriodAbsent,
}

impl<'a> Lookup<'a> {
    /// Collapses the lookup into an optional record.
    #[must_use]
    pub const fn record(self) -> Option<&'a StatRecord> {
        match self {
            Self::Found(record) => Some(record),
            Self::EntityAbsent | Self::PeriodAbsent => None,
        }
    }
}

/// One metric value per period for a single entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSeries {
    /// Period labels, same order as the table's quarters.
    pub quarters: Vec<PeriodLabel>,
    /// Metric value per period; `None` where the record or value is missing.
    pub values: Vec<Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_wire_names_match_stats_fields() {
        assert_eq!(MetricKind::TotalPriceMedian.to_string(), "median_total_price");
        assert_eq!(
            "median_unit_price_ping".parse::<MetricKind>().unwrap(),
            MetricKind::UnitPriceMedian
        );
        assert!("median_price".parse::<MetricKind>().is_err());
    }

    #[test]
    fn record_value_picks_metric_field() {
        let record = StatRecord {
            count: 12,
            median_total_price: Some(15_000_000.0),
            median_unit_price_ping: None,
            synthetic: false,
        };
        assert_eq!(
            record.value(MetricKind::TotalPriceMedian),
            Some(15_000_000.0)
        );
        assert_eq!(record.value(MetricKind::UnitPriceMedian), None);
        assert!(record.meets_count(12));
        assert!(!record.meets_count(13));
    }

    #[test]
    fn deserializes_stats_json_with_missing_fields() {
        let json = r#"{
            "quarters": ["2023Q1", "2023Q2"],
            "data": {
                "2023Q1": {
                    "TaipeiDaan": { "count": 40, "median_total_price": 15000000 },
                    "TaipeiXinyi": { "count": 3, "median_unit_price_ping": 900000, "synthetic": true }
                }
            }
        }"#;
        let table: StatsTable = serde_json::from_str(json).unwrap();

        assert_eq!(table.latest_quarter(), Some("2023Q2"));
        assert!(table.has_quarter("2023Q1"));
        assert!(table.period("2023Q2").is_none());

        let q1 = table.period("2023Q1").unwrap();
        assert_eq!(q1["TaipeiDaan"].median_unit_price_ping, None);
        assert!(!q1["TaipeiDaan"].synthetic);
        assert!(q1["TaipeiXinyi"].synthetic);
    }

    #[test]
    fn synthetic_flag_is_omitted_when_false() {
        let json = serde_json::to_value(StatRecord {
            count: 1,
            median_total_price: Some(1.0),
            median_unit_price_ping: Some(2.0),
            synthetic: false,
        })
        .unwrap();
        assert!(json.get("synthetic").is_none());
    }

    #[test]
    fn lookup_collapses_to_record() {
        let record = StatRecord::default();
        assert_eq!(Lookup::Found(&record).record(), Some(&record));
        assert_eq!(Lookup::EntityAbsent.record(), None);
        assert_eq!(Lookup::PeriodAbsent.record(), None);
    }
}
