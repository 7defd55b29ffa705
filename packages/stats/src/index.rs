//! Pure lookups over a loaded [`StatsTable`].

use price_map_stats_models::{
    EntityKey, Lookup, MetricKind, PeriodStats, StatRecord, StatsTable, TrendSeries,
};

/// Builds the entity key for a region and optional sub-region name.
///
/// The names are concatenated without a separator and the result is
/// trimmed, so `("Taipei", " Daan ")` gives `"TaipeiDaan"`. Whitespace
/// between the two names is kept; the upstream producer never emits it.
#[must_use]
pub fn entity_key(region: &str, sub_region: &str) -> EntityKey {
    let mut key = String::with_capacity(region.len() + sub_region.len());
    key.push_str(region);
    key.push_str(sub_region);
    key.trim().to_string()
}

/// Looks up the record of `key` in `period`.
///
/// A missing period and a missing entity both give `None`; use
/// [`lookup_detailed`] to tell them apart.
#[must_use]
pub fn lookup<'a>(table: &'a StatsTable, period: &str, key: &str) -> Option<&'a StatRecord> {
    lookup_detailed(table, period, key).record()
}

/// Looks up the record of `key` in `period`, reporting which level was
/// missing.
#[must_use]
pub fn lookup_detailed<'a>(table: &'a StatsTable, period: &str, key: &str) -> Lookup<'a> {
    let Some(records) = table.period(period) else {
        return Lookup::PeriodAbsent;
    };
    records
        .get(key)
        .map_or(Lookup::EntityAbsent, Lookup::Found)
}

/// Collects the `metric` values of every record eligible for
/// classification.
///
/// A record is eligible when its key starts with `parent_prefix`, its
/// `count` is at least `min_count`, and the metric value is present.
/// Order of the result follows key order and carries no meaning.
#[must_use]
pub fn filter_eligible(
    records: &PeriodStats,
    parent_prefix: &str,
    min_count: u64,
    metric: MetricKind,
) -> Vec<f64> {
    records
        .iter()
        .filter(|(key, record)| key.starts_with(parent_prefix) && record.meets_count(min_count))
        .filter_map(|(_, record)| record.value(metric))
        .collect()
}

/// Extracts the `metric` value of `key` for every quarter of the table.
#[must_use]
pub fn series(table: &StatsTable, key: &str, metric: MetricKind) -> TrendSeries {
    let values = table
        .quarters
        .iter()
        .map(|quarter| lookup(table, quarter, key).and_then(|record| record.value(metric)))
        .collect();

    TrendSeries {
        quarters: table.quarters.clone(),
        values,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn record(count: u64, total: Option<f64>) -> StatRecord {
        StatRecord {
            count,
            median_total_price: total,
            median_unit_price_ping: total.map(|t| t / 100.0),
            synthetic: false,
        }
    }

    fn table() -> StatsTable {
        let mut q1 = PeriodStats::new();
        q1.insert("TaipeiDaan".to_string(), record(40, Some(15_000_000.0)));
        q1.insert("TaipeiXinyi".to_string(), record(9, Some(20_000_000.0)));
        q1.insert("TaipeiWanhua".to_string(), record(10, Some(8_000_000.0)));
        q1.insert("TaipeiBeitou".to_string(), record(25, None));
        q1.insert("TaichungXitun".to_string(), record(50, Some(9_000_000.0)));

        let mut q2 = PeriodStats::new();
        q2.insert("TaipeiXinyi".to_string(), record(30, Some(21_000_000.0)));

        StatsTable {
            quarters: vec!["2023Q1".to_string(), "2023Q2".to_string()],
            data: BTreeMap::from([("2023Q1".to_string(), q1), ("2023Q2".to_string(), q2)]),
        }
    }

    #[test]
    fn entity_key_trims_and_concatenates() {
        assert_eq!(entity_key("Taipei", " Daan "), "TaipeiDaan");
        assert_eq!(entity_key(" Taipei", ""), "Taipei");
        assert_eq!(entity_key("", ""), "");
    }

    #[test]
    fn lookup_distinguishes_missing_period_from_missing_entity() {
        let table = table();
        assert!(matches!(
            lookup_detailed(&table, "2023Q1", "TaipeiDaan"),
            Lookup::Found(r) if r.count == 40
        ));
        assert_eq!(
            lookup_detailed(&table, "2023Q2", "TaipeiDaan"),
            Lookup::EntityAbsent
        );
        assert_eq!(
            lookup_detailed(&table, "2024Q1", "TaipeiDaan"),
            Lookup::PeriodAbsent
        );
        assert!(lookup(&table, "2023Q2", "TaipeiDaan").is_none());
        assert!(lookup(&table, "2024Q1", "TaipeiDaan").is_none());
    }

    #[test]
    fn filter_eligible_applies_count_floor_inclusively() {
        let table = table();
        let records = table.period("2023Q1").unwrap();
        let mut values = filter_eligible(records, "Taipei", 10, MetricKind::TotalPriceMedian);
        values.sort_by(f64::total_cmp);

        // Xinyi (count 9) is out, Wanhua (count 10) is in, Beitou has no
        // value, Xitun belongs to another county.
        assert_eq!(values, vec![8_000_000.0, 15_000_000.0]);
    }

    #[test]
    fn filter_eligible_with_unknown_prefix_is_empty() {
        let table = table();
        let records = table.period("2023Q1").unwrap();
        assert!(filter_eligible(records, "Kaohsiung", 10, MetricKind::UnitPriceMedian).is_empty());
    }

    #[test]
    fn series_fills_missing_periods_with_none() {
        let table = table();
        let trend = series(&table, "TaipeiDaan", MetricKind::TotalPriceMedian);
        assert_eq!(trend.quarters, vec!["2023Q1", "2023Q2"]);
        assert_eq!(trend.values, vec![Some(15_000_000.0), None]);
    }

    #[test]
    fn series_reports_missing_metric_as_none() {
        let table = table();
        let trend = series(&table, "TaipeiBeitou", MetricKind::UnitPriceMedian);
        assert_eq!(trend.values, vec![None, None]);
    }
}
