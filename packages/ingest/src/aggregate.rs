//! Groups cleaned transactions into per-quarter stats records.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use price_map_ingest_models::progress::ProgressCallback;
use price_map_ingest_models::{AggregateConfig, AggregateSummary, Granularity};
use price_map_stats_models::{EntityKey, PeriodLabel, PeriodStats, StatRecord, StatsTable};

use crate::IngestError;
use crate::parsing::{folder_to_quarter, is_quarter_folder};
use crate::transactions::{Transaction, read_city_csv};

/// Suffix of the per-county transaction files.
pub const CSV_SUFFIX: &str = "_lvr_land_a.csv";

/// Median of `values`; the mean of the middle two for an even count.
#[must_use]
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some(f64::midpoint(values[mid - 1], values[mid]))
    } else {
        Some(values[mid])
    }
}

/// Reduces transactions to one record per entity.
///
/// Medians are rounded to whole dollars, ties to even.
#[must_use]
pub fn summarize(transactions: Vec<Transaction>) -> PeriodStats {
    let mut groups: BTreeMap<EntityKey, (Vec<f64>, Vec<f64>)> = BTreeMap::new();
    for transaction in transactions {
        let (totals, units) = groups.entry(transaction.key).or_default();
        totals.push(transaction.total_price);
        units.push(transaction.unit_price_ping);
    }

    groups
        .into_iter()
        .map(|(key, (mut totals, mut units))| {
            let record = StatRecord {
                count: totals.len() as u64,
                median_total_price: median(&mut totals).map(f64::round_ties_even),
                median_unit_price_ping: median(&mut units).map(f64::round_ties_even),
                synthetic: false,
            };
            (key, record)
        })
        .collect()
}

/// Copies a city-wide record onto each of `districts`.
///
/// Applies only when the city has exactly one record; that record is
/// replaced by one synthetic record per district.
pub fn replicate_city_wide(stats: &mut PeriodStats, city: &str, districts: &[String]) {
    let keys: Vec<EntityKey> = stats
        .keys()
        .filter(|key| key.starts_with(city))
        .cloned()
        .collect();
    let [key] = keys.as_slice() else {
        return;
    };
    let Some(base) = stats.remove(key) else {
        return;
    };

    log::debug!("Replicating {key} to {} districts", districts.len());
    for district in districts {
        stats.insert(
            price_map_stats::entity_key(city, district),
            StatRecord {
                synthetic: true,
                ..base.clone()
            },
        );
    }
}

fn county_csvs(dir: &Path) -> Result<Vec<PathBuf>, IngestError> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| IngestError::io(dir, e))? {
        let path = entry.map_err(|e| IngestError::io(dir, e))?.path();
        let is_csv = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(CSV_SUFFIX));
        if is_csv && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Aggregates one quarter folder.
///
/// Returns `None` when no file yields a usable row.
///
/// # Errors
///
/// Returns [`IngestError`] if the folder or a CSV cannot be read.
pub fn aggregate_quarter(
    dir: &Path,
    granularity: Granularity,
    config: &AggregateConfig,
    summary: &mut AggregateSummary,
) -> Result<Option<PeriodStats>, IngestError> {
    let mut transactions = Vec::new();

    for path in county_csvs(dir)? {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let Some(county) = name.chars().next().and_then(|c| config.county_for_code(c)) else {
            log::info!("Skipping unknown county code: {name}");
            summary.files_skipped += 1;
            continue;
        };

        log::debug!("Reading {name} -> {county}");
        let parsed = read_city_csv(&path, county, granularity, config)?;
        summary.files_read += 1;
        summary.rows_kept += parsed.transactions.len() as u64;
        summary.rows_dropped += parsed.dropped;
        transactions.extend(parsed.transactions);
    }

    if transactions.is_empty() {
        log::warn!("No usable rows in {}", dir.display());
        return Ok(None);
    }

    let mut stats = summarize(transactions);
    if granularity == Granularity::Town {
        for (city, districts) in &config.city_wide {
            replicate_city_wide(&mut stats, city, districts);
        }
    }
    stats.retain(|_, record| record.meets_count(config.min_sample_count));

    Ok(Some(stats))
}

/// Finds the quarter folders under `base`, ordered by period.
///
/// # Errors
///
/// * [`IngestError::Io`] if `base` cannot be listed
/// * [`IngestError::NoQuarterFolders`] if there are none
pub fn quarter_dirs(base: &Path) -> Result<Vec<(PeriodLabel, PathBuf)>, IngestError> {
    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(base).map_err(|e| IngestError::io(base, e))? {
        let path = entry.map_err(|e| IngestError::io(base, e))?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if path.is_dir() && is_quarter_folder(name) {
            dirs.push((folder_to_quarter(name)?, path));
        }
    }
    if dirs.is_empty() {
        return Err(IngestError::NoQuarterFolders(base.display().to_string()));
    }
    dirs.sort();
    Ok(dirs)
}

/// Aggregates every quarter folder under `base` into a stats table.
///
/// # Errors
///
/// Returns [`IngestError`] if `base` has no quarter folders or any file
/// cannot be read.
pub fn aggregate_dir(
    base: &Path,
    granularity: Granularity,
    config: &AggregateConfig,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<(StatsTable, AggregateSummary), IngestError> {
    let dirs = quarter_dirs(base)?;
    progress.set_total(dirs.len() as u64);

    let mut table = StatsTable::default();
    let mut summary = AggregateSummary::default();

    for (quarter, dir) in dirs {
        progress.set_message(format!("Aggregating {quarter} ({granularity})"));
        if let Some(stats) = aggregate_quarter(&dir, granularity, config, &mut summary)? {
            log::info!("{quarter}: {} entities", stats.len());
            table.quarters.push(quarter.clone());
            table.data.insert(quarter, stats);
        }
        progress.inc(1);
    }

    summary.quarters.clone_from(&table.quarters);
    progress.finish(format!(
        "Aggregated {} quarters ({} rows kept, {} dropped)",
        summary.quarters.len(),
        summary.rows_kept,
        summary.rows_dropped
    ));

    Ok((table, summary))
}
