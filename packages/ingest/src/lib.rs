#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregates the quarterly real-price registration CSVs into the stats
//! tables read by the map views.
//!
//! The input is a directory of quarter folders (`2025-q4/`), each holding
//! one `<code>_lvr_land_a.csv` per county. Rows are cleaned, grouped by
//! town or county, and reduced to a sample count and two medians.

pub mod aggregate;
pub mod config;
pub mod interactive;
pub mod parsing;
pub mod transactions;

pub use aggregate::{aggregate_dir, aggregate_quarter, median, replicate_city_wide, summarize};
pub use config::{default_config, load_config};
pub use parsing::{folder_to_quarter, roc_to_date};

use std::path::Path;
use std::sync::Arc;

use price_map_ingest_models::progress::ProgressCallback;
use price_map_ingest_models::{AggregateConfig, AggregateSummary, Granularity};
use thiserror::Error;

/// Errors that can occur during aggregation.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Reading a file or directory failed.
    #[error("I/O error for {location}: {source}")]
    Io {
        /// Path that failed.
        location: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// A CSV file could not be parsed.
    #[error("CSV error in {location}: {source}")]
    Csv {
        /// Path that failed.
        location: String,
        /// Underlying error.
        source: csv::Error,
    },

    /// A folder name is not of the form `YYYY-qN`.
    #[error("Invalid quarter folder name: {0} (expected like 2025-q4)")]
    InvalidQuarterFolder(String),

    /// The base directory holds no quarter folders.
    #[error("No quarter folders found under {0} (expected like 2025-q4/)")]
    NoQuarterFolders(String),

    /// The aggregation config is malformed.
    #[error("Invalid config {location}: {source}")]
    Config {
        /// Where the config came from.
        location: String,
        /// Underlying error.
        source: toml::de::Error,
    },

    /// Writing the stats table failed.
    #[error(transparent)]
    Stats(#[from] price_map_stats::StatsError),

    /// Reading or writing a boundary layer failed.
    #[error(transparent)]
    Spatial(#[from] price_map_spatial::SpatialError),
}

impl IngestError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            location: path.display().to_string(),
            source,
        }
    }
}

/// Aggregates `base` and writes the stats table to `out`.
///
/// # Errors
///
/// Returns [`IngestError`] if aggregation or writing fails.
pub fn run_aggregate(
    base: &Path,
    out: &Path,
    granularity: Granularity,
    config: &AggregateConfig,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<AggregateSummary, IngestError> {
    log::info!(
        "Aggregating {} by {granularity} into {}",
        base.display(),
        out.display()
    );
    let (table, summary) = aggregate_dir(base, granularity, config, progress)?;
    price_map_stats::load::write_table(out, &table)?;
    log::info!(
        "Wrote {} ({} quarters, {} rows kept, {} dropped)",
        out.display(),
        summary.quarters.len(),
        summary.rows_kept,
        summary.rows_dropped
    );
    Ok(summary)
}

/// Trims and simplifies the raw town layer at `input`, writing the map
/// layer to `out`.
///
/// Returns the number of town features written.
///
/// # Errors
///
/// Returns [`IngestError::Spatial`] if either file cannot be read or
/// written.
pub fn run_simplify(input: &Path, out: &Path, tolerance_m: f64) -> Result<usize, IngestError> {
    let raw = price_map_spatial::read_feature_collection(input)?;
    let towns = price_map_spatial::simplify::simplify_layer(&raw, tolerance_m);
    price_map_spatial::write_feature_collection(out, &towns)?;
    log::info!("Wrote {} ({} towns)", out.display(), towns.features.len());
    Ok(towns.features.len())
}

/// Dissolves the town layer at `input` into a county layer at `out`.
///
/// Returns the number of county features written.
///
/// # Errors
///
/// Returns [`IngestError::Spatial`] if either file cannot be read or
/// written.
pub fn run_dissolve(input: &Path, out: &Path) -> Result<usize, IngestError> {
    let towns = price_map_spatial::read_feature_collection(input)?;
    let counties = price_map_spatial::dissolve::dissolve_by_region(&towns);
    price_map_spatial::write_feature_collection(out, &counties)?;
    log::info!(
        "Wrote {} ({} counties)",
        out.display(),
        counties.features.len()
    );
    Ok(counties.features.len())
}

#[cfg(test)]
mod tests {
    use price_map_ingest_models::progress::null_progress;

    use super::*;

    const TOWNS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "COUNTYNAME": "臺北市", "TOWNNAME": "大安區" },
                "geometry": { "type": "Polygon", "coordinates": [[[0.0,0.0],[1.0,0.0],[1.0,1.0],[0.0,1.0],[0.0,0.0]]] }
            },
            {
                "type": "Feature",
                "properties": { "COUNTYNAME": "臺北市", "TOWNNAME": "信義區" },
                "geometry": { "type": "Polygon", "coordinates": [[[1.0,0.0],[2.0,0.0],[2.0,1.0],[1.0,1.0],[1.0,0.0]]] }
            }
        ]
    }"#;

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "price_map_ingest_lib_{name}_{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn simplify_then_dissolve_builds_both_layers() {
        let dir = scratch_dir("simplify");
        let raw = dir.join("towns_raw.geojson");
        let towns = dir.join("towns.geojson");
        let counties = dir.join("counties.geojson");
        std::fs::write(&raw, TOWNS).unwrap();

        assert_eq!(run_simplify(&raw, &towns, 300.0).unwrap(), 2);
        let written = price_map_spatial::read_feature_collection(&towns).unwrap();
        assert_eq!(
            written.features[1]
                .property("admin_key")
                .and_then(|v| v.as_str()),
            Some("臺北市信義區")
        );

        assert_eq!(run_dissolve(&towns, &counties).unwrap(), 1);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn simplify_fails_on_a_missing_input() {
        let dir = scratch_dir("simplify_missing");
        let err = run_simplify(&dir.join("nope.geojson"), &dir.join("out.geojson"), 300.0)
            .unwrap_err();
        assert!(matches!(err, IngestError::Spatial(_)));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn dissolve_writes_one_feature_per_county() {
        let dir = scratch_dir("dissolve");
        let input = dir.join("towns.geojson");
        let out = dir.join("counties.geojson");
        std::fs::write(&input, TOWNS).unwrap();

        assert_eq!(run_dissolve(&input, &out).unwrap(), 1);
        let counties = price_map_spatial::read_feature_collection(&out).unwrap();
        assert_eq!(
            price_map_spatial::region_name(&counties.features[0]),
            Some("臺北市")
        );

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn aggregate_writes_a_loadable_table() {
        let dir = scratch_dir("aggregate");
        let quarter = dir.join("2025-q1");
        std::fs::create_dir_all(&quarter).unwrap();
        std::fs::write(
            quarter.join("a_lvr_land_a.csv"),
            transactions::fixtures::TAIPEI,
        )
        .unwrap();
        let out = dir.join("stats.json");

        let summary = run_aggregate(
            &dir,
            &out,
            Granularity::Town,
            &default_config(),
            &null_progress(),
        )
        .unwrap();
        assert_eq!(summary.quarters, vec!["2025Q1"]);

        let text = std::fs::read_to_string(&out).unwrap();
        let table = price_map_stats::load::parse_table(&text).unwrap();
        assert_eq!(table.latest_quarter(), Some("2025Q1"));
        assert_eq!(
            price_map_stats::lookup(&table, "2025Q1", "臺北市大安區").map(|r| r.count),
            Some(2)
        );

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_input_is_an_error() {
        let dir = scratch_dir("missing");
        assert!(matches!(
            run_dissolve(&dir.join("nope.geojson"), &dir.join("out.geojson")),
            Err(IngestError::Spatial(_))
        ));
        assert!(matches!(
            run_aggregate(
                &dir.join("nope"),
                &dir.join("out.json"),
                Granularity::County,
                &default_config(),
                &null_progress(),
            ),
            Err(IngestError::Io { .. })
        ));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
