#![allow(clippy::module_name_repetitions)]

//! Interactive TUI for the aggregation tool.
//!
//! Provides a menu-driven interface using `dialoguer` for running ingest
//! commands without memorizing CLI flags.

use std::path::PathBuf;
use std::time::Instant;

use dialoguer::{Input, Select};
use price_map_cli_utils::{IndicatifProgress, MultiProgress, prompt_optional, prompt_path};
use price_map_ingest_models::Granularity;
use price_map_spatial::simplify::DEFAULT_TOLERANCE_M;

/// Default directory holding the quarter folders.
pub const DEFAULT_BASE_DIR: &str = "land-data";

/// Default raw town boundary layer (MOI shapefile converted to `GeoJSON`).
pub const DEFAULT_RAW_TOWN_GEOJSON: &str = "taiwan-map-data/TOWN_MOI.geojson";

/// Default town boundary layer.
pub const DEFAULT_TOWN_GEOJSON: &str = "taiwan_town_simplified.geojson";

/// Default county boundary layer.
pub const DEFAULT_COUNTY_GEOJSON: &str = "taiwan_county_simplified.geojson";

/// Top-level actions available in the ingest interactive menu.
enum IngestAction {
    AggregateTowns,
    AggregateCounties,
    AggregateBoth,
    Simplify,
    Dissolve,
}

impl IngestAction {
    const ALL: &[Self] = &[
        Self::AggregateTowns,
        Self::AggregateCounties,
        Self::AggregateBoth,
        Self::Simplify,
        Self::Dissolve,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::AggregateTowns => "Aggregate town stats",
            Self::AggregateCounties => "Aggregate county stats",
            Self::AggregateBoth => "Aggregate town and county stats",
            Self::Simplify => "Simplify the raw town boundaries",
            Self::Dissolve => "Dissolve town boundaries into counties",
        }
    }
}

/// Runs the interactive menu, prompting the user to select and configure
/// one ingest operation.
///
/// # Errors
///
/// Returns an error if a prompt fails or the selected operation fails.
pub fn run(multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    let labels: Vec<&str> = IngestAction::ALL.iter().map(IngestAction::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match IngestAction::ALL[idx] {
        IngestAction::AggregateTowns => aggregate(multi, &[Granularity::Town])?,
        IngestAction::AggregateCounties => aggregate(multi, &[Granularity::County])?,
        IngestAction::AggregateBoth => {
            aggregate(multi, &[Granularity::Town, Granularity::County])?;
        }
        IngestAction::Simplify => simplify()?,
        IngestAction::Dissolve => dissolve()?,
    }

    Ok(())
}

fn aggregate(
    multi: &MultiProgress,
    granularities: &[Granularity],
) -> Result<(), Box<dyn std::error::Error>> {
    let base = prompt_path("Directory with quarter folders", DEFAULT_BASE_DIR)?;
    let config_path = prompt_optional("Config TOML (empty for built-in)")?.map(PathBuf::from);
    let config = crate::load_config(config_path.as_deref())?;

    for &granularity in granularities {
        let out = prompt_path(
            &format!("Output file ({granularity})"),
            granularity.default_output(),
        )?;
        let start = Instant::now();
        let progress = IndicatifProgress::quarters_bar(multi, &format!("{granularity} stats"));
        let summary = crate::run_aggregate(&base, &out, granularity, &config, &progress)?;
        log::info!(
            "{granularity}: {} quarters in {:.1}s",
            summary.quarters.len(),
            start.elapsed().as_secs_f64()
        );
    }

    Ok(())
}

fn simplify() -> Result<(), Box<dyn std::error::Error>> {
    let input = prompt_path("Raw town GeoJSON (WGS84)", DEFAULT_RAW_TOWN_GEOJSON)?;
    let out = prompt_path("Town GeoJSON output", DEFAULT_TOWN_GEOJSON)?;
    let tolerance: f64 = Input::new()
        .with_prompt("Tolerance (metres)")
        .default(DEFAULT_TOLERANCE_M)
        .interact_text()?;
    let start = Instant::now();
    let count = crate::run_simplify(&input, &out, tolerance)?;
    log::info!(
        "Simplified {count} towns in {:.1}s",
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

fn dissolve() -> Result<(), Box<dyn std::error::Error>> {
    let input = prompt_path("Town GeoJSON", DEFAULT_TOWN_GEOJSON)?;
    let out = prompt_path("County GeoJSON output", DEFAULT_COUNTY_GEOJSON)?;
    let start = Instant::now();
    let count = crate::run_dissolve(&input, &out)?;
    log::info!(
        "Dissolved into {count} counties in {:.1}s",
        start.elapsed().as_secs_f64()
    );
    Ok(())
}
