#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the stats aggregation tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use price_map_ingest::interactive::{
    DEFAULT_BASE_DIR, DEFAULT_COUNTY_GEOJSON, DEFAULT_RAW_TOWN_GEOJSON, DEFAULT_TOWN_GEOJSON,
};
use price_map_ingest::{load_config, run_aggregate, run_dissolve, run_simplify};
use price_map_ingest_models::Granularity;
use price_map_ingest_models::progress::null_progress;
use price_map_spatial::simplify::DEFAULT_TOLERANCE_M;

#[derive(Parser)]
#[command(name = "price_map_ingest", about = "Real-estate price stats aggregation tool")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate per-town stats (county + town)
    Town {
        /// Directory containing quarter folders such as `2025-q4/`
        #[arg(long, default_value = DEFAULT_BASE_DIR)]
        base: PathBuf,
        /// Output JSON file
        #[arg(long, default_value = "stats_by_town_quarter.json")]
        out: PathBuf,
        /// Aggregation config TOML (defaults to the built-in one)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Aggregate per-county stats
    County {
        /// Directory containing quarter folders such as `2025-q4/`
        #[arg(long, default_value = DEFAULT_BASE_DIR)]
        base: PathBuf,
        /// Output JSON file
        #[arg(long, default_value = "stats_by_county_quarter.json")]
        out: PathBuf,
        /// Aggregation config TOML (defaults to the built-in one)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Trim and simplify the raw town boundaries for the web map
    Simplify {
        /// Raw town `GeoJSON` in WGS84 (converted from the MOI shapefile)
        #[arg(long, default_value = DEFAULT_RAW_TOWN_GEOJSON)]
        input: PathBuf,
        /// Simplified town `GeoJSON` output
        #[arg(long, default_value = DEFAULT_TOWN_GEOJSON)]
        out: PathBuf,
        /// Simplification tolerance in metres
        #[arg(long, default_value_t = DEFAULT_TOLERANCE_M)]
        tolerance: f64,
    },
    /// Dissolve town boundaries into county boundaries
    Dissolve {
        /// Town `GeoJSON`
        #[arg(long, default_value = DEFAULT_TOWN_GEOJSON)]
        input: PathBuf,
        /// County `GeoJSON` output
        #[arg(long, default_value = DEFAULT_COUNTY_GEOJSON)]
        out: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        let multi = price_map_cli_utils::init_logger();
        return price_map_ingest::interactive::run(&multi);
    };

    pretty_env_logger::init();

    match command {
        Commands::Town { base, out, config } => {
            let config = load_config(config.as_deref())?;
            run_aggregate(&base, &out, Granularity::Town, &config, &null_progress())?;
        }
        Commands::County { base, out, config } => {
            let config = load_config(config.as_deref())?;
            run_aggregate(&base, &out, Granularity::County, &config, &null_progress())?;
        }
        Commands::Simplify {
            input,
            out,
            tolerance,
        } => {
            run_simplify(&input, &out, tolerance)?;
        }
        Commands::Dissolve { input, out } => {
            run_dissolve(&input, &out)?;
        }
    }

    Ok(())
}
