//! Full pipeline orchestrator for the price map toolchain.
//!
//! Chains simplify -> dissolve -> town stats -> county stats in a single interactive
//! flow, producing every file the server loads into one data directory.

use std::path::{Path, PathBuf};
use std::time::Instant;

use dialoguer::{Confirm, MultiSelect};
use price_map_cli_utils::{IndicatifProgress, MultiProgress, prompt_optional, prompt_path};
use price_map_ingest::interactive::{DEFAULT_BASE_DIR, DEFAULT_RAW_TOWN_GEOJSON};
use price_map_ingest_models::Granularity;
use price_map_ingest_models::progress::ProgressCallback;
use price_map_spatial::simplify::DEFAULT_TOLERANCE_M;

/// Steps available in the pipeline.
enum PipelineStep {
    Simplify,
    Dissolve,
    TownStats,
    CountyStats,
}

impl PipelineStep {
    const ALL: &[Self] = &[
        Self::Simplify,
        Self::Dissolve,
        Self::TownStats,
        Self::CountyStats,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Simplify => "Simplify town boundaries",
            Self::Dissolve => "Dissolve county boundaries",
            Self::TownStats => "Aggregate town stats",
            Self::CountyStats => "Aggregate county stats",
        }
    }
}

/// Runs the selected pipeline steps, writing into one output directory.
///
/// # Errors
///
/// Returns an error if a prompt fails or any pipeline step fails.
pub fn run(multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline_start = Instant::now();

    let step_labels: Vec<&str> = PipelineStep::ALL.iter().map(PipelineStep::label).collect();
    let defaults = vec![true; PipelineStep::ALL.len()];

    let selected = MultiSelect::new()
        .with_prompt("Pipeline steps (space=toggle, a=all, enter=confirm)")
        .items(&step_labels)
        .defaults(&defaults)
        .interact()?;

    if selected.is_empty() {
        println!("No steps selected.");
        return Ok(());
    }

    let steps: Vec<&PipelineStep> = selected.iter().map(|&i| &PipelineStep::ALL[i]).collect();
    let needs_stats = steps
        .iter()
        .any(|s| matches!(s, PipelineStep::TownStats | PipelineStep::CountyStats));

    let out_dir = prompt_path("Output data directory", "data")?;
    let towns_geojson = out_dir.join(price_map_server::TOWN_GEOJSON);
    let raw_towns = if steps.iter().any(|s| matches!(s, PipelineStep::Simplify)) {
        Some(prompt_path("Raw town GeoJSON (WGS84)", DEFAULT_RAW_TOWN_GEOJSON)?)
    } else {
        None
    };
    let (base, config) = if needs_stats {
        let base = prompt_path("Directory with quarter folders", DEFAULT_BASE_DIR)?;
        let config_path = prompt_optional("Config TOML (empty for built-in)")?.map(PathBuf::from);
        (Some(base), Some(price_map_ingest::load_config(config_path.as_deref())?))
    } else {
        (None, None)
    };

    if !Confirm::new()
        .with_prompt(format!(
            "Run {} step(s) into {}?",
            steps.len(),
            out_dir.display()
        ))
        .default(true)
        .interact()?
    {
        println!("Cancelled.");
        return Ok(());
    }

    std::fs::create_dir_all(&out_dir)?;

    let overall = IndicatifProgress::steps_bar(multi, "Pipeline", steps.len() as u64);

    for step in steps {
        overall.set_message(step.label().to_string());
        let start = Instant::now();

        match step {
            PipelineStep::Simplify => {
                if let Some(input) = &raw_towns {
                    let count = price_map_ingest::run_simplify(
                        input,
                        &towns_geojson,
                        DEFAULT_TOLERANCE_M,
                    )?;
                    log::info!("Simplified {count} towns");
                }
            }
            PipelineStep::Dissolve => {
                let out = out_dir.join(price_map_server::COUNTY_GEOJSON);
                let count = price_map_ingest::run_dissolve(&towns_geojson, &out)?;
                log::info!("Dissolved into {count} counties");
            }
            PipelineStep::TownStats => {
                aggregate(multi, base.as_deref(), config.as_ref(), &out_dir, Granularity::Town)?;
            }
            PipelineStep::CountyStats => {
                aggregate(multi, base.as_deref(), config.as_ref(), &out_dir, Granularity::County)?;
            }
        }

        log::info!(
            "{} completed in {:.1}s",
            step.label(),
            start.elapsed().as_secs_f64()
        );
        overall.inc(1);
    }

    overall.finish(format!(
        "Pipeline finished in {:.1}s",
        pipeline_start.elapsed().as_secs_f64()
    ));

    Ok(())
}

fn aggregate(
    multi: &MultiProgress,
    base: Option<&Path>,
    config: Option<&price_map_ingest_models::AggregateConfig>,
    out_dir: &Path,
    granularity: Granularity,
) -> Result<(), Box<dyn std::error::Error>> {
    let (Some(base), Some(config)) = (base, config) else {
        return Ok(());
    };
    let file = match granularity {
        Granularity::Town => price_map_server::TOWN_STATS,
        Granularity::County => price_map_server::COUNTY_STATS,
    };
    let progress = IndicatifProgress::quarters_bar(multi, &format!("{granularity} stats"));
    let summary =
        price_map_ingest::run_aggregate(base, &out_dir.join(file), granularity, config, &progress)?;
    log::info!(
        "{granularity}: {} quarters, {} rows kept, {} dropped",
        summary.quarters.len(),
        summary.rows_kept,
        summary.rows_dropped
    );
    Ok(())
}
