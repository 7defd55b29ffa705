//! Aggregation config: county codes, city-wide districts, and cleaning
//! thresholds.
//!
//! The default config is embedded at compile time via [`include_str!`];
//! a file given with `--config` replaces it entirely.

use std::path::Path;

use price_map_ingest_models::AggregateConfig;

use crate::IngestError;

const DEFAULT_CONFIG: &str = include_str!("../cities.toml");

/// Parses a TOML aggregation config.
///
/// # Errors
///
/// Returns [`IngestError::Config`] if the document is malformed.
pub fn parse_config(location: &str, text: &str) -> Result<AggregateConfig, IngestError> {
    toml::from_str(text).map_err(|source| IngestError::Config {
        location: location.to_string(),
        source,
    })
}

/// Returns the embedded default config.
///
/// # Panics
///
/// Panics if the embedded `cities.toml` is malformed (a build-time
/// guarantee since the file is embedded).
#[must_use]
pub fn default_config() -> AggregateConfig {
    parse_config("cities.toml", DEFAULT_CONFIG)
        .unwrap_or_else(|e| panic!("Failed to parse embedded cities.toml: {e}"))
}

/// Loads the config at `path`, or the embedded default when `None`.
///
/// # Errors
///
/// Returns [`IngestError::Io`] if the file cannot be read or
/// [`IngestError::Config`] if it is malformed.
pub fn load_config(path: Option<&Path>) -> Result<AggregateConfig, IngestError> {
    let Some(path) = path else {
        return Ok(default_config());
    };
    let text = std::fs::read_to_string(path).map_err(|e| IngestError::io(path, e))?;
    let config = parse_config(&path.display().to_string(), &text)?;
    log::info!(
        "Loaded config {}: {} counties, {} city-wide cities",
        path.display(),
        config.counties.len(),
        config.city_wide.len()
    );
    Ok(config)
}
