//! Reading and writing stats tables.
//!
//! A location is either an `http://`/`https://` URL, fetched with
//! `reqwest`, or a local path. Any failure is reported to the caller;
//! initialization is expected to abort rather than render partial data.

use std::path::Path;

use price_map_stats_models::StatsTable;

use crate::StatsError;

/// Whether `location` should be fetched over HTTP.
#[must_use]
pub fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Loads the raw text behind `location`.
///
/// # Errors
///
/// * [`StatsError::Http`] if the request fails
/// * [`StatsError::Status`] if the server answers with a non-success status
/// * [`StatsError::Io`] if the local file cannot be read
pub async fn load_text(location: &str) -> Result<String, StatsError> {
    if is_remote(location) {
        log::debug!("Fetching {location}");
        let response = reqwest::get(location).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StatsError::Status {
                location: location.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    } else {
        log::debug!("Reading {location}");
        tokio::fs::read_to_string(location)
            .await
            .map_err(|source| StatsError::Io {
                location: location.to_string(),
                source,
            })
    }
}

/// Parses a stats table from its JSON text.
///
/// # Errors
///
/// Returns [`StatsError::Json`] if the text is not a valid stats table.
pub fn parse_table(json: &str) -> Result<StatsTable, StatsError> {
    Ok(serde_json::from_str(json)?)
}

/// Loads and parses the stats table at `location`.
///
/// # Errors
///
/// Returns any error from [`load_text`] or [`parse_table`].
pub async fn load_table(location: &str) -> Result<StatsTable, StatsError> {
    let table = parse_table(&load_text(location).await?)?;
    log::info!(
        "Loaded stats table {location}: {} quarters, latest {}",
        table.quarters.len(),
        table.latest_quarter().unwrap_or("-")
    );
    Ok(table)
}

/// Writes `table` as compact JSON (UTF-8, non-ASCII kept as-is).
///
/// # Errors
///
/// Returns [`StatsError::Io`] if the file cannot be written, or
/// [`StatsError::Json`] if serialization fails.
pub fn write_table(path: &Path, table: &StatsTable) -> Result<(), StatsError> {
    let json = serde_json::to_string(table)?;
    std::fs::write(path, json).map_err(|source| StatsError::Io {
        location: path.display().to_string(),
        source,
    })
}
