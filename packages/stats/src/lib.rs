#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Stats table loading, lookup, and sample filtering.
//!
//! [`index`] holds the pure lookups used on every redraw; [`load`] reads
//! the pre-aggregated JSON from disk or over HTTP at startup.

pub mod index;
pub mod load;

pub use index::{entity_key, filter_eligible, lookup, lookup_detailed, series};

use thiserror::Error;

/// Errors that can occur while loading or writing a stats table.
#[derive(Debug, Error)]
pub enum StatsError {
    /// Reading or writing a local file failed.
    #[error("I/O error for {location}: {source}")]
    Io {
        /// Path that failed.
        location: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The document is not a valid stats table.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Fetching {location} failed with status {status}")]
    Status {
        /// URL that was fetched.
        location: String,
        /// HTTP status code.
        status: u16,
    },
}
