#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the price map server.
//!
//! View payloads (`TownView`, `CountyView`) come straight from
//! `price_map_view`; this crate only holds the envelope and query types.

use price_map_stats_models::{MetricKind, PeriodLabel};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// One entry of the metric selector.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMetric {
    /// Query value, e.g. `median_total_price`.
    pub value: MetricKind,
    /// Display label.
    pub label: String,
}

/// Periods and metrics available for the selectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiQuarters {
    /// All quarters, oldest first.
    pub quarters: Vec<PeriodLabel>,
    /// Default selection, the newest quarter.
    pub latest: Option<PeriodLabel>,
    /// Selectable metrics.
    pub metrics: Vec<ApiMetric>,
}

/// Query parameters for the county map endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountyQueryParams {
    /// Pinned county.
    pub selected: Option<String>,
    /// Hovered county.
    pub hovered: Option<String>,
}

/// Query parameters for the town map endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TownQueryParams {
    /// County to show. Required.
    pub county: Option<String>,
    /// Period; the latest when omitted.
    pub quarter: Option<PeriodLabel>,
    /// Metric; total price when omitted.
    pub metric: Option<MetricKind>,
    /// Pinned town entity key.
    pub pinned: Option<String>,
    /// Hovered town entity key.
    pub hovered: Option<String>,
}

/// Error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Human-readable message.
    pub error: String,
    /// Page the client should navigate to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

impl ApiError {
    /// An error without a redirect.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            redirect: None,
        }
    }

    /// An error that sends the client back to `redirect`.
    #[must_use]
    pub fn with_redirect(error: impl Into<String>, redirect: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            redirect: Some(redirect.into()),
        }
    }
}
