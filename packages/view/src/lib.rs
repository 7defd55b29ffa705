#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! County and town map views.
//!
//! A view is a pure function of the loaded data, the request
//! (`period`, `metric`, `region`), and the [`SelectionState`]. The
//! [`TownViewOrchestrator`] computes a [`TownView`] and pushes its parts to
//! the [`sinks`]; [`TownViewController`] owns the selection and request and
//! redraws on every user event.

pub mod controller;
pub mod county;
pub mod model;
pub mod orchestrator;
pub mod selection;
pub mod sinks;

pub use controller::TownViewController;
pub use county::county_view;
pub use model::{CountyView, FeatureStyle, Legend, Panel, TownView, TrendChart};
pub use orchestrator::TownViewOrchestrator;
pub use selection::{Decoration, SelectionPhase, SelectionState};

use price_map_stats_models::{MetricKind, PeriodLabel};
use thiserror::Error;

/// Errors that abort a view before anything is drawn.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// The town view was opened without a county.
    #[error("No county selected")]
    MissingRegion,

    /// The requested period is not one of the table's quarters.
    #[error("Unknown period: {0}")]
    UnknownPeriod(String),

    /// The stats table has no quarters at all.
    #[error("Stats table has no periods")]
    NoPeriods,
}

/// Sample floors and map padding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewConfig {
    /// Records with fewer samples are drawn gray and left out of the
    /// threshold samples.
    pub min_display_count: u64,
    /// Fewest samples thresholds are computed from.
    pub min_samples: usize,
    /// Max-bounds padding ratio of the town map.
    pub town_bounds_padding: f64,
    /// Max-bounds padding ratio of the county map.
    pub county_bounds_padding: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            min_display_count: 10,
            min_samples: price_map_classify::MIN_SAMPLES,
            town_bounds_padding: 0.30,
            county_bounds_padding: 0.25,
        }
    }
}

/// What the user asked to see, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewRequest {
    /// Period to show; the latest when `None`.
    pub period: Option<PeriodLabel>,
    /// Metric to color by.
    pub metric: MetricKind,
    /// County whose towns are shown.
    pub region: Option<String>,
}

/// A validated [`ViewRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRequest {
    /// Period shown, always one of the table's quarters.
    pub period: PeriodLabel,
    /// Metric shown.
    pub metric: MetricKind,
    /// County shown, never blank.
    pub region: String,
}
