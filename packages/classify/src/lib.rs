#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Quantile thresholds and 7-band choropleth classification.
//!
//! Thresholds are six nearest-rank quantiles (no interpolation) at
//! `1/7 .. 6/7` of the sorted samples. A value is placed in the first band
//! whose threshold is strictly greater than it, so a value equal to a
//! threshold lands in the band above.

pub mod palette;

use serde::Serialize;

/// Number of color bands.
pub const BAND_COUNT: usize = 7;

/// Number of cut points between bands.
pub const THRESHOLD_COUNT: usize = BAND_COUNT - 1;

/// Minimum number of samples needed to compute thresholds.
pub const MIN_SAMPLES: usize = 7;

/// Six non-decreasing cut points splitting values into [`BAND_COUNT`] bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds([f64; THRESHOLD_COUNT]);

impl Thresholds {
    /// Wraps explicit cut points.
    ///
    /// Returns `None` unless the values are finite and non-decreasing.
    #[must_use]
    pub fn new(values: [f64; THRESHOLD_COUNT]) -> Option<Self> {
        let ordered = values.windows(2).all(|w| w[0] <= w[1]);
        let finite = values.iter().all(|v| v.is_finite());
        (ordered && finite).then_some(Self(values))
    }

    /// The cut points in ascending order.
    #[must_use]
    pub const fn values(&self) -> &[f64; THRESHOLD_COUNT] {
        &self.0
    }
}

/// The class a value falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    /// No value, or no thresholds to compare against.
    NoData,
    /// Band index in `0..BAND_COUNT`.
    Class(u8),
}

impl Band {
    /// Returns the band index, or `None` for [`Band::NoData`].
    #[must_use]
    pub const fn index(self) -> Option<u8> {
        match self {
            Self::NoData => None,
            Self::Class(index) => Some(index),
        }
    }
}

/// Computes thresholds with the default [`MIN_SAMPLES`] floor.
///
/// Returns `None` when there are fewer than [`MIN_SAMPLES`] samples; this
/// means "insufficient data", never a zero-filled result.
#[must_use]
pub fn compute_thresholds(samples: &[f64]) -> Option<Thresholds> {
    compute_thresholds_with(samples, MIN_SAMPLES)
}

/// Computes thresholds, requiring at least `min_samples` samples.
///
/// `min_samples` is clamped to at least 1. Non-finite samples are ignored.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn compute_thresholds_with(samples: &[f64], min_samples: usize) -> Option<Thresholds> {
    let mut sorted: Vec<f64> = samples.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.len() < min_samples.max(1) {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let last = (sorted.len() - 1) as f64;
    let mut cuts = [0.0; THRESHOLD_COUNT];
    for (i, cut) in cuts.iter_mut().enumerate() {
        let fraction = (i + 1) as f64 / BAND_COUNT as f64;
        let index = (fraction * last).floor() as usize;
        *cut = sorted[index.min(sorted.len() - 1)];
    }

    Some(Thresholds(cuts))
}

/// Places `value` in a band.
///
/// Gives [`Band::NoData`] when either input is absent or the value is NaN.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn classify(value: Option<f64>, thresholds: Option<&Thresholds>) -> Band {
    let (Some(value), Some(thresholds)) = (value, thresholds) else {
        return Band::NoData;
    };
    if value.is_nan() {
        return Band::NoData;
    }

    let index = thresholds
        .values()
        .iter()
        .position(|cut| value < *cut)
        .unwrap_or(THRESHOLD_COUNT);

    Band::Class(index as u8)
}
