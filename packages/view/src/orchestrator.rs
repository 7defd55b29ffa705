//! Recomputes the town view of one county.

use geojson::{Feature, FeatureCollection};
use price_map_classify::palette::fill_for;
use price_map_classify::{Band, Thresholds, classify, compute_thresholds_with};
use price_map_format::display_name;
use price_map_spatial::{
    Bounds, bounds_of, feature_key, features_in_region, region_name, sub_region_name,
};
use price_map_stats::{filter_eligible, lookup, series};
use price_map_stats_models::{MetricKind, StatsTable};

use crate::model::{FeatureStyle, Legend, OUTLINE_COLOR, Panel, TownView, TrendChart};
use crate::selection::SelectionState;
use crate::sinks::ViewSinks;
use crate::{ResolvedRequest, ViewConfig, ViewError, ViewRequest};

/// Read-only inputs of the town view.
///
/// Holds borrowed data only; every call recomputes from scratch.
#[derive(Debug, Clone, Copy)]
pub struct TownViewOrchestrator<'a> {
    towns: &'a FeatureCollection,
    town_stats: &'a StatsTable,
    county_stats: &'a StatsTable,
    config: ViewConfig,
}

impl<'a> TownViewOrchestrator<'a> {
    /// Wraps the town layer and both stats tables.
    #[must_use]
    pub const fn new(
        towns: &'a FeatureCollection,
        town_stats: &'a StatsTable,
        county_stats: &'a StatsTable,
        config: ViewConfig,
    ) -> Self {
        Self {
            towns,
            town_stats,
            county_stats,
            config,
        }
    }

    /// Sample floors and map padding.
    #[must_use]
    pub const fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// The per-town stats table.
    #[must_use]
    pub const fn town_stats(&self) -> &'a StatsTable {
        self.town_stats
    }

    /// Validates `request` against the town table.
    ///
    /// # Errors
    ///
    /// * [`ViewError::MissingRegion`] if no county was given
    /// * [`ViewError::UnknownPeriod`] if the period is not listed
    /// * [`ViewError::NoPeriods`] if no period was given and the table is empty
    pub fn resolve(&self, request: &ViewRequest) -> Result<ResolvedRequest, ViewError> {
        let region = request
            .region
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .ok_or(ViewError::MissingRegion)?;

        let period = match request.period.as_deref() {
            Some(period) if self.town_stats.has_quarter(period) => period.to_string(),
            Some(period) => return Err(ViewError::UnknownPeriod(period.to_string())),
            None => self
                .town_stats
                .latest_quarter()
                .ok_or(ViewError::NoPeriods)?
                .to_string(),
        };

        Ok(ResolvedRequest {
            period,
            metric: request.metric,
            region: region.to_string(),
        })
    }

    /// Thresholds for `region` in `period`, with the sample count they
    /// were computed from.
    #[must_use]
    pub fn thresholds(
        &self,
        region: &str,
        period: &str,
        metric: MetricKind,
    ) -> (Option<Thresholds>, usize) {
        let samples = self
            .town_stats
            .period(period)
            .map(|records| {
                filter_eligible(records, region, self.config.min_display_count, metric)
            })
            .unwrap_or_default();
        (
            compute_thresholds_with(&samples, self.config.min_samples),
            samples.len(),
        )
    }

    fn feature_style(
        &self,
        feature: &Feature,
        request: &ResolvedRequest,
        thresholds: Option<&Thresholds>,
        selection: &SelectionState,
    ) -> FeatureStyle {
        let key = feature_key(feature);
        let record = lookup(self.town_stats, &request.period, &key);
        let value = record.and_then(|r| r.value(request.metric));
        let eligible = record.is_some_and(|r| r.meets_count(self.config.min_display_count));

        let band = if eligible {
            classify(value, thresholds)
        } else {
            Band::NoData
        };

        FeatureStyle {
            name: feature_name(feature),
            band: band.index(),
            fill: fill_for(band, eligible && thresholds.is_some()),
            color: OUTLINE_COLOR,
            weight: selection.decoration(&key).weight(),
            key,
        }
    }

    /// Styles of every town of the county, in collection order.
    #[must_use]
    pub fn feature_styles(
        &self,
        request: &ResolvedRequest,
        thresholds: Option<&Thresholds>,
        selection: &SelectionState,
    ) -> Vec<FeatureStyle> {
        features_in_region(self.towns, &request.region)
            .into_iter()
            .map(|feature| self.feature_style(feature, request, thresholds, selection))
            .collect()
    }

    /// Panel for whatever entity `selection` makes active.
    #[must_use]
    pub fn panel(&self, request: &ResolvedRequest, selection: &SelectionState) -> Panel {
        let Some(active) = selection.active() else {
            return Panel::placeholder();
        };
        let name = features_in_region(self.towns, &request.region)
            .into_iter()
            .find(|feature| feature_key(feature) == active)
            .map_or_else(|| active.to_string(), feature_name);
        let record = lookup(self.town_stats, &request.period, active);
        Panel::for_record(name, record, request.metric)
    }

    /// The county's trend over every quarter of the county table.
    #[must_use]
    pub fn chart(&self, request: &ResolvedRequest) -> TrendChart {
        TrendChart::build(
            series(self.county_stats, &request.region, request.metric),
            request.metric,
            &request.period,
        )
    }

    /// Bounds of the county's towns and the padded max bounds.
    #[must_use]
    pub fn bounds(&self, region: &str) -> (Option<Bounds>, Option<Bounds>) {
        let bounds = bounds_of(&features_in_region(self.towns, region));
        (
            bounds,
            bounds.map(|b| b.pad(self.config.town_bounds_padding)),
        )
    }

    /// Computes the whole view.
    ///
    /// Never fails: a county without enough samples yields a gray map and
    /// the no-data legend.
    #[must_use]
    pub fn compute(&self, request: &ResolvedRequest, selection: &SelectionState) -> TownView {
        let (thresholds, sample_count) =
            self.thresholds(&request.region, &request.period, request.metric);

        log::debug!(
            "Town view {} {} {}: {sample_count} samples, thresholds={thresholds:?}",
            request.region,
            request.period,
            request.metric,
        );

        let (bounds, max_bounds) = self.bounds(&request.region);

        TownView {
            region: request.region.clone(),
            period: request.period.clone(),
            metric: request.metric,
            sample_count,
            features: self.feature_styles(request, thresholds.as_ref(), selection),
            legend: Legend::build(
                thresholds.as_ref(),
                request.metric,
                self.config.min_display_count,
            ),
            chart: self.chart(request),
            panel: self.panel(request, selection),
            thresholds,
            bounds,
            max_bounds,
        }
    }

    /// Computes the view and pushes it to `sinks`.
    #[must_use]
    pub fn redraw<S: ViewSinks + ?Sized>(
        &self,
        request: &ResolvedRequest,
        selection: &SelectionState,
        sinks: &mut S,
    ) -> TownView {
        let view = self.compute(request, selection);
        sinks.render_features(&view.features, view.max_bounds);
        sinks.render_legend(&view.legend);
        sinks.render_trend(&view.chart);
        sinks.render_panel(&view.panel);
        view
    }
}

fn feature_name(feature: &Feature) -> String {
    display_name(
        region_name(feature).unwrap_or_default(),
        sub_region_name(feature).unwrap_or_default(),
    )
}
