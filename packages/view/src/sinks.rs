//! Rendering sinks.
//!
//! The view layer never draws anything itself. It hands computed values
//! to these traits, implemented by whatever owns the map, legend, chart,
//! and panel widgets. Implementations only receive data; they must not
//! call back into the view.

use crate::model::{FeatureStyle, Legend, Panel, TrendChart};
use price_map_spatial::Bounds;

/// Receives per-feature styles for the choropleth layer.
pub trait MapSink {
    /// Replace all feature styles and the allowed map extent.
    fn render_features(&mut self, features: &[FeatureStyle], max_bounds: Option<Bounds>);
}

/// Receives the legend.
pub trait LegendSink {
    /// Replace the legend.
    fn render_legend(&mut self, legend: &Legend);
}

/// Receives the trend chart.
pub trait ChartSink {
    /// Replace the chart dataset.
    fn render_trend(&mut self, chart: &TrendChart);
}

/// Receives the detail panel.
pub trait PanelSink {
    /// Replace the panel contents.
    fn render_panel(&mut self, panel: &Panel);
}

/// All four sinks of the town view.
pub trait ViewSinks: MapSink + LegendSink + ChartSink + PanelSink {}

impl<T: MapSink + LegendSink + ChartSink + PanelSink> ViewSinks for T {}

/// A sink that keeps the last value pushed to each slot.
///
/// Useful for tests and for callers that serialize a whole view at once.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LastRendered {
    /// Last feature styles.
    pub features: Option<Vec<FeatureStyle>>,
    /// Last max bounds.
    pub max_bounds: Option<Bounds>,
    /// Last legend.
    pub legend: Option<Legend>,
    /// Last chart.
    pub chart: Option<TrendChart>,
    /// Last panel.
    pub panel: Option<Panel>,
    /// Number of map renders.
    pub map_renders: usize,
}

impl MapSink for LastRendered {
    fn render_features(&mut self, features: &[FeatureStyle], max_bounds: Option<Bounds>) {
        self.features = Some(features.to_vec());
        self.max_bounds = max_bounds;
        self.map_renders += 1;
    }
}

impl LegendSink for LastRendered {
    fn render_legend(&mut self, legend: &Legend) {
        self.legend = Some(legend.clone());
    }
}

impl ChartSink for LastRendered {
    fn render_trend(&mut self, chart: &TrendChart) {
        self.chart = Some(chart.clone());
    }
}

impl PanelSink for LastRendered {
    fn render_panel(&mut self, panel: &Panel) {
        self.panel = Some(panel.clone());
    }
}
