//! Values pushed to the map, legend, chart, and panel sinks.

use price_map_classify::Thresholds;
use price_map_classify::palette::{COLORS, FillStyle};
use price_map_format as fmt;
use price_map_spatial::Bounds;
use price_map_stats_models::{EntityKey, MetricKind, PeriodLabel, StatRecord, TrendSeries};
use serde::Serialize;

use crate::selection::Decoration;

/// Outline color of every feature.
pub const OUTLINE_COLOR: &str = "#000";

/// Style of one town feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureStyle {
    /// Entity key of the feature.
    pub key: EntityKey,
    /// Display name.
    pub name: String,
    /// Band index, `None` when unclassified.
    pub band: Option<u8>,
    /// Fill color and opacity.
    #[serde(flatten)]
    pub fill: FillStyle,
    /// Outline color.
    pub color: &'static str,
    /// Outline weight from the selection decoration.
    pub weight: u8,
}

/// One legend row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendEntry {
    /// Swatch color.
    pub color: &'static str,
    /// Range label, e.g. `"1,200萬–1,500萬"`.
    pub label: String,
}

/// Legend contents.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Legend {
    /// Thresholds exist: one row per band.
    #[serde(rename_all = "camelCase")]
    Bands {
        /// Heading for the metric.
        title: &'static str,
        /// The cut points the rows were built from.
        thresholds: Thresholds,
        /// Seven rows, lightest band first.
        entries: Vec<LegendEntry>,
        /// Note about gray features.
        footnote: String,
    },
    /// Not enough samples to classify.
    NoData {
        /// Message to display instead of the rows.
        message: &'static str,
    },
}

impl Legend {
    /// Builds the legend for `thresholds` (or the no-data legend).
    #[must_use]
    pub fn build(thresholds: Option<&Thresholds>, metric: MetricKind, min_display_count: u64) -> Self {
        let Some(thresholds) = thresholds else {
            return Self::NoData {
                message: fmt::NO_LEGEND_MESSAGE,
            };
        };

        let cuts = thresholds.values();
        let label = |v: f64| fmt::format_value(metric, v);

        let mut labels = Vec::with_capacity(COLORS.len());
        labels.push(format!("< {}", label(cuts[0])));
        for pair in cuts.windows(2) {
            labels.push(format!("{}–{}", label(pair[0]), label(pair[1])));
        }
        labels.push(format!("≥ {}", label(cuts[cuts.len() - 1])));

        let entries = COLORS
            .iter()
            .zip(labels)
            .map(|(color, label)| LegendEntry { color: *color, label })
            .collect();

        Self::Bands {
            title: fmt::legend_title(metric),
            thresholds: *thresholds,
            entries,
            footnote: fmt::legend_footnote(min_display_count),
        }
    }
}

/// Point radius of the highlighted period.
pub const HIGHLIGHT_RADIUS: u8 = 5;

/// Point radius of every other period.
pub const POINT_RADIUS: u8 = 2;

/// Trend chart contents.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendChart {
    /// Dataset title.
    pub title: &'static str,
    /// Period labels (x axis).
    pub labels: Vec<PeriodLabel>,
    /// Metric values, `None` for gaps.
    pub values: Vec<Option<f64>>,
    /// Formatted values for ticks and tooltips, empty for gaps.
    pub value_labels: Vec<String>,
    /// Point radius per period.
    pub point_radius: Vec<u8>,
    /// The highlighted period, if it is on the axis.
    pub highlight: Option<PeriodLabel>,
}

impl TrendChart {
    /// Builds the chart for `series`, highlighting `highlight`.
    #[must_use]
    pub fn build(series: TrendSeries, metric: MetricKind, highlight: &str) -> Self {
        let highlight_index = series.quarters.iter().position(|q| q == highlight);
        let point_radius = (0..series.quarters.len())
            .map(|i| {
                if Some(i) == highlight_index {
                    HIGHLIGHT_RADIUS
                } else {
                    POINT_RADIUS
                }
            })
            .collect();
        let value_labels = series
            .values
            .iter()
            .map(|v| fmt::format_axis(metric, *v))
            .collect();

        Self {
            title: fmt::chart_title(metric),
            highlight: highlight_index.map(|i| series.quarters[i].clone()),
            labels: series.quarters,
            values: series.values,
            value_labels,
            point_radius,
        }
    }
}

/// Detail panel contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    /// Display name of the entity.
    pub name: String,
    /// Sample count, or the missing marker.
    pub count: String,
    /// Metric line, or the missing marker.
    pub value: String,
    /// Unit note; empty when there is no record.
    pub unit: String,
}

impl Panel {
    /// Panel shown while nothing is hovered or pinned.
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            name: fmt::PLACEHOLDER_NAME.to_string(),
            count: fmt::MISSING.to_string(),
            value: fmt::MISSING.to_string(),
            unit: String::new(),
        }
    }

    /// Panel for an entity named `name`, with or without a record.
    #[must_use]
    pub fn for_record(name: String, record: Option<&StatRecord>, metric: MetricKind) -> Self {
        let Some(record) = record else {
            return Self {
                name,
                count: fmt::MISSING.to_string(),
                value: fmt::MISSING.to_string(),
                unit: String::new(),
            };
        };
        Self {
            name,
            count: record.count.to_string(),
            value: fmt::panel_value_text(metric, record.value(metric)),
            unit: fmt::panel_unit(metric).to_string(),
        }
    }
}

/// Everything needed to draw the town map of one county.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TownView {
    /// County shown.
    pub region: String,
    /// Period shown.
    pub period: PeriodLabel,
    /// Metric shown.
    pub metric: MetricKind,
    /// Number of samples the thresholds were computed from.
    pub sample_count: usize,
    /// Cut points, `None` when there were too few samples.
    pub thresholds: Option<Thresholds>,
    /// One style per town feature of the county.
    pub features: Vec<FeatureStyle>,
    /// Legend contents.
    pub legend: Legend,
    /// County trend chart.
    pub chart: TrendChart,
    /// Detail panel for the active entity.
    pub panel: Panel,
    /// Bounds of the county's features.
    pub bounds: Option<Bounds>,
    /// Padded bounds the map may not be dragged outside of.
    pub max_bounds: Option<Bounds>,
}

/// Style of one county feature on the overview map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountyStyle {
    /// County name.
    pub name: String,
    /// Fill color.
    pub fill_color: &'static str,
    /// Fill opacity.
    pub fill_opacity: f64,
    /// Outline color.
    pub color: &'static str,
    /// Outline weight.
    pub weight: u8,
}

impl CountyStyle {
    /// Style of `name` under `decoration`.
    #[must_use]
    pub fn new(name: String, decoration: Decoration) -> Self {
        let (fill_color, fill_opacity) = match decoration {
            Decoration::Base => ("#fff", 0.0),
            Decoration::Hovered => (OUTLINE_COLOR, 0.08),
            Decoration::Pinned => (OUTLINE_COLOR, 0.12),
        };
        Self {
            name,
            fill_color,
            fill_opacity,
            color: OUTLINE_COLOR,
            weight: decoration.weight(),
        }
    }
}

/// Everything needed to draw the county overview map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountyView {
    /// One style per county feature.
    pub features: Vec<CountyStyle>,
    /// Name shown in the panel.
    pub panel_name: String,
    /// County to open in the town view, set once a county is clicked.
    pub navigate_to: Option<String>,
    /// Bounds of all counties.
    pub bounds: Option<Bounds>,
    /// Padded bounds the map may not be dragged outside of.
    pub max_bounds: Option<Bounds>,
}
