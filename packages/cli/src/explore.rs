//! Terminal explorer for town views.
//!
//! Loads the same data the server does and drives a
//! [`TownViewController`] with a sink that prints to stdout, so the
//! classification of a county can be inspected without a browser.

use dialoguer::Select;
use price_map_cli_utils::prompt_path;
use price_map_spatial::Bounds;
use price_map_stats_models::MetricKind;
use price_map_view::sinks::{ChartSink, LegendSink, MapSink, PanelSink};
use price_map_view::{
    FeatureStyle, Legend, Panel, TownViewController, TownViewOrchestrator, TrendChart,
    ViewRequest,
};

/// Prints every render to stdout.
struct TerminalSink {
    /// Names of the last rendered features, in render order.
    towns: Vec<(String, String)>,
}

impl MapSink for TerminalSink {
    fn render_features(&mut self, features: &[FeatureStyle], max_bounds: Option<Bounds>) {
        self.towns = features
            .iter()
            .map(|f| (f.key.clone(), f.name.clone()))
            .collect();

        println!();
        for f in features {
            let band = f.band.map_or_else(|| "-".to_string(), |b| b.to_string());
            let marker = if f.weight > 1 { "*" } else { " " };
            println!("{marker} [{band}] {} {}", f.fill.fill_color, f.name);
        }
        if let Some(b) = max_bounds {
            log::debug!(
                "max bounds: ({:.3}, {:.3}) - ({:.3}, {:.3})",
                b.west,
                b.south,
                b.east,
                b.north
            );
        }
    }
}

impl LegendSink for TerminalSink {
    fn render_legend(&mut self, legend: &Legend) {
        println!();
        match legend {
            Legend::Bands {
                title,
                entries,
                footnote,
                ..
            } => {
                println!("{title}");
                for entry in entries {
                    println!("  {} {}", entry.color, entry.label);
                }
                println!("  {footnote}");
            }
            Legend::NoData { message } => println!("{message}"),
        }
    }
}

impl ChartSink for TerminalSink {
    fn render_trend(&mut self, chart: &TrendChart) {
        println!();
        println!("{}", chart.title);
        for (label, value) in chart.labels.iter().zip(&chart.value_labels) {
            let marker = if chart.highlight.as_ref() == Some(label) {
                ">"
            } else {
                " "
            };
            println!("{marker} {label} {value}");
        }
    }
}

impl PanelSink for TerminalSink {
    fn render_panel(&mut self, panel: &Panel) {
        println!();
        println!("{}", panel.name);
        println!("  件數: {}", panel.count);
        println!("  {}", panel.value);
        if !panel.unit.is_empty() {
            println!("  {}", panel.unit);
        }
    }
}

/// Actions available once a view is open.
enum ExploreAction {
    PinTown,
    Unpin,
    ChangeQuarter,
    ChangeMetric,
    Quit,
}

impl ExploreAction {
    const ALL: &[Self] = &[
        Self::PinTown,
        Self::Unpin,
        Self::ChangeQuarter,
        Self::ChangeMetric,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::PinTown => "Pin a town",
            Self::Unpin => "Clear the pinned town",
            Self::ChangeQuarter => "Change quarter",
            Self::ChangeMetric => "Change metric",
            Self::Quit => "Quit",
        }
    }
}

fn select_metric() -> Result<MetricKind, dialoguer::Error> {
    let labels: Vec<&str> = MetricKind::ALL
        .iter()
        .map(|&m| price_map_format::metric_label(m))
        .collect();
    let idx = Select::new()
        .with_prompt("Metric")
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(MetricKind::ALL[idx])
}

fn select_quarter(quarters: &[String]) -> Result<Option<String>, dialoguer::Error> {
    if quarters.is_empty() {
        return Ok(None);
    }
    let idx = Select::new()
        .with_prompt("Quarter")
        .items(quarters)
        .default(quarters.len() - 1)
        .interact()?;
    Ok(Some(quarters[idx].clone()))
}

/// Loads the data directory and runs the explorer loop.
///
/// # Errors
///
/// Returns an error if the data cannot be loaded, a prompt fails, or the
/// chosen county has no periods to show.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let data_dir = prompt_path("Data directory", "data")?;
    let state = price_map_server::load_state(&data_dir).await?;

    let counties = price_map_spatial::region_names(&state.towns);
    if counties.is_empty() {
        println!("No counties in the town layer.");
        return Ok(());
    }
    let idx = Select::new()
        .with_prompt("County")
        .items(&counties)
        .default(0)
        .interact()?;

    let quarters = &state.town_stats.quarters;
    let request = ViewRequest {
        period: select_quarter(quarters)?,
        metric: select_metric()?,
        region: Some(counties[idx].clone()),
    };

    let orchestrator = TownViewOrchestrator::new(
        &state.towns,
        &state.town_stats,
        &state.county_stats,
        state.view_config,
    );
    let mut controller = TownViewController::open(
        orchestrator,
        &request,
        TerminalSink { towns: Vec::new() },
    )?;

    loop {
        let labels: Vec<&str> = ExploreAction::ALL.iter().map(ExploreAction::label).collect();
        let idx = Select::new()
            .with_prompt("Next")
            .items(&labels)
            .default(0)
            .interact()?;

        match ExploreAction::ALL[idx] {
            ExploreAction::PinTown => {
                let towns = controller.sinks().towns.clone();
                if towns.is_empty() {
                    continue;
                }
                let names: Vec<&str> = towns.iter().map(|(_, name)| name.as_str()).collect();
                let idx = Select::new()
                    .with_prompt("Town")
                    .items(&names)
                    .default(0)
                    .interact()?;
                controller.click(&towns[idx].0);
            }
            ExploreAction::Unpin => controller.clear_selection(),
            ExploreAction::ChangeQuarter => {
                if let Some(quarter) = select_quarter(quarters)? {
                    controller.set_period(quarter)?;
                }
            }
            ExploreAction::ChangeMetric => controller.set_metric(select_metric()?),
            ExploreAction::Quit => break,
        }
    }

    Ok(())
}
