//! Event handling for an interactive town view.

use price_map_classify::Thresholds;
use price_map_stats_models::{MetricKind, PeriodLabel};

use crate::orchestrator::TownViewOrchestrator;
use crate::selection::SelectionState;
use crate::sinks::ViewSinks;
use crate::{ResolvedRequest, ViewError, ViewRequest};

/// Owns the request, the selection, and the sinks of one town view.
///
/// Period and metric changes clear the selection and recompute
/// everything. Pointer events leave the thresholds alone and only
/// re-push feature decorations and the panel.
pub struct TownViewController<'a, S: ViewSinks> {
    orchestrator: TownViewOrchestrator<'a>,
    request: ResolvedRequest,
    selection: SelectionState,
    thresholds: Option<Thresholds>,
    sinks: S,
}

impl<'a, S: ViewSinks> TownViewController<'a, S> {
    /// Validates `request` and draws the initial view.
    ///
    /// # Errors
    ///
    /// Any error of [`TownViewOrchestrator::resolve`]; nothing is drawn.
    pub fn open(
        orchestrator: TownViewOrchestrator<'a>,
        request: &ViewRequest,
        sinks: S,
    ) -> Result<Self, ViewError> {
        let request = orchestrator.resolve(request)?;
        let mut controller = Self {
            orchestrator,
            request,
            selection: SelectionState::new(),
            thresholds: None,
            sinks,
        };
        controller.redraw();
        Ok(controller)
    }

    fn redraw(&mut self) {
        let view = self
            .orchestrator
            .redraw(&self.request, &self.selection, &mut self.sinks);
        self.thresholds = view.thresholds;
    }

    fn redecorate(&mut self) {
        let features = self.orchestrator.feature_styles(
            &self.request,
            self.thresholds.as_ref(),
            &self.selection,
        );
        let (_, max_bounds) = self.orchestrator.bounds(&self.request.region);
        self.sinks.render_features(&features, max_bounds);
        self.refresh_panel();
    }

    fn refresh_panel(&mut self) {
        let panel = self.orchestrator.panel(&self.request, &self.selection);
        self.sinks.render_panel(&panel);
    }

    /// Switches period.
    ///
    /// # Errors
    ///
    /// [`ViewError::UnknownPeriod`] if `period` is not listed; the view is
    /// left unchanged.
    pub fn set_period(&mut self, period: impl Into<PeriodLabel>) -> Result<(), ViewError> {
        let period = period.into();
        if !self.orchestrator.town_stats().has_quarter(&period) {
            return Err(ViewError::UnknownPeriod(period));
        }
        log::debug!("Period -> {period}");
        self.request.period = period;
        self.selection.on_reset();
        self.redraw();
        Ok(())
    }

    /// Switches metric.
    pub fn set_metric(&mut self, metric: MetricKind) {
        log::debug!("Metric -> {metric}");
        self.request.metric = metric;
        self.selection.on_reset();
        self.redraw();
    }

    /// Pointer entered the town `key`.
    pub fn hover(&mut self, key: &str) {
        self.selection.on_hover(key);
        self.redecorate();
    }

    /// Pointer left the hovered town.
    pub fn leave(&mut self) {
        self.selection.on_leave();
        self.redecorate();
    }

    /// The town `key` was clicked.
    pub fn click(&mut self, key: &str) {
        if let Some(previous) = self.selection.on_click(key) {
            log::debug!("Unpinned {previous}");
        }
        self.redecorate();
    }

    /// Drops the pinned and hovered towns, keeping period and metric.
    pub fn clear_selection(&mut self) {
        self.selection.on_reset();
        self.redecorate();
    }

    /// The validated request being shown.
    #[must_use]
    pub const fn request(&self) -> &ResolvedRequest {
        &self.request
    }

    /// Current hover and pin state.
    #[must_use]
    pub const fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// The sinks, for reading back what was rendered.
    #[must_use]
    pub const fn sinks(&self) -> &S {
        &self.sinks
    }

    /// Consumes the controller, returning its sinks.
    #[must_use]
    pub fn into_sinks(self) -> S {
        self.sinks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ViewConfig;
    use crate::model::Panel;
    use crate::orchestrator::fixtures::*;
    use crate::sinks::LastRendered;

    #[test]
    fn pointer_events_keep_thresholds_and_update_panel() {
        let (towns, town_stats, county_stats) = (towns(), town_stats(), county_stats());
        let orchestrator =
            TownViewOrchestrator::new(&towns, &town_stats, &county_stats, ViewConfig::default());
        let mut controller = TownViewController::open(
            orchestrator,
            &ViewRequest {
                period: Some("2023Q1".to_string()),
                region: Some(REGION.to_string()),
                ..ViewRequest::default()
            },
            LastRendered::default(),
        )
        .unwrap();
        let legend = controller.sinks().legend.clone();

        controller.click("臺北市大安區");
        controller.hover("臺北市信義區");
        assert_eq!(controller.sinks().panel.as_ref().unwrap().name, "臺北市 大安區");

        controller.leave();
        assert_eq!(controller.sinks().panel.as_ref().unwrap().name, "臺北市 大安區");
        assert_eq!(controller.sinks().legend, legend);
        assert_eq!(controller.sinks().map_renders, 4);

        controller.click("臺北市信義區");
        let sinks = controller.sinks();
        let weight = |key: &str| {
            sinks
                .features
                .as_ref()
                .unwrap()
                .iter()
                .find(|f| f.key == key)
                .unwrap()
                .weight
        };
        assert_eq!(weight("臺北市大安區"), 1);
        assert_eq!(weight("臺北市信義區"), 3);
    }

    #[test]
    fn period_and_metric_changes_reset_selection() {
        let (towns, town_stats, county_stats) = (towns(), town_stats(), county_stats());
        let orchestrator =
            TownViewOrchestrator::new(&towns, &town_stats, &county_stats, ViewConfig::default());
        let mut controller = TownViewController::open(
            orchestrator,
            &ViewRequest {
                region: Some(REGION.to_string()),
                ..ViewRequest::default()
            },
            LastRendered::default(),
        )
        .unwrap();
        assert_eq!(controller.request().period, "2023Q2");

        controller.click("臺北市大安區");
        controller.set_period("2023Q1").unwrap();
        assert_eq!(controller.selection().active(), None);
        assert_eq!(controller.sinks().panel, Some(Panel::placeholder()));

        controller.click("臺北市大安區");
        controller.set_metric(MetricKind::UnitPriceMedian);
        assert_eq!(controller.selection().active(), None);
        assert_eq!(
            controller.sinks().chart.as_ref().unwrap().values,
            vec![Some(375_000.0), None]
        );

        assert_eq!(
            controller.set_period("1999Q4"),
            Err(ViewError::UnknownPeriod("1999Q4".to_string()))
        );
        assert_eq!(controller.request().period, "2023Q1");
    }

    #[test]
    fn clearing_the_selection_unpins_and_shows_the_placeholder() {
        let (towns, town_stats, county_stats) = (towns(), town_stats(), county_stats());
        let orchestrator =
            TownViewOrchestrator::new(&towns, &town_stats, &county_stats, ViewConfig::default());
        let mut controller = TownViewController::open(
            orchestrator,
            &ViewRequest {
                period: Some("2023Q1".to_string()),
                region: Some(REGION.to_string()),
                ..ViewRequest::default()
            },
            LastRendered::default(),
        )
        .unwrap();
        let legend = controller.sinks().legend.clone();

        controller.click("臺北市大安區");
        controller.click("臺北市大安區");
        assert_eq!(controller.selection().pinned(), Some("臺北市大安區"));

        controller.clear_selection();
        assert_eq!(controller.selection().active(), None);
        assert_eq!(controller.sinks().panel, Some(Panel::placeholder()));
        assert_eq!(controller.sinks().legend, legend);
        assert!(
            controller
                .sinks()
                .features
                .as_ref()
                .unwrap()
                .iter()
                .all(|f| f.weight == 1)
        );
    }

    #[test]
    fn open_without_region_draws_nothing() {
        let (towns, town_stats, county_stats) = (towns(), town_stats(), county_stats());
        let orchestrator =
            TownViewOrchestrator::new(&towns, &town_stats, &county_stats, ViewConfig::default());
        let result =
            TownViewController::open(orchestrator, &ViewRequest::default(), LastRendered::default());
        assert_eq!(result.err(), Some(ViewError::MissingRegion));
    }
}
