//! County overview map.

use geojson::FeatureCollection;
use price_map_format::PLACEHOLDER_NAME;
use price_map_spatial::{bounds_of, feature_key};

use crate::model::{CountyStyle, CountyView};
use crate::selection::SelectionState;

/// Styles the county layer for `selection`.
///
/// Counties are keyed by name alone. A pinned county is the one to open
/// in the town view.
#[must_use]
pub fn county_view(
    counties: &FeatureCollection,
    selection: &SelectionState,
    bounds_padding: f64,
) -> CountyView {
    let features = counties
        .features
        .iter()
        .map(|feature| {
            let name = feature_key(feature);
            let decoration = selection.decoration(&name);
            CountyStyle::new(name, decoration)
        })
        .collect();

    let all: Vec<_> = counties.features.iter().collect();
    let bounds = bounds_of(&all);

    CountyView {
        features,
        panel_name: selection
            .active()
            .map_or_else(|| PLACEHOLDER_NAME.to_string(), ToString::to_string),
        navigate_to: selection.pinned().map(ToString::to_string),
        bounds,
        max_bounds: bounds.map(|b| b.pad(bounds_padding)),
    }
}

#[cfg(test)]
mod tests {
    use price_map_spatial::dissolve::dissolve_by_region;

    use super::*;
    use crate::orchestrator::fixtures::towns;

    #[test]
    fn hover_and_pin_decorate_counties() {
        let counties = dissolve_by_region(&towns());
        let selection = SelectionState::from_parts(Some("臺北市"), Some("新北市"));

        let view = county_view(&counties, &selection, 0.25);
        let names: Vec<&str> = view.features.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["新北市", "臺北市"]);
        assert_eq!(view.features[0].weight, 2);
        assert!((view.features[0].fill_opacity - 0.08).abs() < f64::EPSILON);
        assert_eq!(view.features[1].weight, 3);
        assert_eq!(view.panel_name, "臺北市");
        assert_eq!(view.navigate_to.as_deref(), Some("臺北市"));
    }

    #[test]
    fn empty_selection_shows_placeholder() {
        let counties = dissolve_by_region(&towns());
        let view = county_view(&counties, &SelectionState::new(), 0.25);
        assert_eq!(view.panel_name, PLACEHOLDER_NAME);
        assert_eq!(view.navigate_to, None);
        assert!(view.features.iter().all(|f| f.weight == 1));

        let bounds = view.bounds.unwrap();
        let max_bounds = view.max_bounds.unwrap();
        assert!((bounds.west - 110.0).abs() < 1e-9);
        assert!((max_bounds.west - (110.0 - 18.0 * 0.25)).abs() < 1e-9);
    }
}
