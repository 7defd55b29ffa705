//! Band colors and fill styles for the choropleth.

use serde::Serialize;

use crate::{BAND_COUNT, Band};

/// Sequential blue palette, lightest band first.
pub const COLORS: [&str; BAND_COUNT] = [
    "#f7fbff", "#deebf7", "#c6dbef", "#9ecae1", "#6baed6", "#3182bd", "#08519c",
];

/// Fill for features without a usable value.
pub const NO_DATA_COLOR: &str = "#eee";

/// Fill opacity of a classified feature.
pub const CLASSIFIED_OPACITY: f64 = 0.78;

/// Fill opacity of an unclassified (gray) feature.
pub const NO_DATA_OPACITY: f64 = 0.25;

/// Returns the color of `band`.
#[must_use]
pub fn color_for(band: Band) -> &'static str {
    band.index()
        .and_then(|index| COLORS.get(usize::from(index)).copied())
        .unwrap_or(NO_DATA_COLOR)
}

/// Fill color and opacity of one feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FillStyle {
    /// CSS color.
    pub fill_color: &'static str,
    /// Opacity in `0.0..=1.0`.
    pub fill_opacity: f64,
}

impl FillStyle {
    /// The gray style used when a feature cannot be classified.
    pub const NO_DATA: Self = Self {
        fill_color: NO_DATA_COLOR,
        fill_opacity: NO_DATA_OPACITY,
    };
}

/// Returns the fill of a feature in `band`.
///
/// `classified` is true when the feature's record meets the display
/// sample floor and the view has thresholds. Such features are drawn at
/// full opacity, gray when their value is missing. Everything else is
/// [`FillStyle::NO_DATA`], even if a value exists.
#[must_use]
pub fn fill_for(band: Band, classified: bool) -> FillStyle {
    if classified {
        FillStyle {
            fill_color: color_for(band),
            fill_opacity: CLASSIFIED_OPACITY,
        }
    } else {
        FillStyle::NO_DATA
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_band_has_its_own_color() {
        for (i, expected) in COLORS.iter().enumerate() {
            let band = Band::Class(u8::try_from(i).unwrap());
            assert_eq!(color_for(band), *expected);
        }
        assert_eq!(color_for(Band::NoData), NO_DATA_COLOR);
        assert_eq!(color_for(Band::Class(7)), NO_DATA_COLOR);
    }

    #[test]
    fn unclassified_features_are_faint_gray() {
        assert_eq!(fill_for(Band::Class(3), false), FillStyle::NO_DATA);
        assert_eq!(fill_for(Band::NoData, false), FillStyle::NO_DATA);

        let missing = fill_for(Band::NoData, true);
        assert_eq!(missing.fill_color, NO_DATA_COLOR);
        assert!((missing.fill_opacity - CLASSIFIED_OPACITY).abs() < f64::EPSILON);

        let style = fill_for(Band::Class(6), true);
        assert_eq!(style.fill_color, "#08519c");
        assert!((style.fill_opacity - CLASSIFIED_OPACITY).abs() < f64::EPSILON);
    }
}
