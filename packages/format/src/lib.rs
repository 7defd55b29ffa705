#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Display formatting for price metrics.
//!
//! Total prices are shown in units of 10,000 NT$ (`萬`), unit prices in
//! NT$ per ping. Numbers use `zh-Hant-TW` grouping (comma every three
//! digits) after rounding half up to an integer.

use price_map_stats_models::MetricKind;

/// Shown in place of a missing value.
pub const MISSING: &str = "—";

/// Panel name while nothing is hovered or pinned.
pub const PLACEHOLDER_NAME: &str = "（滑鼠移上去）";

/// Name shown for a feature without region names.
pub const UNKNOWN_NAME: &str = "（未知）";

/// Legend text when thresholds could not be computed.
pub const NO_LEGEND_MESSAGE: &str = "沒有足夠資料產生圖例";

/// Rounds half toward positive infinity.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Formats an integer with a comma every three digits.
#[must_use]
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Formats a value compactly, as used by legend labels and chart axes.
///
/// `15_000_000` total price gives `"1,500萬"`; `123_456.4` unit price
/// gives `"123,456"`.
#[must_use]
pub fn format_value(metric: MetricKind, value: f64) -> String {
    match metric {
        MetricKind::TotalPriceMedian => {
            format!("{}萬", group_thousands(round_half_up(value / 10_000.0)))
        }
        MetricKind::UnitPriceMedian => group_thousands(round_half_up(value)),
    }
}

/// Formats a chart axis tick or tooltip value; missing values are empty.
#[must_use]
pub fn format_axis(metric: MetricKind, value: Option<f64>) -> String {
    value.map_or_else(String::new, |v| format_value(metric, v))
}

/// Formats a value for the detail panel, with its unit.
#[must_use]
pub fn format_panel_value(metric: MetricKind, value: Option<f64>) -> String {
    let Some(value) = value else {
        return MISSING.to_string();
    };
    match metric {
        MetricKind::TotalPriceMedian => {
            format!("{} 萬", group_thousands(round_half_up(value / 10_000.0)))
        }
        MetricKind::UnitPriceMedian => {
            format!("{} 元/坪", group_thousands(round_half_up(value)))
        }
    }
}

/// Short metric name used as the panel value prefix.
#[must_use]
pub const fn metric_label(metric: MetricKind) -> &'static str {
    match metric {
        MetricKind::TotalPriceMedian => "總價中位數",
        MetricKind::UnitPriceMedian => "單價中位數",
    }
}

/// Panel value line, e.g. `"總價中位數：1,500 萬"`.
#[must_use]
pub fn panel_value_text(metric: MetricKind, value: Option<f64>) -> String {
    format!(
        "{}：{}",
        metric_label(metric),
        format_panel_value(metric, value)
    )
}

/// Panel unit note.
#[must_use]
pub const fn panel_unit(metric: MetricKind) -> &'static str {
    match metric {
        MetricKind::TotalPriceMedian => "（單位：萬元）",
        MetricKind::UnitPriceMedian => "（單位：元/坪）",
    }
}

/// Legend heading.
#[must_use]
pub const fn legend_title(metric: MetricKind) -> &'static str {
    match metric {
        MetricKind::TotalPriceMedian => "總價中位數（分位數分級）",
        MetricKind::UnitPriceMedian => "單價中位數（元/坪，分位數分級）",
    }
}

/// Legend footnote explaining the gray features.
#[must_use]
pub fn legend_footnote(min_display_count: u64) -> String {
    format!("樣本數 < {min_display_count}：淡灰顯示")
}

/// Trend chart dataset title.
#[must_use]
pub const fn chart_title(metric: MetricKind) -> &'static str {
    match metric {
        MetricKind::TotalPriceMedian => "總價中位數",
        MetricKind::UnitPriceMedian => "單價中位數（元/坪）",
    }
}

/// Human-readable name of a town, `"臺北市 大安區"`.
#[must_use]
pub fn display_name(region: &str, sub_region: &str) -> String {
    let name = format!("{region} {sub_region}");
    let name = name.trim();
    if name.is_empty() {
        UNKNOWN_NAME.to_string()
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
        assert_eq!(group_thousands(-45_000), "-45,000");
    }

    #[test]
    fn rounding_matches_half_up() {
        assert_eq!(round_half_up(1.5), 2);
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(2.49), 2);
        assert_eq!(round_half_up(-1.5), -1);
    }

    #[test]
    fn compact_values() {
        assert_eq!(
            format_value(MetricKind::TotalPriceMedian, 15_000_000.0),
            "1,500萬"
        );
        assert_eq!(format_value(MetricKind::TotalPriceMedian, 12_345.0), "1萬");
        assert_eq!(
            format_value(MetricKind::UnitPriceMedian, 123_456.4),
            "123,456"
        );
        assert_eq!(format_axis(MetricKind::UnitPriceMedian, None), "");
    }

    #[test]
    fn panel_values() {
        assert_eq!(
            panel_value_text(MetricKind::TotalPriceMedian, Some(28_500_000.0)),
            "總價中位數：2,850 萬"
        );
        assert_eq!(
            panel_value_text(MetricKind::UnitPriceMedian, Some(1_050_000.0)),
            "單價中位數：1,050,000 元/坪"
        );
        assert_eq!(
            format_panel_value(MetricKind::UnitPriceMedian, None),
            MISSING
        );
    }

    #[test]
    fn names() {
        assert_eq!(display_name("臺北市", "大安區"), "臺北市 大安區");
        assert_eq!(display_name("臺北市", ""), "臺北市");
        assert_eq!(display_name("", ""), UNKNOWN_NAME);
    }

    #[test]
    fn titles_depend_on_metric() {
        assert_ne!(
            legend_title(MetricKind::TotalPriceMedian),
            legend_title(MetricKind::UnitPriceMedian)
        );
        assert_eq!(chart_title(MetricKind::UnitPriceMedian), "單價中位數（元/坪）");
        assert_eq!(legend_footnote(10), "樣本數 < 10：淡灰顯示");
    }
}
