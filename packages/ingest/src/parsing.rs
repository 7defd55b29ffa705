//! Folder-name and date parsing.

use std::sync::LazyLock;

use chrono::NaiveDate;
use price_map_stats_models::PeriodLabel;
use regex::Regex;

use crate::IngestError;

/// Offset between ROC (Minguo) years and Gregorian years.
pub const ROC_YEAR_OFFSET: i32 = 1911;

static QUARTER_FOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{4})-q([1-4])$").unwrap_or_else(|_| unreachable!()));

/// Whether `name` looks like a quarter folder, ignoring case.
#[must_use]
pub fn is_quarter_folder(name: &str) -> bool {
    QUARTER_FOLDER.is_match(&name.to_lowercase())
}

/// Converts a quarter folder name to a period label: `"2025-q4"` gives
/// `"2025Q4"`.
///
/// # Errors
///
/// Returns [`IngestError::InvalidQuarterFolder`] for any other name.
pub fn folder_to_quarter(name: &str) -> Result<PeriodLabel, IngestError> {
    let lower = name.to_lowercase();
    let captures = QUARTER_FOLDER
        .captures(&lower)
        .ok_or_else(|| IngestError::InvalidQuarterFolder(name.to_string()))?;
    Ok(format!("{}Q{}", &captures[1], &captures[2]))
}

/// Parses a 7-digit ROC date (`yyyMMdd`): `"1140203"` gives 2025-02-03.
///
/// Anything else, including impossible dates, gives `None`.
#[must_use]
pub fn roc_to_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.len() != 7 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = value[..3].parse().ok()?;
    let month: u32 = value[3..5].parse().ok()?;
    let day: u32 = value[5..].parse().ok()?;
    NaiveDate::from_ymd_opt(year + ROC_YEAR_OFFSET, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_folders() {
        assert_eq!(folder_to_quarter("2025-q4").unwrap(), "2025Q4");
        assert_eq!(folder_to_quarter("2024-Q1").unwrap(), "2024Q1");
        assert!(matches!(
            folder_to_quarter("2025-q5"),
            Err(IngestError::InvalidQuarterFolder(_))
        ));
        assert!(folder_to_quarter("2025q4").is_err());
        assert!(is_quarter_folder("2023-Q2"));
        assert!(!is_quarter_folder("notes"));
    }

    #[test]
    fn roc_dates() {
        assert_eq!(
            roc_to_date("1140203"),
            NaiveDate::from_ymd_opt(2025, 2, 3)
        );
        assert_eq!(roc_to_date(" 1121231 "), NaiveDate::from_ymd_opt(2023, 12, 31));
        assert_eq!(roc_to_date("1140230"), None);
        assert_eq!(roc_to_date("990101"), None);
        assert_eq!(roc_to_date("11402a3"), None);
        assert_eq!(roc_to_date(""), None);
    }
}
