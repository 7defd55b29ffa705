//! Reading and cleaning one county's transaction CSV.
//!
//! The files have a Chinese header row followed by an English description
//! row, which is skipped. Only four columns are read.

use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use price_map_ingest_models::{AggregateConfig, Granularity};
use price_map_stats_models::EntityKey;

use crate::IngestError;
use crate::parsing::roc_to_date;

/// Town (district) name column.
pub const TOWN_COLUMN: &str = "鄉鎮市區";

/// Total price column, in NT$.
pub const TOTAL_PRICE_COLUMN: &str = "總價元";

/// Unit price column, in NT$ per square meter.
pub const UNIT_PRICE_COLUMN: &str = "單價元平方公尺";

/// Transaction date column, ROC `yyyMMdd`.
pub const DATE_COLUMN: &str = "交易年月日";

/// Square meters per ping.
pub const SQUARE_METERS_PER_PING: f64 = 3.305_785;

/// One cleaned transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// Entity the transaction is grouped under.
    pub key: EntityKey,
    /// Total price, in NT$.
    pub total_price: f64,
    /// Unit price, in NT$ per ping.
    pub unit_price_ping: f64,
}

/// Transactions kept from one file, and how many rows were dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CityTransactions {
    /// Rows that passed the date check and cleaning.
    pub transactions: Vec<Transaction>,
    /// Rows dropped for a bad date or by cleaning.
    pub dropped: u64,
}

struct Columns {
    town: Option<usize>,
    total_price: Option<usize>,
    unit_price: Option<usize>,
    date: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Self {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
        };
        Self {
            town: find(TOWN_COLUMN),
            total_price: find(TOTAL_PRICE_COLUMN),
            unit_price: find(UNIT_PRICE_COLUMN),
            date: find(DATE_COLUMN),
        }
    }
}

struct Row {
    town: String,
    total_price: Option<f64>,
    unit_price_ping: Option<f64>,
}

fn field<'a>(record: &'a StringRecord, index: Option<usize>) -> &'a str {
    index.and_then(|i| record.get(i)).unwrap_or_default().trim()
}

fn number(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Whether a city's rows carry no district information: every town cell
/// is empty or equals the city name.
fn lacks_districts(rows: &[Row], city: &str) -> bool {
    let towns: BTreeSet<&str> = rows
        .iter()
        .map(|row| row.town.as_str())
        .filter(|town| !town.is_empty())
        .collect();
    towns.is_empty() || (towns.len() == 1 && towns.contains(city))
}

/// Parses and cleans the CSV of `county`.
///
/// Rows with an invalid date are dropped when the date column exists.
/// For town granularity, a city listed in
/// [`AggregateConfig::city_wide`] whose rows carry no district is keyed
/// under its first district, ready for [`crate::replicate_city_wide`].
///
/// # Errors
///
/// Returns a [`csv::Error`] if the document cannot be parsed.
pub fn parse_city_csv<R: Read>(
    reader: R,
    county: &str,
    granularity: Granularity,
    config: &AggregateConfig,
) -> Result<CityTransactions, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);
    let columns = Columns::from_headers(reader.headers()?);

    let mut rows = Vec::new();
    let mut dropped = 0u64;

    // The first record after the header is the English description row.
    for record in reader.records().skip(1) {
        let record = record?;
        if columns.date.is_some() && roc_to_date(field(&record, columns.date)).is_none() {
            dropped += 1;
            continue;
        }
        rows.push(Row {
            town: field(&record, columns.town).to_string(),
            total_price: number(field(&record, columns.total_price)),
            unit_price_ping: number(field(&record, columns.unit_price))
                .map(|v| v * SQUARE_METERS_PER_PING),
        });
    }

    if granularity == Granularity::Town
        && columns.town.is_some()
        && let Some(first) = config.city_wide.get(county).and_then(|d| d.first())
        && lacks_districts(&rows, county)
    {
        log::info!("{county}: no district column values, using city-wide statistics");
        for row in &mut rows {
            row.town.clone_from(first);
        }
    }

    let cleaning = &config.cleaning;
    let mut transactions = Vec::with_capacity(rows.len());
    for row in rows {
        let (Some(total_price), Some(unit_price_ping)) = (row.total_price, row.unit_price_ping)
        else {
            dropped += 1;
            continue;
        };
        if total_price <= cleaning.min_total_price
            || unit_price_ping <= cleaning.min_unit_price_ping
            || unit_price_ping >= cleaning.max_unit_price_ping
        {
            dropped += 1;
            continue;
        }
        let key = match granularity {
            Granularity::Town => price_map_stats::entity_key(county, &row.town),
            Granularity::County => county.to_string(),
        };
        transactions.push(Transaction {
            key,
            total_price,
            unit_price_ping,
        });
    }

    Ok(CityTransactions {
        transactions,
        dropped,
    })
}

/// Reads and cleans the CSV file of `county`.
///
/// # Errors
///
/// * [`IngestError::Io`] if the file cannot be opened
/// * [`IngestError::Csv`] if it cannot be parsed
pub fn read_city_csv(
    path: &Path,
    county: &str,
    granularity: Granularity,
    config: &AggregateConfig,
) -> Result<CityTransactions, IngestError> {
    let file = std::fs::File::open(path).map_err(|e| IngestError::io(path, e))?;
    parse_city_csv(file, county, granularity, config).map_err(|source| IngestError::Csv {
        location: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// 臺北市: two valid 大安區 rows, one bad date, one too cheap, one
    /// unit price over the cap.
    pub const TAIPEI: &str = "\u{feff}鄉鎮市區,交易標的,總價元,單價元平方公尺,交易年月日
The villages and towns urban district,transaction sign,total price NTD,the unit price (NTD / square meter),transaction year month and day
大安區,房地,15000000,200000,1140203
大安區,房地,25000000,300000,1140315
大安區,房地,18000000,250000,1140230
信義區,房地,900000,200000,1140101
信義區,房地,90000000,2000000,1140101
";

    /// 新竹市 without district information.
    pub const HSINCHU: &str = "鄉鎮市區,總價元,單價元平方公尺,交易年月日
district,total price,unit price,date
新竹市,10000000,100000,1140101
,12000000,120000,1140102
新竹市,14000000,140000,1140103
";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_config;

    #[test]
    fn parses_and_cleans_rows() {
        let parsed = parse_city_csv(
            fixtures::TAIPEI.as_bytes(),
            "臺北市",
            Granularity::Town,
            &default_config(),
        )
        .unwrap();

        assert_eq!(parsed.dropped, 3);
        let keys: Vec<&str> = parsed.transactions.iter().map(|t| t.key.as_str()).collect();
        assert_eq!(keys, vec!["臺北市大安區", "臺北市大安區"]);
        assert!(
            (parsed.transactions[0].unit_price_ping - 200_000.0 * SQUARE_METERS_PER_PING).abs()
                < 1e-6
        );
    }

    #[test]
    fn county_granularity_keys_by_county() {
        let parsed = parse_city_csv(
            fixtures::TAIPEI.as_bytes(),
            "臺北市",
            Granularity::County,
            &default_config(),
        )
        .unwrap();
        assert!(parsed.transactions.iter().all(|t| t.key == "臺北市"));
    }

    #[test]
    fn city_without_districts_uses_first_district() {
        let parsed = parse_city_csv(
            fixtures::HSINCHU.as_bytes(),
            "新竹市",
            Granularity::Town,
            &default_config(),
        )
        .unwrap();
        assert_eq!(parsed.transactions.len(), 3);
        assert!(parsed.transactions.iter().all(|t| t.key == "新竹市東區"));
    }

    #[test]
    fn unparseable_numbers_are_dropped() {
        let text = "鄉鎮市區,總價元,單價元平方公尺
d,t,u
大安區,abc,200000
大安區,15000000,
";
        let parsed =
            parse_city_csv(text.as_bytes(), "臺北市", Granularity::Town, &default_config())
                .unwrap();
        assert!(parsed.transactions.is_empty());
        assert_eq!(parsed.dropped, 2);
    }
}
