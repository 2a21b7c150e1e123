use std::collections::BTreeMap;
use std::io::Read;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use buwis_core::{StoreError, TaxBracket};
use buwis_db_sqlite::SqliteBracketStore;

/// Errors that can occur when loading bracket table data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketTableError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("tax year {0} has no open-ended top bracket")]
    MissingTopBracket(i32),

    #[error("tax year {0} has more than one open-ended bracket")]
    MultipleTopBrackets(i32),

    #[error("tax year {tax_year}: bracket {bracket_order} does not start where the previous bracket ends")]
    Discontiguous { tax_year: i32, bracket_order: i32 },

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl From<csv::Error> for BracketTableError {
    fn from(err: csv::Error) -> Self {
        BracketTableError::CsvParse(err.to_string())
    }
}

/// A single record from a bracket table CSV file.
///
/// Columns:
/// - `tax_year`: the tax year the schedule applies to
/// - `bracket_order`: 1-based position in the schedule
/// - `min_income`: bracket floor
/// - `max_income`: bracket ceiling (empty for the open-ended top bracket)
/// - `base_tax`: cumulative tax below the floor, as published
/// - `rate`: marginal rate as a decimal (0.25 for 25%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketTableRecord {
    pub tax_year: i32,
    pub bracket_order: i32,
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    pub base_tax: Decimal,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for bracket tables published as CSV.
///
/// Parsing and validation are separate from storage so that callers can load
/// a table into memory (for tests or for an [`buwis_core::InMemoryBracketStore`])
/// or push it into the SQLite store.
pub struct BracketTableLoader;

impl BracketTableLoader {
    /// Parse bracket records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketTableRecord>, BracketTableError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketTableRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Validates records and converts them into bracket rows, grouped and
    /// ordered per year.
    ///
    /// Each year must form a contiguous schedule with exactly one open-ended
    /// bracket in the last position. `excess_over_threshold` is derived from
    /// the floor and every loaded row is active.
    pub fn to_brackets(
        records: &[BracketTableRecord],
    ) -> Result<Vec<TaxBracket>, BracketTableError> {
        let mut by_year: BTreeMap<i32, Vec<&BracketTableRecord>> = BTreeMap::new();
        for record in records {
            by_year.entry(record.tax_year).or_default().push(record);
        }

        let mut brackets = Vec::with_capacity(records.len());
        for (tax_year, mut year_records) in by_year {
            year_records.sort_by_key(|r| r.bracket_order);

            let open_ended = year_records
                .iter()
                .filter(|r| r.max_income.is_none())
                .count();
            if open_ended == 0 {
                return Err(BracketTableError::MissingTopBracket(tax_year));
            }
            if open_ended > 1 {
                return Err(BracketTableError::MultipleTopBrackets(tax_year));
            }

            for pair in year_records.windows(2) {
                if pair[0].max_income != Some(pair[1].min_income) {
                    return Err(BracketTableError::Discontiguous {
                        tax_year,
                        bracket_order: pair[1].bracket_order,
                    });
                }
            }

            brackets.extend(year_records.into_iter().map(|r| TaxBracket {
                tax_year: r.tax_year,
                bracket_order: r.bracket_order,
                min_income: r.min_income,
                max_income: r.max_income,
                base_tax: r.base_tax,
                rate: r.rate,
                excess_over_threshold: r.min_income,
                is_active: true,
            }));
        }

        Ok(brackets)
    }

    /// Loads the records into the store, replacing each affected year's
    /// table. Returns the number of rows written.
    pub async fn load(
        store: &SqliteBracketStore,
        records: &[BracketTableRecord],
    ) -> Result<usize, BracketTableError> {
        let brackets = Self::to_brackets(records)?;

        let mut by_year: BTreeMap<i32, Vec<TaxBracket>> = BTreeMap::new();
        for bracket in brackets {
            by_year.entry(bracket.tax_year).or_default().push(bracket);
        }

        let mut written = 0;
        for (tax_year, table) in by_year {
            written += store.replace_year(tax_year, &table).await?;
        }

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const SAMPLE_CSV: &str = "\
tax_year,bracket_order,min_income,max_income,base_tax,rate
2024,1,0,250000,0,0.00
2024,2,250000,400000,0,0.20
2024,3,400000,,30000,0.25
";

    #[test]
    fn parse_reads_all_records() {
        let records = BracketTableLoader::parse(SAMPLE_CSV.as_bytes()).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].min_income, dec!(0));
        assert_eq!(records[1].rate, dec!(0.20));
    }

    #[test]
    fn parse_empty_max_income_is_open_ended() {
        let records = BracketTableLoader::parse(SAMPLE_CSV.as_bytes()).unwrap();

        assert_eq!(records[2].max_income, None);
        assert_eq!(records[1].max_income, Some(dec!(400000)));
    }

    #[test]
    fn parse_rejects_malformed_numbers() {
        let csv = "tax_year,bracket_order,min_income,max_income,base_tax,rate\n2024,1,zero,,0,0.10";

        let result = BracketTableLoader::parse(csv.as_bytes());

        assert!(matches!(result, Err(BracketTableError::CsvParse(_))));
    }

    #[test]
    fn to_brackets_derives_threshold_and_activates_rows() {
        let records = BracketTableLoader::parse(SAMPLE_CSV.as_bytes()).unwrap();

        let brackets = BracketTableLoader::to_brackets(&records).unwrap();

        assert_eq!(brackets.len(), 3);
        for bracket in &brackets {
            assert_eq!(bracket.excess_over_threshold, bracket.min_income);
            assert!(bracket.is_active);
        }
    }

    #[test]
    fn to_brackets_orders_by_bracket_order() {
        let mut records = BracketTableLoader::parse(SAMPLE_CSV.as_bytes()).unwrap();
        records.reverse();

        let brackets = BracketTableLoader::to_brackets(&records).unwrap();

        let orders: Vec<i32> = brackets.iter().map(|b| b.bracket_order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
    }

    #[test]
    fn to_brackets_requires_an_open_ended_top_bracket() {
        let csv = "\
tax_year,bracket_order,min_income,max_income,base_tax,rate
2024,1,0,250000,0,0.00
2024,2,250000,400000,0,0.20
";
        let records = BracketTableLoader::parse(csv.as_bytes()).unwrap();

        let result = BracketTableLoader::to_brackets(&records);

        assert_eq!(result, Err(BracketTableError::MissingTopBracket(2024)));
    }

    #[test]
    fn to_brackets_rejects_multiple_open_ended_brackets() {
        let csv = "\
tax_year,bracket_order,min_income,max_income,base_tax,rate
2024,1,0,,0,0.00
2024,2,250000,,0,0.20
";
        let records = BracketTableLoader::parse(csv.as_bytes()).unwrap();

        let result = BracketTableLoader::to_brackets(&records);

        assert_eq!(result, Err(BracketTableError::MultipleTopBrackets(2024)));
    }

    #[test]
    fn to_brackets_rejects_gaps_between_brackets() {
        let csv = "\
tax_year,bracket_order,min_income,max_income,base_tax,rate
2024,1,0,250000,0,0.00
2024,2,300000,,0,0.20
";
        let records = BracketTableLoader::parse(csv.as_bytes()).unwrap();

        let result = BracketTableLoader::to_brackets(&records);

        assert_eq!(
            result,
            Err(BracketTableError::Discontiguous {
                tax_year: 2024,
                bracket_order: 2,
            })
        );
    }

    #[test]
    fn to_brackets_validates_years_independently() {
        let csv = "\
tax_year,bracket_order,min_income,max_income,base_tax,rate
2024,1,0,,0,0.00
2025,1,0,250000,0,0.00
2025,2,250000,,0,0.15
";
        let records = BracketTableLoader::parse(csv.as_bytes()).unwrap();

        let brackets = BracketTableLoader::to_brackets(&records).unwrap();

        assert_eq!(brackets.len(), 3);
        assert_eq!(brackets[0].tax_year, 2024);
        assert_eq!(brackets[2].tax_year, 2025);
    }
}
