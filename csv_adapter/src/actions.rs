use std::io;
use std::path::Path;

use chrono::NaiveDate;
use domain::ActionRecord;
use serde::Deserialize;
use tracing::debug;

use crate::CsvError;

pub const DEFAULT_DATE_FORMAT: &str = "%m/%d/%Y";

/// One row of `Day,Symbol,Corporate Action`
#[derive(Debug, Deserialize)]
struct ActionRow {
    #[serde(rename = "Day")]
    day: String,
    #[serde(rename = "Symbol")]
    symbol: String,
    #[serde(rename = "Corporate Action")]
    corporate_action: String,
}

/// Reads action records in file order. Ordering is left to the simulation.
/// # Errors
/// Returns `CsvError` on malformed CSV or dates not in `date_format`
pub fn read_records<R: io::Read>(
    reader: R,
    date_format: &str,
) -> Result<Vec<ActionRecord>, CsvError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (i, row) in csv_reader.deserialize::<ActionRow>().enumerate() {
        let row = row?;
        let date = NaiveDate::parse_from_str(&row.day, date_format).map_err(|_| {
            CsvError::InvalidDate {
                row: i + 1,
                value: row.day.clone(),
                format: date_format.to_string(),
            }
        })?;
        records.push(ActionRecord::new(
            date,
            row.symbol,
            row.corporate_action.trim(),
        ));
    }

    debug!("Read {} corporate action records", records.len());
    Ok(records)
}

/// # Errors
/// Returns `CsvError` if the file cannot be opened or read
pub fn read_records_from_path(
    path: impl AsRef<Path>,
    date_format: &str,
) -> Result<Vec<ActionRecord>, CsvError> {
    let file = std::fs::File::open(path)?;
    read_records(file, date_format)
}
