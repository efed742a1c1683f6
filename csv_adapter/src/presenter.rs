use std::io;

use domain::Snapshot;
use serde::{Deserialize, Serialize};

use crate::CsvError;
use crate::number::format_grouped;

const HEADER: [&str; 7] = [
    "Symbol",
    "Description",
    "Country",
    "Shares",
    "Price",
    "Currency",
    "Total Value",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// A heading line followed by a CSV table per snapshot
    #[default]
    Csv,
    /// One JSON object per snapshot, one per line
    Json,
}

/// Writes the snapshot as a CSV table: one row per holding, then the cash
/// and grand total rows.
/// # Errors
/// Returns `CsvError` if writing fails
pub fn write_snapshot_csv<W: io::Write>(writer: W, snapshot: &Snapshot) -> Result<(), CsvError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(HEADER)?;

    for holding in &snapshot.holdings {
        let shares = format!("{:.2}", holding.shares);
        let price = format_grouped(holding.price);
        let total_value = format_grouped(holding.total_value);
        csv_writer.write_record([
            holding.symbol.as_str(),
            holding.description.as_str(),
            holding.country.as_str(),
            shares.as_str(),
            price.as_str(),
            holding.currency.as_str(),
            total_value.as_str(),
        ])?;
    }

    let cash = format_grouped(snapshot.cash.value);
    let total = format_grouped(snapshot.total);
    let currency = snapshot.cash.currency.as_str();
    csv_writer.write_record([
        "CASH",
        "Money Market Account",
        "-",
        "-",
        "-",
        currency,
        cash.as_str(),
    ])?;
    csv_writer.write_record(["TOTAL", "-", "-", "-", "-", currency, total.as_str()])?;

    csv_writer.flush()?;
    Ok(())
}

/// Writes the snapshot as a single line of JSON
/// # Errors
/// Returns `CsvError` if serialization or writing fails
pub fn write_snapshot_json<W: io::Write>(
    mut writer: W,
    snapshot: &Snapshot,
) -> Result<(), CsvError> {
    serde_json::to_writer(&mut writer, snapshot)?;
    writeln!(writer)?;
    Ok(())
}

/// Writes a snapshot in `format`. CSV output is preceded by its heading
/// (`Initial Portfolio` or `Portfolio after <date>`) and followed by a blank line.
/// # Errors
/// Returns `CsvError` if writing fails
pub fn write_snapshot<W: io::Write>(
    mut writer: W,
    snapshot: &Snapshot,
    format: OutputFormat,
) -> Result<(), CsvError> {
    match format {
        OutputFormat::Csv => {
            writeln!(writer, "{}", snapshot.point)?;
            write_snapshot_csv(&mut writer, snapshot)?;
            writeln!(writer)?;
        }
        OutputFormat::Json => write_snapshot_json(&mut writer, snapshot)?,
    }
    Ok(())
}
