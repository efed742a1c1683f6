use std::io;
use std::path::Path;
use std::sync::Arc;

use domain::{CurrencyConverter, Holding, Portfolio};
use serde::Deserialize;
use tracing::debug;

use crate::CsvError;
use crate::number::parse_grouped;

/// One row of `Symbol,Description,Country,Shares,Price,Currency`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct HoldingRow {
    symbol: String,
    description: String,
    country: String,
    shares: String,
    price: String,
    currency: String,
}

fn number(row: usize, field: &'static str, value: &str) -> Result<f64, CsvError> {
    parse_grouped(value).ok_or_else(|| CsvError::InvalidNumber {
        row,
        field,
        value: value.to_string(),
    })
}

fn non_negative(row: usize, field: &'static str, value: &str) -> Result<f64, CsvError> {
    match number(row, field, value)? {
        n if n >= 0.0 => Ok(n),
        _ => Err(CsvError::InvalidNumber {
            row,
            field,
            value: value.to_string(),
        }),
    }
}

/// Reads holdings, applying the same dividend policy to every one of them
/// # Errors
/// Returns `CsvError` on malformed CSV, unparseable numbers or a negative price
pub fn read_holdings<R: io::Read>(
    reader: R,
    reinvest_dividends: bool,
) -> Result<Vec<Holding>, CsvError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut holdings = Vec::new();
    for (i, row) in csv_reader.deserialize::<HoldingRow>().enumerate() {
        let row_number = i + 1;
        let row = row?;
        let shares = number(row_number, "Shares", &row.shares)?;
        let price = non_negative(row_number, "Price", &row.price)?;
        holdings.push(
            Holding::new(
                row.symbol,
                row.description,
                row.country,
                shares,
                price,
                row.currency,
            )
            .with_reinvest_dividends(reinvest_dividends),
        );
    }

    debug!("Read {} holdings", holdings.len());
    Ok(holdings)
}

/// Reads holdings and assembles them into a portfolio with an empty cash
/// sleeve in `cash_currency`
/// # Errors
/// Returns `CsvError` on unreadable input or duplicate symbols
pub fn read_portfolio<R: io::Read>(
    reader: R,
    converter: Arc<CurrencyConverter>,
    reinvest_dividends: bool,
    cash_currency: &str,
) -> Result<Portfolio, CsvError> {
    let holdings = read_holdings(reader, reinvest_dividends)?;
    Ok(Portfolio::new(holdings, converter)?.with_cash(0.0, cash_currency))
}

/// # Errors
/// Returns `CsvError` if the file cannot be opened or read
pub fn read_portfolio_from_path(
    path: impl AsRef<Path>,
    converter: Arc<CurrencyConverter>,
    reinvest_dividends: bool,
    cash_currency: &str,
) -> Result<Portfolio, CsvError> {
    let file = std::fs::File::open(path)?;
    read_portfolio(file, converter, reinvest_dividends, cash_currency)
}
