//! Delimited-text boundary of the simulator: loads holdings and corporate
//! action records, and renders snapshots back out as CSV or JSON lines.

pub mod actions;
pub mod number;
pub mod portfolio;
pub mod presenter;


use std::fmt;

use domain::PortfolioError;

pub use actions::{DEFAULT_DATE_FORMAT, read_records, read_records_from_path};
pub use portfolio::{read_holdings, read_portfolio, read_portfolio_from_path};
pub use presenter::{OutputFormat, write_snapshot, write_snapshot_csv, write_snapshot_json};

#[derive(Debug)]
pub enum CsvError {
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
    InvalidNumber {
        row: usize,
        field: &'static str,
        value: String,
    },
    InvalidDate {
        row: usize,
        value: String,
        format: String,
    },
    Portfolio(PortfolioError),
}

impl fmt::Display for CsvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CsvError::Io(e) => write!(f, "I/O error: {e}"),
            CsvError::Csv(e) => write!(f, "CSV error: {e}"),
            CsvError::Json(e) => write!(f, "Serialization error: {e}"),
            CsvError::InvalidNumber { row, field, value } => {
                write!(f, "Row {row}: {field} {value:?} is not a valid number")
            }
            CsvError::InvalidDate { row, value, format } => {
                write!(f, "Row {row}: {value:?} is not a date in format {format:?}")
            }
            CsvError::Portfolio(e) => write!(f, "Invalid portfolio: {e}"),
        }
    }
}

impl std::error::Error for CsvError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CsvError::Io(e) => Some(e),
            CsvError::Csv(e) => Some(e),
            CsvError::Json(e) => Some(e),
            CsvError::Portfolio(e) => Some(e),
            CsvError::InvalidNumber { .. } | CsvError::InvalidDate { .. } => None,
        }
    }
}

impl From<std::io::Error> for CsvError {
    fn from(error: std::io::Error) -> Self {
        CsvError::Io(error)
    }
}

impl From<csv::Error> for CsvError {
    fn from(error: csv::Error) -> Self {
        CsvError::Csv(error)
    }
}

impl From<serde_json::Error> for CsvError {
    fn from(error: serde_json::Error) -> Self {
        CsvError::Json(error)
    }
}

impl From<PortfolioError> for CsvError {
    fn from(error: PortfolioError) -> Self {
        CsvError::Portfolio(error)
    }
}
