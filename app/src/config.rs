use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use csv_adapter::{DEFAULT_DATE_FORMAT, OutputFormat};
use domain::RecordOrdering;

lazy_static::lazy_static! {
    pub static ref PROJECT_NAME: String = String::from("corpsim").to_uppercase();
    /// Env var holding the log filter, checked before `RUST_LOG`
    pub static ref LOG_ENV: String = format!("{}_LOG_LEVEL", PROJECT_NAME.clone());
}

/// Same-day ordering of corporate actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Ordering {
    /// Sort by description text; symbol changes land last
    Description,
    /// Sort by action kind, then symbol
    KindPriority,
}

impl From<Ordering> for RecordOrdering {
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Description => RecordOrdering::Description,
            Ordering::KindPriority => RecordOrdering::KindPriority,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Csv,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => OutputFormat::Csv,
            Format::Json => OutputFormat::Json,
        }
    }
}

/// Simulates corporate actions on a portfolio and prints the portfolio after
/// each simulated day's actions are complete.
#[derive(Parser, Debug)]
#[command(name = "corpsim", version)]
pub struct Config {
    /// Portfolio CSV file
    #[arg(long, env = "CORPSIM_PORTFOLIO", default_value = "portfolio.csv")]
    pub portfolio: PathBuf,

    /// Corporate actions CSV file
    #[arg(long, env = "CORPSIM_ACTIONS", default_value = "corporate_actions.csv")]
    pub actions: PathBuf,

    /// Simulate with reinvested dividends
    #[arg(short, long, env = "CORPSIM_REINVEST_DIVIDENDS")]
    pub reinvest_dividends: bool,

    /// Currency of the cash account and of portfolio totals
    #[arg(long, env = "CORPSIM_CASH_CURRENCY", default_value = "USD")]
    pub cash_currency: String,

    /// chrono format of the actions file's Day column
    #[arg(long, env = "CORPSIM_DATE_FORMAT", default_value = DEFAULT_DATE_FORMAT)]
    pub date_format: String,

    #[arg(long, env = "CORPSIM_ORDERING", value_enum, default_value_t = Ordering::Description)]
    pub ordering: Ordering,

    #[arg(long, env = "CORPSIM_FORMAT", value_enum, default_value_t = Format::Csv)]
    pub format: Format,
}

impl Config {
    /// Parses the command line. Values missing there fall back to `CORPSIM_*`
    /// variables, which may come from a `.env` file.
    pub fn load() -> Self {
        let _ = dotenvy::dotenv();
        Self::parse()
    }
}
