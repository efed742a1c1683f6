use std::sync::Arc;

use chrono::NaiveDate;
use in_memory_adapter::{InMemoryRepo, RekeyError};
use serde::{Deserialize, Serialize};

use crate::currency::{ConversionError, CurrencyConverter};
use crate::holding::{Holding, Symbol};

pub type HoldingRepo = InMemoryRepo<Holding, Symbol>;

pub const DEFAULT_CASH_CURRENCY: &str = "USD";

/// Errors raised while building or re-keying a portfolio
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortfolioError {
    DuplicateSymbol { symbol: Symbol },
    UnknownSymbol { symbol: Symbol },
    SymbolTaken { symbol: Symbol },
}

impl std::fmt::Display for PortfolioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortfolioError::DuplicateSymbol { symbol } => {
                write!(f, "Symbol {symbol} appears more than once in the portfolio")
            }
            PortfolioError::UnknownSymbol { symbol } => {
                write!(f, "No holding for symbol {symbol}")
            }
            PortfolioError::SymbolTaken { symbol } => {
                write!(f, "Symbol {symbol} is already held")
            }
        }
    }
}

impl std::error::Error for PortfolioError {}

/// Holdings plus a cash sleeve. The single writer for all holding state.
#[derive(Debug, Clone)]
pub struct Portfolio {
    holdings: HoldingRepo,
    cash_value: f64,
    cash_currency: String,
    converter: Arc<CurrencyConverter>,
}

impl Portfolio {
    /// Creates a portfolio with no cash, denominated in USD
    /// # Errors
    /// Returns `PortfolioError::DuplicateSymbol` if two holdings share a symbol
    pub fn new<I>(holdings: I, converter: Arc<CurrencyConverter>) -> Result<Self, PortfolioError>
    where
        I: IntoIterator<Item = Holding>,
    {
        let mut repo = HoldingRepo::new();
        for holding in holdings {
            let symbol = holding.symbol().to_string();
            if repo.contains(&symbol) {
                return Err(PortfolioError::DuplicateSymbol { symbol });
            }
            repo.insert(symbol, holding);
        }

        Ok(Self {
            holdings: repo,
            cash_value: 0.0,
            cash_currency: DEFAULT_CASH_CURRENCY.to_string(),
            converter,
        })
    }

    #[must_use]
    pub fn with_cash(mut self, value: f64, currency: impl Into<String>) -> Self {
        self.cash_value = value;
        self.cash_currency = currency.into();
        self
    }

    pub fn holding(&self, symbol: &str) -> Option<&Holding> {
        self.holdings.get(symbol)
    }

    /// Holdings in ascending symbol order
    pub fn holdings(&self) -> impl Iterator<Item = &Holding> {
        self.holdings.values()
    }

    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    pub fn cash_value(&self) -> f64 {
        self.cash_value
    }

    pub fn cash_currency(&self) -> &str {
        &self.cash_currency
    }

    pub fn converter(&self) -> &Arc<CurrencyConverter> {
        &self.converter
    }

    pub(crate) fn holding_mut(&mut self, symbol: &str) -> Result<&mut Holding, PortfolioError> {
        self.holdings
            .get_mut(symbol)
            .ok_or_else(|| PortfolioError::UnknownSymbol {
                symbol: symbol.to_string(),
            })
    }

    pub(crate) fn deposit_cash(&mut self, amount: f64) {
        self.cash_value += amount;
    }

    /// Moves the holding stored under `old` to `new` and updates its symbol in
    /// the same step, so it is never reachable under both keys or neither.
    pub(crate) fn change_symbol(&mut self, old: &str, new: &str) -> Result<(), PortfolioError> {
        if old == new {
            return self.holding_mut(old).map(|_| ());
        }
        self.holdings
            .rekey(old, new.to_string(), |holding| {
                holding.set_symbol(new.to_string());
            })
            .map_err(|e| match e {
                RekeyError::MissingKey => PortfolioError::UnknownSymbol {
                    symbol: old.to_string(),
                },
                RekeyError::KeyTaken => PortfolioError::SymbolTaken {
                    symbol: new.to_string(),
                },
            })
    }

    /// Cash plus every holding converted into the cash currency.
    /// Recomputed on each call.
    /// # Errors
    /// Returns `ConversionError` if a holding's currency has no rate to the cash currency
    pub fn value(&self) -> Result<f64, ConversionError> {
        self.holdings()
            .try_fold(self.cash_value, |total, holding| -> Result<f64, ConversionError> {
                let value = self.converter.convert(
                    holding.total_value(),
                    holding.currency(),
                    &self.cash_currency,
                )?;
                Ok(total + value)
            })
    }

    /// Materializes the current state for presentation
    /// # Errors
    /// Returns `ConversionError` if the grand total cannot be computed
    pub fn snapshot(&self, point: SnapshotPoint) -> Result<Snapshot, ConversionError> {
        Ok(Snapshot {
            point,
            holdings: self.holdings().map(HoldingLine::from).collect(),
            cash: CashLine {
                currency: self.cash_currency.clone(),
                value: self.cash_value,
            },
            total: self.value()?,
        })
    }
}

/// When a snapshot was taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "date", rename_all = "snake_case")]
pub enum SnapshotPoint {
    Initial,
    After(NaiveDate),
}

impl std::fmt::Display for SnapshotPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotPoint::Initial => write!(f, "Initial Portfolio"),
            SnapshotPoint::After(date) => write!(f, "Portfolio after {date}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingLine {
    pub symbol: Symbol,
    pub description: String,
    pub country: String,
    pub shares: f64,
    pub price: f64,
    pub currency: String,
    pub total_value: f64,
}

impl From<&Holding> for HoldingLine {
    fn from(holding: &Holding) -> Self {
        Self {
            symbol: holding.symbol().to_string(),
            description: holding.description().to_string(),
            country: holding.country().to_string(),
            shares: holding.shares(),
            price: holding.price(),
            currency: holding.currency().to_string(),
            total_value: holding.total_value(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashLine {
    pub currency: String,
    pub value: f64,
}

/// Point-in-time view of a portfolio. Formatting is left to the presenter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub point: SnapshotPoint,
    pub holdings: Vec<HoldingLine>,
    pub cash: CashLine,
    /// Cash plus holdings, in the cash currency
    pub total: f64,
}
