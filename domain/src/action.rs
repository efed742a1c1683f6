use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::currency::ConversionError;
use crate::portfolio::{Portfolio, PortfolioError};

/// The kind of a corporate action, without its parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    CashDividend,
    NameChange,
    StockDividend,
    StockSplit,
    SymbolChange,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionKind::CashDividend => write!(f, "cash dividend"),
            ActionKind::NameChange => write!(f, "name change"),
            ActionKind::StockDividend => write!(f, "stock dividend"),
            ActionKind::StockSplit => write!(f, "stock split"),
            ActionKind::SymbolChange => write!(f, "symbol change"),
        }
    }
}

/// A parsed corporate action. Applying it mutates a holding (and possibly the
/// portfolio's cash or key mapping) but never the action itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Cash paid per share, in `currency`. Swept to cash or reinvested
    /// depending on the holding's policy.
    CashDividend { value: f64, currency: String },
    /// `after` new shares for every `before` old shares. 9 for 10 is a reverse split.
    StockSplit { before: u32, after: u32 },
    /// Shares are multiplied by `amount`
    StockDividend { amount: f64 },
    NameChange { new_name: String },
    SymbolChange { new_symbol: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    Portfolio(PortfolioError),
    Conversion(ConversionError),
    /// The ex-dividend price leaves nothing to buy reinvested shares at
    NonPositiveReinvestPrice { symbol: String },
}

impl std::fmt::Display for ActionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionError::Portfolio(e) => write!(f, "{e}"),
            ActionError::Conversion(e) => write!(f, "{e}"),
            ActionError::NonPositiveReinvestPrice { symbol } => write!(
                f,
                "Cannot reinvest dividends of {symbol}: the ex-dividend price is not positive"
            ),
        }
    }
}

impl std::error::Error for ActionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ActionError::Portfolio(e) => Some(e),
            ActionError::Conversion(e) => Some(e),
            ActionError::NonPositiveReinvestPrice { .. } => None,
        }
    }
}

impl From<PortfolioError> for ActionError {
    fn from(error: PortfolioError) -> Self {
        ActionError::Portfolio(error)
    }
}

impl From<ConversionError> for ActionError {
    fn from(error: ConversionError) -> Self {
        ActionError::Conversion(error)
    }
}

impl Action {
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::CashDividend { .. } => ActionKind::CashDividend,
            Action::StockSplit { .. } => ActionKind::StockSplit,
            Action::StockDividend { .. } => ActionKind::StockDividend,
            Action::NameChange { .. } => ActionKind::NameChange,
            Action::SymbolChange { .. } => ActionKind::SymbolChange,
        }
    }

    /// Applies the action to the holding stored under `symbol`.
    ///
    /// Every currency lookup happens before the first write, so an error leaves
    /// the portfolio untouched.
    /// # Errors
    /// - `PortfolioError::UnknownSymbol` if nothing is held under `symbol`
    /// - `PortfolioError::SymbolTaken` if a symbol change targets a held symbol
    /// - `ConversionError` if a required rate is missing
    /// - `ActionError::NonPositiveReinvestPrice` if a reinvested dividend
    ///   would mark the price down to zero or below
    pub fn apply(&self, symbol: &str, portfolio: &mut Portfolio) -> Result<(), ActionError> {
        match self {
            Action::CashDividend { value, currency } => {
                Self::apply_cash_dividend(*value, currency, symbol, portfolio)?;
            }
            Action::StockSplit { before, after } => {
                let multiple = f64::from(*after) / f64::from(*before);
                portfolio.holding_mut(symbol)?.rescale(multiple);
            }
            Action::StockDividend { amount } => {
                portfolio.holding_mut(symbol)?.rescale(*amount);
            }
            Action::NameChange { new_name } => {
                portfolio.holding_mut(symbol)?.rename(new_name.as_str());
            }
            Action::SymbolChange { new_symbol } => {
                portfolio.change_symbol(symbol, new_symbol)?;
            }
        }
        debug!("Applied {} to {symbol}", self.kind());
        Ok(())
    }

    fn apply_cash_dividend(
        value: f64,
        currency: &str,
        symbol: &str,
        portfolio: &mut Portfolio,
    ) -> Result<(), ActionError> {
        let converter = std::sync::Arc::clone(portfolio.converter());
        let cash_currency = portfolio.cash_currency().to_string();

        let holding = portfolio.holding_mut(symbol)?;
        let per_share = converter.convert(value, currency, holding.currency())?;
        let swept_per_share = if holding.reinvest_dividends() {
            None
        } else {
            Some(converter.convert(value, currency, &cash_currency)?)
        };
        let shares_before = holding.shares();
        let ex_dividend_price = holding.price() - per_share;
        if swept_per_share.is_none() && ex_dividend_price <= 0.0 {
            return Err(ActionError::NonPositiveReinvestPrice {
                symbol: symbol.to_string(),
            });
        }

        // Reinvested shares are bought at the ex-dividend price
        holding.mark_down_price(per_share);

        match swept_per_share {
            Some(per_share_in_cash) => {
                portfolio.deposit_cash(per_share_in_cash * shares_before);
            }
            None => {
                let total_distribution = per_share * shares_before;
                holding.add_shares(total_distribution / ex_dividend_price);
            }
        }
        Ok(())
    }
}

/// Renders the body text the action is written with, e.g. `9 for 10`
impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::CashDividend { value, currency } => write!(f, "{value} {currency}/share"),
            Action::StockSplit { before, after } => write!(f, "{after} for {before}"),
            Action::StockDividend { amount } => write!(f, "{amount}/share"),
            Action::NameChange { new_name } => write!(f, "new name is \"{new_name}\""),
            Action::SymbolChange { new_symbol } => write!(f, "new symbol is {new_symbol}"),
        }
    }
}
