use serde::{Deserialize, Serialize};

pub type Symbol = String;

/// One open position in a single symbol.
///
/// The symbol is read-only from outside the crate: it doubles as the key the
/// holding is stored under, so only [`crate::portfolio::Portfolio::change_symbol`]
/// may rewrite it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    symbol: Symbol,
    description: String,
    country: String,
    shares: f64,
    price: f64,
    currency: String,
    reinvest_dividends: bool,
}

impl Holding {
    #[must_use]
    pub fn new(
        symbol: impl Into<Symbol>,
        description: impl Into<String>,
        country: impl Into<String>,
        shares: f64,
        price: f64,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            description: description.into(),
            country: country.into(),
            shares,
            price,
            currency: currency.into(),
            reinvest_dividends: false,
        }
    }

    /// Sets the dividend policy. Only meant to be used while building the portfolio.
    #[must_use]
    pub fn with_reinvest_dividends(mut self, reinvest_dividends: bool) -> Self {
        self.reinvest_dividends = reinvest_dividends;
        self
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn shares(&self) -> f64 {
        self.shares
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn reinvest_dividends(&self) -> bool {
        self.reinvest_dividends
    }

    /// Position value in the holding's own currency
    #[must_use]
    pub fn total_value(&self) -> f64 {
        self.shares * self.price
    }

    /// Lowers the share price by `per_share`. No clamping: the price may go negative.
    pub(crate) fn mark_down_price(&mut self, per_share: f64) {
        self.price -= per_share;
    }

    /// Multiplies the share count by `multiple` and divides the price by it,
    /// leaving the total value unchanged.
    pub(crate) fn rescale(&mut self, multiple: f64) {
        self.shares *= multiple;
        self.price /= multiple;
    }

    pub(crate) fn add_shares(&mut self, shares: f64) {
        self.shares += shares;
    }

    pub(crate) fn rename(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub(crate) fn set_symbol(&mut self, symbol: Symbol) {
        self.symbol = symbol;
    }
}

impl std::fmt::Display for Holding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Holding<{}, {:.2} shares, {:.2}/share, {:.2} {} total value>",
            self.symbol,
            self.shares,
            self.price,
            self.total_value(),
            self.currency
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn illuminati() -> Holding {
        Holding::new("IL", "Illuminati", "BY", 120.0, 10.0, "USD")
    }

    #[test]
    fn test_total_value() {
        assert_eq!(illuminati().total_value(), 1200.0);
    }

    #[test]
    fn test_reinvest_defaults_to_false() {
        assert!(!illuminati().reinvest_dividends());
        assert!(illuminati().with_reinvest_dividends(true).reinvest_dividends());
    }

    #[test]
    fn test_rescale_keeps_total_value() {
        let mut holding = illuminati();
        holding.rescale(0.9);
        assert!((holding.total_value() - 1200.0).abs() < 1e-9);
        assert!((holding.shares() - 108.0).abs() < 1e-9);
    }

    #[test]
    fn test_mark_down_can_go_negative() {
        let mut holding = illuminati();
        holding.mark_down_price(12.5);
        assert_eq!(holding.price(), -2.5);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            illuminati().to_string(),
            "Holding<IL, 120.00 shares, 10.00/share, 1200.00 USD total value>"
        );
    }
}
