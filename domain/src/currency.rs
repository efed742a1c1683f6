use std::collections::HashMap;

/// Currency conversion errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    UnknownCurrencyPair { from: String, to: String },
}

impl std::fmt::Display for ConversionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConversionError::UnknownCurrencyPair { from, to } => {
                write!(f, "No conversion rate from {from} to {to}")
            }
        }
    }
}

impl std::error::Error for ConversionError {}

/// Static conversion rates between USD, CAD and GBp.
/// Rates are not reciprocals of one another; each ordered pair is looked up as-is.
const DEFAULT_RATES: [(&str, &str, f64); 9] = [
    ("USD", "USD", 1.00),
    ("CAD", "USD", 0.76),
    ("GBp", "USD", 1.57),
    ("USD", "CAD", 1.32),
    ("CAD", "CAD", 1.00),
    ("GBp", "CAD", 2.07),
    ("USD", "GBp", 0.64),
    ("CAD", "GBp", 0.48),
    ("GBp", "GBp", 1.00),
];

/// Fixed-table currency converter, built once and shared read-only for a run.
#[derive(Debug, Clone)]
pub struct CurrencyConverter {
    rates: HashMap<(String, String), f64>,
}

impl CurrencyConverter {
    /// Builds a converter from explicit `(from, to, rate)` entries.
    /// Identity pairs are not implied and must be listed if needed.
    pub fn from_rates<I, S>(rates: I) -> Self
    where
        I: IntoIterator<Item = (S, S, f64)>,
        S: Into<String>,
    {
        Self {
            rates: rates
                .into_iter()
                .map(|(from, to, rate)| ((from.into(), to.into()), rate))
                .collect(),
        }
    }

    #[must_use]
    pub fn rate(&self, from: &str, to: &str) -> Option<f64> {
        self.rates
            .get(&(from.to_string(), to.to_string()))
            .copied()
    }

    /// Converts `value` expressed in `from` into `to`
    /// # Errors
    /// Returns `ConversionError::UnknownCurrencyPair` if the ordered pair is not in the table
    pub fn convert(&self, value: f64, from: &str, to: &str) -> Result<f64, ConversionError> {
        self.rate(from, to)
            .map(|rate| value * rate)
            .ok_or_else(|| ConversionError::UnknownCurrencyPair {
                from: from.to_string(),
                to: to.to_string(),
            })
    }

    /// Currencies that appear on either side of at least one rate, sorted
    #[must_use]
    pub fn currencies(&self) -> Vec<&str> {
        let mut currencies: Vec<&str> = self
            .rates
            .keys()
            .flat_map(|(from, to)| [from.as_str(), to.as_str()])
            .collect();
        currencies.sort_unstable();
        currencies.dedup();
        currencies
    }
}

impl Default for CurrencyConverter {
    fn default() -> Self {
        Self::from_rates(DEFAULT_RATES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_same_currency() {
        let converter = CurrencyConverter::default();
        assert_eq!(converter.convert(5.25, "USD", "USD"), Ok(5.25 * 1.00));
    }

    #[test]
    fn test_convert_different_currency() {
        let converter = CurrencyConverter::default();
        assert_eq!(converter.convert(5.25, "USD", "CAD"), Ok(5.25 * 1.32));
    }

    #[test]
    fn test_rates_are_not_reciprocal() {
        let converter = CurrencyConverter::default();
        let there = converter.convert(100.0, "USD", "CAD").unwrap();
        let back = converter.convert(there, "CAD", "USD").unwrap();
        assert!((back - 100.32).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_pair() {
        let converter = CurrencyConverter::default();
        let result = converter.convert(1.0, "USD", "EUR");
        assert!(matches!(
            result,
            Err(ConversionError::UnknownCurrencyPair { ref from, ref to }) if from == "USD" && to == "EUR"
        ));
    }

    #[test]
    fn test_identity_must_be_listed() {
        let converter = CurrencyConverter::from_rates([("USD", "CAD", 1.32)]);
        assert!(converter.convert(1.0, "USD", "USD").is_err());
        assert!(converter.convert(1.0, "CAD", "USD").is_err());
    }

    #[test]
    fn test_default_currencies() {
        let converter = CurrencyConverter::default();
        assert_eq!(converter.currencies(), vec!["CAD", "GBp", "USD"]);
    }
}
