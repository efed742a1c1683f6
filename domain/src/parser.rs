use crate::action::{Action, ActionKind};

/// Action text parsing errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    UnrecognizedActionText {
        text: String,
    },
    MalformedActionBody {
        kind: ActionKind,
        body: String,
        reason: String,
    },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::UnrecognizedActionText { text } => {
                write!(f, "Unrecognized corporate action: {text:?}")
            }
            ParseError::MalformedActionBody { kind, body, reason } => {
                write!(f, "Malformed {kind} {body:?}: {reason}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

type BodyParser = fn(&str) -> Result<Action, String>;

/// One recognized action grammar: a literal prefix and the parser for what follows it
#[derive(Debug, Clone, Copy)]
pub struct ActionRule {
    pub prefix: &'static str,
    pub kind: ActionKind,
    parse_body: BodyParser,
}

/// Evaluated top to bottom. No prefix may be a prefix of another, so the order
/// never decides which rule matches.
static RULES: [ActionRule; 5] = [
    ActionRule {
        prefix: "Cash dividend - ",
        kind: ActionKind::CashDividend,
        parse_body: parse_cash_dividend,
    },
    ActionRule {
        prefix: "Stock split - ",
        kind: ActionKind::StockSplit,
        parse_body: parse_stock_split,
    },
    ActionRule {
        prefix: "Stock dividend - ",
        kind: ActionKind::StockDividend,
        parse_body: parse_stock_dividend,
    },
    ActionRule {
        prefix: "Name change - ",
        kind: ActionKind::NameChange,
        parse_body: parse_name_change,
    },
    ActionRule {
        prefix: "Symbol change - ",
        kind: ActionKind::SymbolChange,
        parse_body: parse_symbol_change,
    },
];

const PER_SHARE_SUFFIX: &str = "/share";
const SPLIT_SEPARATOR: &str = " for ";
const NEW_SYMBOL_PREFIX: &str = "new symbol is ";
const NEW_NAME_PREFIX: &str = "new name is \"";

/// Turns corporate action descriptions into [`Action`]s
#[derive(Debug, Clone)]
pub struct ActionTextParser {
    rules: &'static [ActionRule],
}

impl Default for ActionTextParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionTextParser {
    #[must_use]
    pub fn new() -> Self {
        Self { rules: &RULES }
    }

    #[must_use]
    pub fn rules(&self) -> &'static [ActionRule] {
        self.rules
    }

    fn rule_for(&self, description: &str) -> Option<&ActionRule> {
        self.rules
            .iter()
            .find(|rule| description.starts_with(rule.prefix))
    }

    /// The kind of action `description` describes, judged by its prefix alone
    #[must_use]
    pub fn classify(&self, description: &str) -> Option<ActionKind> {
        self.rule_for(description).map(|rule| rule.kind)
    }

    /// Parses a full description such as `Stock split - 9 for 10`
    /// # Errors
    /// - `ParseError::UnrecognizedActionText` if no prefix matches
    /// - `ParseError::MalformedActionBody` if the text after the prefix is invalid
    pub fn parse(&self, description: &str) -> Result<Action, ParseError> {
        let rule = self
            .rule_for(description)
            .ok_or_else(|| ParseError::UnrecognizedActionText {
                text: description.to_string(),
            })?;
        let body = &description[rule.prefix.len()..];
        (rule.parse_body)(body).map_err(|reason| ParseError::MalformedActionBody {
            kind: rule.kind,
            body: body.to_string(),
            reason,
        })
    }
}

fn strip_per_share(body: &str) -> Result<&str, String> {
    body.strip_suffix(PER_SHARE_SUFFIX)
        .ok_or_else(|| format!("expected the amount to end with {PER_SHARE_SUFFIX:?}"))
}

fn parse_positive(number: &str) -> Result<f64, String> {
    let value: f64 = number
        .trim()
        .parse()
        .map_err(|_| format!("{number:?} is not a number"))?;
    if !value.is_finite() || value <= 0.0 {
        return Err(format!("{number:?} must be a positive amount"));
    }
    Ok(value)
}

fn parse_share_count(number: &str) -> Result<u32, String> {
    let count: u32 = number
        .trim()
        .parse()
        .map_err(|_| format!("{number:?} is not a whole share count"))?;
    if count == 0 {
        return Err("share counts must be greater than 0".to_string());
    }
    Ok(count)
}

/// `<value> <CURRENCY>/share`
fn parse_cash_dividend(body: &str) -> Result<Action, String> {
    let amount = strip_per_share(body)?;
    let (value, currency) = amount
        .split_once(' ')
        .ok_or_else(|| "expected \"<value> <currency>/share\"".to_string())?;
    if currency.is_empty() || currency.contains(char::is_whitespace) {
        return Err(format!("{currency:?} is not a currency code"));
    }
    let value: f64 = value
        .parse()
        .map_err(|_| format!("{value:?} is not a number"))?;
    if !value.is_finite() {
        return Err(format!("{value} is not a finite amount"));
    }
    Ok(Action::CashDividend {
        value,
        currency: currency.to_string(),
    })
}

/// `<after> for <before>`
fn parse_stock_split(body: &str) -> Result<Action, String> {
    let (after, before) = body
        .split_once(SPLIT_SEPARATOR)
        .ok_or_else(|| format!("expected \"<after>{SPLIT_SEPARATOR}<before>\""))?;
    Ok(Action::StockSplit {
        before: parse_share_count(before)?,
        after: parse_share_count(after)?,
    })
}

/// `<amount>/share`
fn parse_stock_dividend(body: &str) -> Result<Action, String> {
    let amount = parse_positive(strip_per_share(body)?)?;
    Ok(Action::StockDividend { amount })
}

/// `new name is "<NAME>"`
fn parse_name_change(body: &str) -> Result<Action, String> {
    let new_name = body
        .strip_prefix(NEW_NAME_PREFIX)
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or_else(|| "expected 'new name is \"<name>\"'".to_string())?;
    Ok(Action::NameChange {
        new_name: new_name.to_string(),
    })
}

/// `new symbol is <SYMBOL>`
fn parse_symbol_change(body: &str) -> Result<Action, String> {
    let new_symbol = body
        .strip_prefix(NEW_SYMBOL_PREFIX)
        .ok_or_else(|| format!("expected \"{NEW_SYMBOL_PREFIX}<symbol>\""))?;
    if new_symbol.is_empty() || new_symbol.contains(char::is_whitespace) {
        return Err(format!("{new_symbol:?} is not a symbol"));
    }
    Ok(Action::SymbolChange {
        new_symbol: new_symbol.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(description: &str) -> Result<Action, ParseError> {
        ActionTextParser::new().parse(description)
    }

    #[test]
    fn test_parse_cash_dividend() {
        assert_eq!(
            parse("Cash dividend - 0.02 USD/share"),
            Ok(Action::CashDividend {
                value: 0.02,
                currency: "USD".to_string()
            })
        );
    }

    #[test]
    fn test_parse_stock_split() {
        assert_eq!(
            parse("Stock split - 9 for 10"),
            Ok(Action::StockSplit {
                before: 10,
                after: 9
            })
        );
    }

    #[test]
    fn test_parse_stock_dividend() {
        assert_eq!(
            parse("Stock dividend - 1.075/share"),
            Ok(Action::StockDividend { amount: 1.075 })
        );
    }

    #[test]
    fn test_parse_symbol_change() {
        assert_eq!(
            parse("Symbol change - new symbol is BB"),
            Ok(Action::SymbolChange {
                new_symbol: "BB".to_string()
            })
        );
    }

    #[test]
    fn test_parse_name_change() {
        assert_eq!(
            parse("Name change - new name is \"Blackberry\""),
            Ok(Action::NameChange {
                new_name: "Blackberry".to_string()
            })
        );
    }

    #[test]
    fn test_name_may_be_empty() {
        assert_eq!(
            parse("Name change - new name is \"\""),
            Ok(Action::NameChange {
                new_name: String::new()
            })
        );
    }

    #[test]
    fn test_name_may_contain_quotes() {
        assert_eq!(
            parse("Name change - new name is \"The \"Big\" Co\""),
            Ok(Action::NameChange {
                new_name: "The \"Big\" Co".to_string()
            })
        );
    }

    #[test]
    fn test_unrecognized_text() {
        assert!(matches!(
            parse("Spin-off - 1 NEWCO/share"),
            Err(ParseError::UnrecognizedActionText { .. })
        ));
        // Prefixes are case sensitive and must include the separator
        assert!(matches!(
            parse("cash dividend - 0.02 USD/share"),
            Err(ParseError::UnrecognizedActionText { .. })
        ));
        assert!(matches!(
            parse("Stock split 9 for 10"),
            Err(ParseError::UnrecognizedActionText { .. })
        ));
    }

    #[test]
    fn test_malformed_bodies() {
        let malformed = [
            ("Cash dividend - 0.02 USD", ActionKind::CashDividend),
            ("Cash dividend - 0.02/share", ActionKind::CashDividend),
            ("Cash dividend - abc USD/share", ActionKind::CashDividend),
            ("Stock split - 9 to 10", ActionKind::StockSplit),
            ("Stock split - 9 for 0", ActionKind::StockSplit),
            ("Stock split - 1.5 for 1", ActionKind::StockSplit),
            ("Stock dividend - 1.075", ActionKind::StockDividend),
            ("Stock dividend - 0/share", ActionKind::StockDividend),
            ("Name change - new name is Blackberry", ActionKind::NameChange),
            ("Symbol change - BB", ActionKind::SymbolChange),
            ("Symbol change - new symbol is ", ActionKind::SymbolChange),
        ];
        for (description, expected_kind) in malformed {
            match parse(description) {
                Err(ParseError::MalformedActionBody { kind, .. }) => {
                    assert_eq!(kind, expected_kind, "{description}");
                }
                other => panic!("{description}: expected a malformed body, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_no_prefix_is_a_prefix_of_another() {
        let rules = ActionTextParser::new().rules();
        for (i, a) in rules.iter().enumerate() {
            for (j, b) in rules.iter().enumerate() {
                if i != j {
                    assert!(
                        !b.prefix.starts_with(a.prefix),
                        "{:?} shadows {:?}",
                        a.prefix,
                        b.prefix
                    );
                }
            }
        }
    }

    #[test]
    fn test_one_rule_per_kind() {
        let mut kinds: Vec<ActionKind> = ActionTextParser::new()
            .rules()
            .iter()
            .map(|rule| rule.kind)
            .collect();
        kinds.sort();
        kinds.dedup();
        assert_eq!(kinds.len(), 5);
    }

    #[test]
    fn test_classify() {
        let parser = ActionTextParser::new();
        assert_eq!(
            parser.classify("Symbol change - anything"),
            Some(ActionKind::SymbolChange)
        );
        assert_eq!(parser.classify("Merger - XYZ"), None);
    }

    #[test]
    fn test_display_matches_parsed_body() {
        let parser = ActionTextParser::new();
        for rule in parser.rules() {
            let body = match rule.kind {
                ActionKind::CashDividend => "0.02 USD/share",
                ActionKind::StockSplit => "9 for 10",
                ActionKind::StockDividend => "1.075/share",
                ActionKind::NameChange => "new name is \"Blackberry\"",
                ActionKind::SymbolChange => "new symbol is BB",
            };
            let action = parser.parse(&format!("{}{body}", rule.prefix)).unwrap();
            assert_eq!(action.to_string(), body);
        }
    }
}
