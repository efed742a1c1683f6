use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::action::ActionKind;
use crate::holding::Symbol;
use crate::parser::ActionTextParser;

/// One dated, still-textual corporate action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub date: NaiveDate,
    pub symbol: Symbol,
    pub description: String,
}

impl ActionRecord {
    #[must_use]
    pub fn new(date: NaiveDate, symbol: impl Into<Symbol>, description: impl Into<String>) -> Self {
        Self {
            date,
            symbol: symbol.into(),
            description: description.into(),
        }
    }
}

impl std::fmt::Display for ActionRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {:?}", self.date, self.symbol, self.description)
    }
}

/// How records sharing a date are ordered relative to each other
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordOrdering {
    /// By description text. "Symbol change - ..." sorts after every other
    /// recognized action, so renames land last on their day.
    #[default]
    Description,
    /// By action kind, then symbol, then description. Gives the same relative
    /// order of kinds as `Description` without depending on the wording.
    KindPriority,
}

/// Unrecognized descriptions go last on their day and fail when parsed.
fn kind_priority(kind: Option<ActionKind>) -> u8 {
    match kind {
        Some(ActionKind::CashDividend) => 0,
        Some(ActionKind::NameChange) => 1,
        Some(ActionKind::StockDividend) => 2,
        Some(ActionKind::StockSplit) => 3,
        Some(ActionKind::SymbolChange) => 4,
        None => u8::MAX,
    }
}

/// Stable sort by date ascending, then by the chosen same-day ordering
pub fn sort_records(
    records: &mut [ActionRecord],
    ordering: RecordOrdering,
    parser: &ActionTextParser,
) {
    match ordering {
        RecordOrdering::Description => records.sort_by(compare_by_description),
        RecordOrdering::KindPriority => records.sort_by_cached_key(|record| {
            (
                record.date,
                kind_priority(parser.classify(&record.description)),
                record.symbol.clone(),
                record.description.clone(),
            )
        }),
    }
}

fn compare_by_description(a: &ActionRecord, b: &ActionRecord) -> Ordering {
    a.date
        .cmp(&b.date)
        .then_with(|| a.description.cmp(&b.description))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2015, 3, d).unwrap()
    }

    fn descriptions(records: &[ActionRecord]) -> Vec<&str> {
        records.iter().map(|r| r.description.as_str()).collect()
    }

    fn same_day_pair() -> Vec<ActionRecord> {
        vec![
            ActionRecord::new(day(5), "RIM", "Symbol change - new symbol is BB"),
            ActionRecord::new(day(5), "RIM", "Cash dividend - 0.02 USD/share"),
        ]
    }

    #[test]
    fn test_symbol_change_sorts_after_dividend() {
        let mut records = same_day_pair();
        sort_records(&mut records, RecordOrdering::Description, &ActionTextParser::new());
        assert_eq!(
            descriptions(&records),
            vec![
                "Cash dividend - 0.02 USD/share",
                "Symbol change - new symbol is BB"
            ]
        );
    }

    #[test]
    fn test_date_takes_precedence() {
        let mut records = vec![
            ActionRecord::new(day(9), "A", "Cash dividend - 1 USD/share"),
            ActionRecord::new(day(2), "B", "Symbol change - new symbol is C"),
            ActionRecord::new(day(5), "A", "Stock split - 2 for 1"),
        ];
        sort_records(&mut records, RecordOrdering::Description, &ActionTextParser::new());
        let dates: Vec<NaiveDate> = records.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![day(2), day(5), day(9)]);
    }

    #[test]
    fn test_description_order_depends_on_wording() {
        let mut records = vec![
            ActionRecord::new(day(1), "A", "Stock split - 2 for 1"),
            ActionRecord::new(day(1), "A", "Name change - new name is \"X\""),
            ActionRecord::new(day(1), "A", "Stock dividend - 1.1/share"),
            ActionRecord::new(day(1), "A", "Cash dividend - 1 USD/share"),
        ];
        sort_records(&mut records, RecordOrdering::Description, &ActionTextParser::new());
        assert_eq!(
            descriptions(&records),
            vec![
                "Cash dividend - 1 USD/share",
                "Name change - new name is \"X\"",
                "Stock dividend - 1.1/share",
                "Stock split - 2 for 1",
            ]
        );
    }

    #[test]
    fn test_kind_priority_matches_description_order_for_kinds() {
        let parser = ActionTextParser::new();
        let mut by_description = vec![
            ActionRecord::new(day(1), "A", "Symbol change - new symbol is Z"),
            ActionRecord::new(day(1), "A", "Stock split - 2 for 1"),
            ActionRecord::new(day(1), "A", "Name change - new name is \"X\""),
            ActionRecord::new(day(1), "A", "Stock dividend - 1.1/share"),
            ActionRecord::new(day(1), "A", "Cash dividend - 1 USD/share"),
        ];
        let mut by_kind = by_description.clone();
        sort_records(&mut by_description, RecordOrdering::Description, &parser);
        sort_records(&mut by_kind, RecordOrdering::KindPriority, &parser);
        assert_eq!(by_description, by_kind);
    }

    #[test]
    fn test_kind_priority_puts_unrecognized_last() {
        let mut records = vec![
            ActionRecord::new(day(1), "A", "Bogus - 1"),
            ActionRecord::new(day(1), "A", "Symbol change - new symbol is Z"),
        ];
        sort_records(&mut records, RecordOrdering::KindPriority, &ActionTextParser::new());
        assert_eq!(records[1].description, "Bogus - 1");
    }

    #[test]
    fn test_sort_is_stable_for_identical_keys() {
        let mut records = vec![
            ActionRecord::new(day(1), "A", "Cash dividend - 1 USD/share"),
            ActionRecord::new(day(1), "B", "Cash dividend - 1 USD/share"),
        ];
        sort_records(&mut records, RecordOrdering::Description, &ActionTextParser::new());
        assert_eq!(records[0].symbol, "A");
        assert_eq!(records[1].symbol, "B");
    }
}
