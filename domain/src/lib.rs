pub mod action;
pub mod core;
pub mod currency;
pub mod holding;
pub mod parser;
pub mod portfolio;
pub mod record;

pub use action::{Action, ActionError, ActionKind};
pub use crate::core::{RecordErrorKind, Simulation, SimulationError, SimulationState};
pub use currency::{ConversionError, CurrencyConverter};
pub use holding::{Holding, Symbol};
pub use parser::{ActionTextParser, ParseError};
pub use portfolio::{CashLine, HoldingLine, Portfolio, PortfolioError, Snapshot, SnapshotPoint};
pub use record::{ActionRecord, RecordOrdering, sort_records};
