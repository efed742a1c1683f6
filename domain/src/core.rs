use std::iter::FusedIterator;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::action::ActionError;
use crate::currency::ConversionError;
use crate::parser::{ActionTextParser, ParseError};
use crate::portfolio::{Portfolio, Snapshot, SnapshotPoint};
use crate::record::{ActionRecord, RecordOrdering, sort_records};

/// Why a single record could not be applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordErrorKind {
    Parse(ParseError),
    Action(ActionError),
}

impl std::fmt::Display for RecordErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordErrorKind::Parse(e) => write!(f, "{e}"),
            RecordErrorKind::Action(e) => write!(f, "{e}"),
        }
    }
}

/// Fatal simulation errors. The run stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimulationError {
    /// The record at `index` (in processing order) could not be applied
    Record {
        index: usize,
        record: ActionRecord,
        kind: RecordErrorKind,
    },
    /// The portfolio could not be valued for a snapshot
    Valuation {
        point: SnapshotPoint,
        source: ConversionError,
    },
}

impl std::fmt::Display for SimulationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimulationError::Record {
                index,
                record,
                kind,
            } => {
                write!(
                    f,
                    "Corporate action #{} ({record}) failed: {kind}",
                    index + 1
                )
            }
            SimulationError::Valuation { point, source } => {
                write!(f, "Could not value \"{point}\": {source}")
            }
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Record {
                kind: RecordErrorKind::Parse(e),
                ..
            } => Some(e),
            SimulationError::Record {
                kind: RecordErrorKind::Action(e),
                ..
            } => Some(e),
            SimulationError::Valuation { source, .. } => Some(source),
        }
    }
}

/// Where the simulation stands. `ProcessingDate` names the date the next
/// step will apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationState {
    AwaitingFirstAction,
    ProcessingDate(NaiveDate),
    Done,
}

/// Replays corporate actions against a portfolio, yielding the initial state
/// and then one snapshot per distinct date once all of that date's actions
/// have been applied.
///
/// The first failure is yielded as an `Err` and ends the iteration; no
/// snapshot is produced past it.
#[derive(Debug)]
pub struct Simulation {
    portfolio: Portfolio,
    records: Vec<ActionRecord>,
    cursor: usize,
    parser: ActionTextParser,
    state: SimulationState,
}

impl Simulation {
    /// Creates a simulation with the default parser and description ordering
    #[must_use]
    pub fn new(portfolio: Portfolio, records: Vec<ActionRecord>) -> Self {
        Self::with_ordering(
            portfolio,
            records,
            RecordOrdering::default(),
            ActionTextParser::new(),
        )
    }

    #[must_use]
    pub fn with_ordering(
        portfolio: Portfolio,
        mut records: Vec<ActionRecord>,
        ordering: RecordOrdering,
        parser: ActionTextParser,
    ) -> Self {
        sort_records(&mut records, ordering, &parser);
        info!(
            "Simulating {} corporate actions on {} holdings",
            records.len(),
            portfolio.len()
        );

        Self {
            portfolio,
            records,
            cursor: 0,
            parser,
            state: SimulationState::AwaitingFirstAction,
        }
    }

    #[must_use]
    pub fn state(&self) -> SimulationState {
        self.state
    }

    #[must_use]
    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    #[must_use]
    pub fn into_portfolio(self) -> Portfolio {
        self.portfolio
    }

    /// Records in the order they are applied
    #[must_use]
    pub fn records(&self) -> &[ActionRecord] {
        &self.records
    }

    /// Drives the simulation to the end, handing every snapshot to `on_snapshot`
    /// # Errors
    /// Returns the first `SimulationError`; snapshots before it have already been handed over
    pub fn run<F>(mut self, mut on_snapshot: F) -> Result<Portfolio, SimulationError>
    where
        F: FnMut(Snapshot),
    {
        for snapshot in self.by_ref() {
            on_snapshot(snapshot?);
        }
        Ok(self.portfolio)
    }

    fn state_after(&self) -> SimulationState {
        self.records
            .get(self.cursor)
            .map_or(SimulationState::Done, |record| {
                SimulationState::ProcessingDate(record.date)
            })
    }

    fn snapshot(&self, point: SnapshotPoint) -> Result<Snapshot, SimulationError> {
        self.portfolio
            .snapshot(point)
            .map_err(|source| SimulationError::Valuation { point, source })
    }

    fn apply_record(&mut self, index: usize) -> Result<(), SimulationError> {
        let record = &self.records[index];
        let result = self
            .parser
            .parse(&record.description)
            .map_err(RecordErrorKind::Parse)
            .and_then(|action| {
                debug!("{}: {} on {}", record.date, action.kind(), record.symbol);
                action
                    .apply(&record.symbol, &mut self.portfolio)
                    .map_err(RecordErrorKind::Action)
            });

        result.map_err(|kind| SimulationError::Record {
            index,
            record: record.clone(),
            kind,
        })
    }

    fn process_date(&mut self, date: NaiveDate) -> Result<Snapshot, SimulationError> {
        while self
            .records
            .get(self.cursor)
            .is_some_and(|record| record.date == date)
        {
            self.apply_record(self.cursor)?;
            self.cursor += 1;
        }
        let snapshot = self.snapshot(SnapshotPoint::After(date))?;
        info!("Applied corporate actions up to {date}");
        Ok(snapshot)
    }

    fn step(&mut self) -> Option<Result<Snapshot, SimulationError>> {
        let result = match self.state {
            SimulationState::Done => return None,
            SimulationState::AwaitingFirstAction => self.snapshot(SnapshotPoint::Initial),
            SimulationState::ProcessingDate(date) => self.process_date(date),
        };

        self.state = match &result {
            Ok(_) => self.state_after(),
            Err(e) => {
                warn!("Simulation aborted: {e}");
                SimulationState::Done
            }
        };
        Some(result)
    }
}

impl Iterator for Simulation {
    type Item = Result<Snapshot, SimulationError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.step()
    }
}

impl FusedIterator for Simulation {}
