//! Position & cost-basis engine
//!
//! Pure, stateless-per-call computation: every query re-derives its answer
//! from the raw ledger and corporate-action registry, so actions recorded
//! after the transactions they affect are always honored and history is
//! never rewritten.
//!
//! Layering, leaves first: [`crate::decimal`], [`fold`], [`adjust`],
//! [`resolver`], [`report`].

pub mod adjust;
pub mod fold;
pub mod report;
pub mod resolver;

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::domain::InstrumentId;

pub use adjust::{adjust_tranche, factor_between};
pub use fold::compute_position;
pub use report::{display_ticker, portfolio_position, statement, PositionRow, StatementRow};
pub use resolver::{cost_basis_timeline, position_as_of, TimelineRow};

/// A batch of shares sharing one average acquisition cost.
///
/// The engine tracks exactly one collapsed tranche per (instrument,
/// portfolio). Lot-level (FIFO) accounting would replace this with an
/// ordered queue of open lots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tranche {
    pub quantity: Decimal,
    pub average_cost: Decimal,
}

impl Tranche {
    /// The empty position. Whenever quantity drops to or below zero the
    /// tranche resets here, average cost included.
    pub fn closed() -> Self {
        Self {
            quantity: Decimal::ZERO,
            average_cost: Decimal::ZERO,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.quantity <= Decimal::ZERO
    }

    /// Acquisition value: quantity × average cost.
    pub fn cost_value(&self) -> Decimal {
        self.quantity * self.average_cost
    }
}

/// Data-integrity failures the engine cannot self-heal. Surfaced to the
/// caller instead of being silently ignored.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown instrument #{0}")]
    UnknownInstrument(InstrumentId),
    #[error("corporate action #{action} on instrument #{instrument} has no rename target")]
    MissingRenameTarget { action: u64, instrument: InstrumentId },
    #[error("corporate action #{action} renames instrument #{instrument} to missing instrument #{target}")]
    UnknownRenameTarget {
        action: u64,
        instrument: InstrumentId,
        target: InstrumentId,
    },
}
