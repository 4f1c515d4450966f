//! Data-source trait definitions
//!
//! The engine is a pure computation over data it is handed; these traits
//! abstract where that data lives (JSON book file, in-memory fixtures in
//! tests). Implementations must give one engine call a snapshot-consistent
//! view: nothing here may observe writes made during the call.

use anyhow::Result;
use chrono::NaiveDate;

use crate::domain::{
    ClosingPrice, CorporateAction, Instrument, InstrumentId, PortfolioId, Transaction,
};

/// Filter for ledger queries. `None` fields match everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct TxQuery {
    pub instrument: Option<InstrumentId>,
    pub portfolio: Option<PortfolioId>,
    /// Inclusive lower date bound.
    pub from: Option<NaiveDate>,
    /// Inclusive upper date bound.
    pub until: Option<NaiveDate>,
}

impl TxQuery {
    /// Everything for one (instrument, portfolio) pair up to a date.
    pub fn position(
        instrument: InstrumentId,
        portfolio: PortfolioId,
        until: Option<NaiveDate>,
    ) -> Self {
        Self {
            instrument: Some(instrument),
            portfolio: Some(portfolio),
            from: None,
            until,
        }
    }
}

/// Append-only transaction ledger.
pub trait Ledger {
    /// Matching non-deleted transactions, ordered by `(date, id)` ascending.
    fn transactions(&self, query: &TxQuery) -> Result<Vec<Transaction>>;
}

/// Corporate-action registry.
pub trait ActionRegistry {
    /// Ratio-bearing actions (split, reverse split, bonus) for the
    /// instrument with effective date in the half-open interval
    /// `(after, until]`, ordered by `(effective_date, id)` ascending.
    fn ratio_actions_between(
        &self,
        instrument: InstrumentId,
        after: NaiveDate,
        until: NaiveDate,
    ) -> Result<Vec<CorporateAction>>;

    /// The latest ticker rename for the instrument with effective date at
    /// or before `until` (no bound when `None`).
    fn latest_rename(
        &self,
        instrument: InstrumentId,
        until: Option<NaiveDate>,
    ) -> Result<Option<CorporateAction>>;
}

/// Closing-price history, valuation only.
pub trait PriceSource {
    /// The most recent close for the instrument at or before `until`
    /// (no bound when `None`).
    fn latest_close(
        &self,
        instrument: InstrumentId,
        until: Option<NaiveDate>,
    ) -> Result<Option<ClosingPrice>>;
}

/// Instrument master data.
pub trait Catalog {
    fn instrument(&self, id: InstrumentId) -> Result<Option<Instrument>>;
}
