//! Ledger transaction records
//!
//! Transactions are append-only: the engine never mutates them, and removal
//! is a soft delete (`active = false`). The chronological ordering key is
//! `(date, id)` ascending, with insertion order breaking same-day ties.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::market::{InstrumentId, PortfolioId};

/// Transaction kind. A closed set: anything the fold does not recognize as
/// position-affecting is an explicit no-op, so one odd record never aborts a
/// report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TxKind {
    Buy,
    Sell,
    Bonus,
    Subscription,
    /// Direction is carried by `unit_price`: a transfer-in records the
    /// origin portfolio's average cost as its unit price, a transfer-out
    /// records zero.
    Transfer,
    /// Capital amortization. Cash reconciliation elsewhere; no effect on
    /// position or average cost.
    Amortization,
    /// Free-form corporate event marker. No effect on position.
    Event,
}

impl TxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxKind::Buy => "BUY",
            TxKind::Sell => "SELL",
            TxKind::Bonus => "BONUS",
            TxKind::Subscription => "SUBSCRIPTION",
            TxKind::Transfer => "TRANSFER",
            TxKind::Amortization => "AMORTIZATION",
            TxKind::Event => "EVENT",
        }
    }
}

/// One ledger row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: u64,
    pub date: NaiveDate,
    pub kind: TxKind,
    pub instrument: InstrumentId,
    pub portfolio: PortfolioId,
    /// Share quantity, non-negative, 6-decimal scale.
    pub quantity: Decimal,
    /// Per-share price, non-negative, 4-decimal scale.
    pub unit_price: Decimal,
    /// Brokerage and exchange fees, folded into acquisition cost.
    pub fees: Decimal,
    #[serde(default)]
    pub note: String,
    /// Soft-delete flag; inactive rows are invisible to the engine.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_serde_as_screaming_snake() {
        let json = serde_json::to_string(&TxKind::Subscription).unwrap();
        assert_eq!(json, "\"SUBSCRIPTION\"");
        let back: TxKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TxKind::Subscription);
    }
}
