//! Corporate-action registry records
//!
//! Actions are keyed by instrument and effective (ex-) date and may be
//! recorded long after the transactions they retroactively affect. History
//! is never rewritten: queries re-derive adjusted positions from the raw
//! ledger plus this registry on every call.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::market::InstrumentId;

/// Corporate-action kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    /// Forward split: numerator/denominator > 1 (e.g. 2/1).
    Split,
    /// Reverse split ("inplit"): numerator/denominator < 1 (e.g. 1/10).
    ReverseSplit,
    /// Bonus issuance. Ratio is the post/pre share count, so a 10% bonus is
    /// 11/10.
    Bonus,
    /// Display ticker change. Carries no ratio; `renamed_to` points at the
    /// instrument record holding the new ticker.
    TickerRename,
}

impl ActionKind {
    /// Whether this action scales share counts (and inversely, per-share
    /// cost). Renames never do.
    pub fn has_ratio(&self) -> bool {
        !matches!(self, ActionKind::TickerRename)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Split => "SPLIT",
            ActionKind::ReverseSplit => "REVERSE_SPLIT",
            ActionKind::Bonus => "BONUS",
            ActionKind::TickerRename => "TICKER_RENAME",
        }
    }
}

/// One registry row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorporateAction {
    pub id: u64,
    pub instrument: InstrumentId,
    pub kind: ActionKind,
    pub effective_date: NaiveDate,
    /// Ratio numerator. Ignored for renames.
    pub numerator: Decimal,
    /// Ratio denominator. A zero denominator makes the action a no-op
    /// rather than a division error.
    pub denominator: Decimal,
    /// Rename target; required for `TickerRename`, absent otherwise.
    #[serde(default)]
    pub renamed_to: Option<InstrumentId>,
    #[serde(default)]
    pub note: String,
    /// Soft-delete flag.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl CorporateAction {
    /// The multiplicative share-count ratio this action contributes, or
    /// `None` when it contributes nothing (renames, zero denominators).
    pub fn ratio(&self) -> Option<Decimal> {
        if !self.kind.has_ratio() || self.denominator.is_zero() {
            return None;
        }
        Some(self.numerator / self.denominator)
    }
}
