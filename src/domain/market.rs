//! Instruments, portfolios and closing prices

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identity of an instrument. Immutable; the display ticker attached to it
/// can change over time via a ticker-rename corporate action.
pub type InstrumentId = u32;

/// Identity of a portfolio.
pub type PortfolioId = u32;

/// A tradable security.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instrument {
    pub id: InstrumentId,
    /// Display ticker as registered. Queries resolve the ticker effective at
    /// a given date through the corporate-action registry, not this field.
    pub ticker: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

/// A named bucket owning transactions. No internal structure matters to the
/// engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portfolio {
    pub id: PortfolioId,
    pub name: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

/// One closing price per instrument and trading day. Used only for
/// unrealized valuation, never for cost basis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosingPrice {
    pub instrument: InstrumentId,
    pub date: NaiveDate,
    pub price: Decimal,
}

fn default_active() -> bool {
    true
}
