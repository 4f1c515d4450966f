//! Domain types for the position and cost-basis engine

pub mod action;
pub mod market;
pub mod transaction;

pub use action::{ActionKind, CorporateAction};
pub use market::{ClosingPrice, Instrument, InstrumentId, Portfolio, PortfolioId};
pub use transaction::{Transaction, TxKind};
