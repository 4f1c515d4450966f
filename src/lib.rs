//! folio: positions and cost basis with corporate-action time travel
//!
//! The ledger stores transactions in their original, unadjusted denomination.
//! Splits, reverse splits and bonuses are adjusted on the fly at query time,
//! so a retroactively recorded action changes every affected view without
//! touching stored rows.

pub mod book;
pub mod cli;
pub mod data_paths;
pub mod decimal;
pub mod domain;
pub mod engine;
pub mod logging;
pub mod sources;
