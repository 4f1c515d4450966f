//! The book: instruments, portfolios, ledger, action registry and closing
//! prices, persisted as one JSON document under the data directory.

pub mod service;
pub mod store;

pub use service::{ActionDraft, TransactionDraft, ValidateError};
pub use store::{Book, BookError};
