//! Book storage
//!
//! `Book` is the whole working set held in memory; the CLI loads it once,
//! mutates it through [`crate::book::service`], and saves it once. Because
//! a loaded book is a plain immutable value for the duration of a query,
//! every engine call automatically sees a snapshot-consistent view.
//!
//! On disk the book is a single JSON document. Saves go through a temp file
//! followed by a rename so a crash mid-write never truncates the book.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::data_paths::DataPaths;
use crate::domain::{
    ActionKind, ClosingPrice, CorporateAction, Instrument, InstrumentId, Portfolio, PortfolioId,
    Transaction,
};
use crate::sources::{ActionRegistry, Catalog, Ledger, PriceSource, TxQuery};

/// Book file name inside the book directory.
pub const BOOK_FILE: &str = "book.json";

#[derive(Debug, Error)]
pub enum BookError {
    #[error("no book found at {0} (run `folio init` first)")]
    Missing(PathBuf),
    #[error("failed to read or write book file: {0}")]
    Io(#[from] std::io::Error),
    #[error("book file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything the tracker knows, in memory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Book {
    #[serde(default)]
    pub instruments: Vec<Instrument>,
    #[serde(default)]
    pub portfolios: Vec<Portfolio>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub actions: Vec<CorporateAction>,
    #[serde(default)]
    pub prices: Vec<ClosingPrice>,
}

impl Book {
    pub fn new() -> Self {
        Self::default()
    }

    fn book_path(paths: &DataPaths) -> PathBuf {
        paths.book().join(BOOK_FILE)
    }

    /// Load the book from the data directory.
    pub async fn load(paths: &DataPaths) -> Result<Self, BookError> {
        let path = Self::book_path(paths);
        if !path.exists() {
            return Err(BookError::Missing(path));
        }
        let raw = tokio::fs::read_to_string(&path).await?;
        let book: Book = serde_json::from_str(&raw)?;
        debug!(
            path = %path.display(),
            transactions = book.transactions.len(),
            actions = book.actions.len(),
            "Book loaded"
        );
        Ok(book)
    }

    /// Persist the book atomically (temp file, then rename).
    pub async fn save(&self, paths: &DataPaths) -> Result<(), BookError> {
        paths.ensure_directories()?;
        let path = Self::book_path(paths);
        let tmp = path.with_extension("json.tmp");
        let raw = serde_json::to_string_pretty(self)?;
        tokio::fs::write(&tmp, raw).await?;
        tokio::fs::rename(&tmp, &path).await?;
        info!(path = %path.display(), "Book saved");
        Ok(())
    }

    // ---- id allocation ------------------------------------------------

    pub fn next_instrument_id(&self) -> InstrumentId {
        self.instruments.iter().map(|i| i.id).max().unwrap_or(0) + 1
    }

    pub fn next_portfolio_id(&self) -> PortfolioId {
        self.portfolios.iter().map(|p| p.id).max().unwrap_or(0) + 1
    }

    pub fn next_transaction_id(&self) -> u64 {
        self.transactions.iter().map(|t| t.id).max().unwrap_or(0) + 1
    }

    pub fn next_action_id(&self) -> u64 {
        self.actions.iter().map(|a| a.id).max().unwrap_or(0) + 1
    }

    // ---- lookups -------------------------------------------------------

    pub fn instrument_by_id(&self, id: InstrumentId) -> Option<&Instrument> {
        self.instruments.iter().find(|i| i.id == id)
    }

    /// Case-insensitive ticker lookup among active instruments.
    pub fn instrument_by_ticker(&self, ticker: &str) -> Option<&Instrument> {
        self.instruments
            .iter()
            .find(|i| i.active && i.ticker.eq_ignore_ascii_case(ticker))
    }

    pub fn portfolio_by_id(&self, id: PortfolioId) -> Option<&Portfolio> {
        self.portfolios.iter().find(|p| p.id == id)
    }

    /// Case-insensitive name lookup among active portfolios.
    pub fn portfolio_by_name(&self, name: &str) -> Option<&Portfolio> {
        self.portfolios
            .iter()
            .find(|p| p.active && p.name.eq_ignore_ascii_case(name))
    }

    pub fn action_by_id(&self, id: u64) -> Option<&CorporateAction> {
        self.actions.iter().find(|a| a.id == id)
    }

    // ---- registration --------------------------------------------------

    pub fn add_instrument(&mut self, ticker: String, name: Option<String>) -> InstrumentId {
        let id = self.next_instrument_id();
        self.instruments.push(Instrument {
            id,
            ticker,
            name,
            active: true,
        });
        id
    }

    pub fn add_portfolio(&mut self, name: String) -> PortfolioId {
        let id = self.next_portfolio_id();
        self.portfolios.push(Portfolio {
            id,
            name,
            active: true,
        });
        id
    }

    /// Record a closing price, replacing any earlier price for the same
    /// instrument and day.
    pub fn record_price(&mut self, price: ClosingPrice) {
        self.prices
            .retain(|p| !(p.instrument == price.instrument && p.date == price.date));
        self.prices.push(price);
    }
}

// ---- source trait implementations ---------------------------------------

impl Ledger for Book {
    fn transactions(&self, query: &TxQuery) -> anyhow::Result<Vec<Transaction>> {
        let mut rows: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|t| {
                t.active
                    && query.instrument.is_none_or(|i| t.instrument == i)
                    && query.portfolio.is_none_or(|p| t.portfolio == p)
                    && query.from.is_none_or(|d| t.date >= d)
                    && query.until.is_none_or(|d| t.date <= d)
            })
            .cloned()
            .collect();
        rows.sort_by_key(|t| (t.date, t.id));
        Ok(rows)
    }
}

impl ActionRegistry for Book {
    fn ratio_actions_between(
        &self,
        instrument: InstrumentId,
        after: chrono::NaiveDate,
        until: chrono::NaiveDate,
    ) -> anyhow::Result<Vec<CorporateAction>> {
        let mut rows: Vec<CorporateAction> = self
            .actions
            .iter()
            .filter(|a| {
                a.active
                    && a.instrument == instrument
                    && a.kind.has_ratio()
                    && a.effective_date > after
                    && a.effective_date <= until
            })
            .cloned()
            .collect();
        rows.sort_by_key(|a| (a.effective_date, a.id));
        Ok(rows)
    }

    fn latest_rename(
        &self,
        instrument: InstrumentId,
        until: Option<chrono::NaiveDate>,
    ) -> anyhow::Result<Option<CorporateAction>> {
        Ok(self
            .actions
            .iter()
            .filter(|a| {
                a.active
                    && a.instrument == instrument
                    && a.kind == ActionKind::TickerRename
                    && until.is_none_or(|d| a.effective_date <= d)
            })
            .max_by_key(|a| (a.effective_date, a.id))
            .cloned())
    }
}

impl PriceSource for Book {
    fn latest_close(
        &self,
        instrument: InstrumentId,
        until: Option<chrono::NaiveDate>,
    ) -> anyhow::Result<Option<ClosingPrice>> {
        Ok(self
            .prices
            .iter()
            .filter(|p| p.instrument == instrument && until.is_none_or(|d| p.date <= d))
            .max_by_key(|p| p.date)
            .cloned())
    }
}

impl Catalog for Book {
    fn instrument(&self, id: InstrumentId) -> anyhow::Result<Option<Instrument>> {
        Ok(self.instrument_by_id(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use crate::domain::TxKind;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    fn sample_book() -> Book {
        let mut book = Book::new();
        let inst = book.add_instrument("ABCD3".into(), Some("ABCD SA".into()));
        let port = book.add_portfolio("main".into());
        book.transactions.push(Transaction {
            id: book.next_transaction_id(),
            date: d(2),
            kind: TxKind::Buy,
            instrument: inst,
            portfolio: port,
            quantity: dec!(100),
            unit_price: dec!(10),
            fees: dec!(1),
            note: String::new(),
            active: true,
        });
        book.record_price(ClosingPrice {
            instrument: inst,
            date: d(3),
            price: dec!(11),
        });
        book
    }

    #[test]
    fn ledger_query_orders_by_date_then_id() {
        let mut book = sample_book();
        // Same-day rows keep insertion (id) order.
        book.transactions.push(Transaction {
            id: 3,
            date: d(1),
            kind: TxKind::Buy,
            instrument: 1,
            portfolio: 1,
            quantity: dec!(5),
            unit_price: dec!(9),
            fees: dec!(0),
            note: String::new(),
            active: true,
        });
        book.transactions.push(Transaction {
            id: 2,
            date: d(1),
            kind: TxKind::Buy,
            instrument: 1,
            portfolio: 1,
            quantity: dec!(5),
            unit_price: dec!(9),
            fees: dec!(0),
            note: String::new(),
            active: true,
        });
        let rows = book.transactions(&TxQuery::position(1, 1, None)).unwrap();
        let ids: Vec<u64> = rows.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn ledger_query_respects_date_bound_and_soft_delete() {
        let mut book = sample_book();
        book.transactions[0].active = false;
        let rows = book.transactions(&TxQuery::position(1, 1, Some(d(30)))).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn latest_close_picks_nearest_at_or_before() {
        let mut book = sample_book();
        book.record_price(ClosingPrice {
            instrument: 1,
            date: d(10),
            price: dec!(12),
        });
        let p = book.latest_close(1, Some(d(9))).unwrap().unwrap();
        assert_eq!(p.price, dec!(11));
        let p = book.latest_close(1, Some(d(10))).unwrap().unwrap();
        assert_eq!(p.price, dec!(12));
        assert!(book.latest_close(1, Some(d(1))).unwrap().is_none());
    }

    #[test]
    fn record_price_replaces_same_day_entry() {
        let mut book = sample_book();
        book.record_price(ClosingPrice {
            instrument: 1,
            date: d(3),
            price: dec!(11.50),
        });
        assert_eq!(book.prices.len(), 1);
        assert_eq!(book.prices[0].price, dec!(11.50));
    }

    #[tokio::test]
    async fn book_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(dir.path());
        let book = sample_book();
        book.save(&paths).await.unwrap();
        let loaded = Book::load(&paths).await.unwrap();
        assert_eq!(loaded.instruments.len(), 1);
        assert_eq!(loaded.transactions.len(), 1);
        assert_eq!(loaded.transactions[0].quantity, dec!(100));
        assert_eq!(loaded.prices[0].price, dec!(11));
    }

    #[tokio::test]
    async fn load_without_init_reports_missing() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(dir.path());
        match Book::load(&paths).await {
            Err(BookError::Missing(_)) => {}
            other => panic!("expected missing-book error, got {other:?}"),
        }
    }
}
