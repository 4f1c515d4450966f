//! Portfolio aggregation and statements
//!
//! Drives the resolver across every instrument transacted in a portfolio
//! and merges in closing prices for unrealized P&L. Valuation is best
//! effort: a missing close omits the market columns rather than failing the
//! row, but unknown instruments and dangling rename targets are real data
//! corruption and error out.

use std::collections::BTreeSet;

use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::decimal::Quantizer;
use crate::domain::{InstrumentId, PortfolioId, Transaction};
use crate::engine::adjust::factor_between;
use crate::engine::resolver::position_as_of;
use crate::engine::EngineError;
use crate::sources::{ActionRegistry, Catalog, Ledger, PriceSource, TxQuery};

/// One line of the portfolio position report.
#[derive(Debug, Clone, Serialize)]
pub struct PositionRow {
    pub instrument: InstrumentId,
    /// Ticker effective at the as-of date (renames applied).
    pub ticker: String,
    pub quantity: Decimal,
    pub average_cost: Decimal,
    /// Acquisition value: quantity × average cost.
    pub cost_value: Decimal,
    pub close_date: Option<NaiveDate>,
    pub close_price: Option<Decimal>,
    pub market_value: Option<Decimal>,
    pub unrealized_pnl: Option<Decimal>,
    pub unrealized_pnl_pct: Option<Decimal>,
}

/// Resolve the display ticker for an instrument at a date: the target of
/// the latest rename effective at or before the date, or the registered
/// ticker when none applies.
pub fn display_ticker<S>(store: &S, instrument: InstrumentId, as_of: Option<NaiveDate>) -> Result<String>
where
    S: ActionRegistry + Catalog,
{
    let base = store
        .instrument(instrument)?
        .ok_or(EngineError::UnknownInstrument(instrument))?;
    match store.latest_rename(instrument, as_of)? {
        Some(rename) => {
            let target = rename.renamed_to.ok_or(EngineError::MissingRenameTarget {
                action: rename.id,
                instrument,
            })?;
            let renamed = store
                .instrument(target)?
                .ok_or(EngineError::UnknownRenameTarget {
                    action: rename.id,
                    instrument,
                    target,
                })?;
            Ok(renamed.ticker)
        }
        None => Ok(base.ticker),
    }
}

/// Position report for every instrument held in the portfolio as of a date,
/// sorted by display ticker. Closed positions are dropped.
pub fn portfolio_position<S>(
    store: &S,
    portfolio: PortfolioId,
    as_of: Option<NaiveDate>,
    qz: &Quantizer,
) -> Result<Vec<PositionRow>>
where
    S: Ledger + ActionRegistry + PriceSource + Catalog,
{
    let txs = store.transactions(&TxQuery {
        portfolio: Some(portfolio),
        until: as_of,
        ..TxQuery::default()
    })?;
    let instruments: BTreeSet<InstrumentId> = txs.iter().map(|t| t.instrument).collect();

    let mut rows = Vec::new();
    for instrument in instruments {
        let pos = position_as_of(store, instrument, portfolio, as_of, qz)?;
        if pos.is_closed() {
            continue;
        }
        let ticker = display_ticker(store, instrument, as_of)?;
        let close = store.latest_close(instrument, as_of)?;
        let cost_value = qz.money(pos.cost_value());
        let market_value = close.as_ref().map(|c| qz.money(pos.quantity * c.price));
        let unrealized_pnl = market_value.map(|mv| qz.money(mv - cost_value));
        let unrealized_pnl_pct = unrealized_pnl.and_then(|pnl| {
            if cost_value.is_zero() {
                None
            } else {
                Some(qz.money(pnl / cost_value * Decimal::ONE_HUNDRED))
            }
        });
        rows.push(PositionRow {
            instrument,
            ticker,
            quantity: pos.quantity,
            average_cost: pos.average_cost,
            cost_value,
            close_date: close.as_ref().map(|c| c.date),
            close_price: close.as_ref().map(|c| c.price),
            market_value,
            unrealized_pnl,
            unrealized_pnl_pct,
        });
    }
    rows.sort_by(|a, b| a.ticker.cmp(&b.ticker));
    Ok(rows)
}

/// One statement line: the raw transaction plus its quantity re-expressed
/// in the denomination of the statement's end date.
#[derive(Debug, Clone, Serialize)]
pub struct StatementRow {
    pub transaction: Transaction,
    /// Present only when the query has an upper date bound.
    pub adjusted_quantity: Option<Decimal>,
}

/// Flat transaction statement for a filter, with split-adjusted quantities
/// when an end date bounds the query.
pub fn statement<S>(store: &S, query: &TxQuery, qz: &Quantizer) -> Result<Vec<StatementRow>>
where
    S: Ledger + ActionRegistry,
{
    let txs = store.transactions(query)?;
    let mut rows = Vec::with_capacity(txs.len());
    for t in txs {
        let adjusted_quantity = match query.until {
            Some(until) => {
                let factor = factor_between(store, t.instrument, t.date, Some(until))?;
                Some(qz.qty(qz.qty(t.quantity) * factor))
            }
            None => None,
        };
        rows.push(StatementRow {
            transaction: t,
            adjusted_quantity,
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    use crate::book::Book;
    use crate::domain::{ActionKind, ClosingPrice, CorporateAction, TxKind};

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn push_buy(book: &mut Book, instrument: InstrumentId, day: NaiveDate, qty: Decimal, price: Decimal) {
        let id = book.next_transaction_id();
        book.transactions.push(crate::domain::Transaction {
            id,
            date: day,
            kind: TxKind::Buy,
            instrument,
            portfolio: 1,
            quantity: qty,
            unit_price: price,
            fees: Decimal::ZERO,
            note: String::new(),
            active: true,
        });
    }

    fn two_instrument_book() -> Book {
        let mut book = Book::new();
        let zzz = book.add_instrument("ZZZZ4".into(), None);
        let aaa = book.add_instrument("AAAA3".into(), None);
        book.add_portfolio("main".into());
        push_buy(&mut book, zzz, date(1, 5), dec!(10), dec!(20.00));
        push_buy(&mut book, aaa, date(1, 6), dec!(100), dec!(10.00));
        book
    }

    #[test]
    fn report_sorts_by_display_ticker() {
        let book = two_instrument_book();
        let qz = Quantizer::default();
        let rows = portfolio_position(&book, 1, Some(date(2, 1)), &qz).unwrap();
        let tickers: Vec<&str> = rows.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["AAAA3", "ZZZZ4"]);
    }

    #[test]
    fn report_drops_closed_positions() {
        let mut book = two_instrument_book();
        let id = book.next_transaction_id();
        book.transactions.push(crate::domain::Transaction {
            id,
            date: date(1, 10),
            kind: TxKind::Sell,
            instrument: 1,
            portfolio: 1,
            quantity: dec!(10),
            unit_price: dec!(21.00),
            fees: Decimal::ZERO,
            note: String::new(),
            active: true,
        });
        let qz = Quantizer::default();
        let rows = portfolio_position(&book, 1, Some(date(2, 1)), &qz).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].ticker, "AAAA3");
    }

    #[test]
    fn report_computes_pnl_against_latest_close() {
        let mut book = two_instrument_book();
        book.record_price(ClosingPrice {
            instrument: 2,
            date: date(1, 31),
            price: dec!(12.00),
        });
        let qz = Quantizer::default();
        let rows = portfolio_position(&book, 1, Some(date(2, 1)), &qz).unwrap();
        let aaa = &rows[0];
        assert_eq!(aaa.cost_value, dec!(1000.0000));
        assert_eq!(aaa.market_value, Some(dec!(1200.0000)));
        assert_eq!(aaa.unrealized_pnl, Some(dec!(200.0000)));
        assert_eq!(aaa.unrealized_pnl_pct, Some(dec!(20.0000)));
    }

    #[test]
    fn missing_close_omits_valuation_instead_of_erroring() {
        let book = two_instrument_book();
        let qz = Quantizer::default();
        let rows = portfolio_position(&book, 1, Some(date(2, 1)), &qz).unwrap();
        assert!(rows.iter().all(|r| r.market_value.is_none()));
        assert!(rows.iter().all(|r| r.unrealized_pnl.is_none()));
    }

    #[test]
    fn rename_changes_display_ticker_only_from_its_effective_date() {
        let mut book = two_instrument_book();
        let new_id = book.add_instrument("NEWN3".into(), None);
        let action_id = book.next_action_id();
        book.actions.push(CorporateAction {
            id: action_id,
            instrument: 2,
            kind: ActionKind::TickerRename,
            effective_date: date(1, 20),
            numerator: Decimal::ONE,
            denominator: Decimal::ONE,
            renamed_to: Some(new_id),
            note: String::new(),
            active: true,
        });

        assert_eq!(display_ticker(&book, 2, Some(date(1, 10))).unwrap(), "AAAA3");
        assert_eq!(display_ticker(&book, 2, Some(date(1, 20))).unwrap(), "NEWN3");
        assert_eq!(display_ticker(&book, 2, None).unwrap(), "NEWN3");
    }

    #[test]
    fn unknown_instrument_is_surfaced_as_an_error() {
        let book = Book::new();
        let err = display_ticker(&book, 42, None).unwrap_err();
        assert!(err.to_string().contains("unknown instrument"));
    }

    #[test]
    fn dangling_rename_target_is_surfaced_as_an_error() {
        let mut book = two_instrument_book();
        let action_id = book.next_action_id();
        book.actions.push(CorporateAction {
            id: action_id,
            instrument: 2,
            kind: ActionKind::TickerRename,
            effective_date: date(1, 20),
            numerator: Decimal::ONE,
            denominator: Decimal::ONE,
            renamed_to: Some(999),
            note: String::new(),
            active: true,
        });
        let err = display_ticker(&book, 2, None).unwrap_err();
        assert!(err.to_string().contains("missing instrument"));
    }

    #[test]
    fn statement_adjusts_quantities_toward_the_end_date() {
        let mut book = two_instrument_book();
        let action_id = book.next_action_id();
        book.actions.push(CorporateAction {
            id: action_id,
            instrument: 2,
            kind: ActionKind::Split,
            effective_date: date(1, 15),
            numerator: dec!(2),
            denominator: dec!(1),
            renamed_to: None,
            note: String::new(),
            active: true,
        });
        let qz = Quantizer::default();
        let query = TxQuery {
            instrument: Some(2),
            portfolio: Some(1),
            from: None,
            until: Some(date(2, 1)),
        };
        let rows = statement(&book, &query, &qz).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].transaction.quantity, dec!(100));
        assert_eq!(rows[0].adjusted_quantity, Some(dec!(200)));

        // No end date, no adjustment column.
        let rows = statement(&book, &TxQuery { until: None, ..query }, &qz).unwrap();
        assert_eq!(rows[0].adjusted_quantity, None);
    }
}
