//! Table rendering for reports, timelines and statements

use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, CellAlignment, Table};
use rust_decimal::Decimal;

use crate::book::Book;
use crate::engine::{PositionRow, StatementRow, TimelineRow};

fn money_cell(value: Decimal) -> Cell {
    Cell::new(format!("{value:.4}")).set_alignment(CellAlignment::Right)
}

fn qty_cell(value: Decimal) -> Cell {
    Cell::new(value.normalize().to_string()).set_alignment(CellAlignment::Right)
}

fn opt_money_cell(value: Option<Decimal>) -> Cell {
    match value {
        Some(v) => money_cell(v),
        None => Cell::new("n/a").set_alignment(CellAlignment::Right),
    }
}

/// Render the portfolio position report.
pub fn report_table(rows: &[PositionRow]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED).set_header(vec![
        "Ticker",
        "Quantity",
        "Avg Cost",
        "Cost Value",
        "Close",
        "Market Value",
        "P&L",
        "P&L %",
    ]);
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.ticker),
            qty_cell(row.quantity),
            money_cell(row.average_cost),
            money_cell(row.cost_value),
            opt_money_cell(row.close_price),
            opt_money_cell(row.market_value),
            opt_money_cell(row.unrealized_pnl),
            opt_money_cell(row.unrealized_pnl_pct),
        ]);
    }
    table
}

/// Render the per-transaction cost-basis timeline.
pub fn timeline_table(rows: &[TimelineRow]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED).set_header(vec![
        "Date",
        "Kind",
        "Qty",
        "Price",
        "Fees",
        "Factor",
        "Adj Qty",
        "Adj Price",
        "Pos Qty",
        "Pos Avg",
    ]);
    for row in rows {
        table.add_row(vec![
            Cell::new(row.date.to_string()),
            Cell::new(row.kind.as_str()),
            qty_cell(row.quantity),
            money_cell(row.unit_price),
            money_cell(row.fees),
            qty_cell(row.factor.normalize()),
            qty_cell(row.adjusted_quantity),
            opt_money_cell(row.adjusted_price),
            qty_cell(row.position.quantity),
            money_cell(row.position.average_cost),
        ]);
    }
    table
}

/// Render the transaction statement. Tickers and portfolio names are
/// resolved against the book for readability.
pub fn statement_table(book: &Book, rows: &[StatementRow]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED).set_header(vec![
        "Id", "Date", "Kind", "Ticker", "Portfolio", "Qty", "Price", "Fees", "Adj Qty", "Note",
    ]);
    for row in rows {
        let t = &row.transaction;
        let ticker = book
            .instrument_by_id(t.instrument)
            .map(|i| i.ticker.clone())
            .unwrap_or_else(|| format!("#{}", t.instrument));
        let portfolio = book
            .portfolio_by_id(t.portfolio)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| format!("#{}", t.portfolio));
        table.add_row(vec![
            Cell::new(t.id),
            Cell::new(t.date.to_string()),
            Cell::new(t.kind.as_str()),
            Cell::new(ticker),
            Cell::new(portfolio),
            qty_cell(t.quantity),
            money_cell(t.unit_price),
            money_cell(t.fees),
            match row.adjusted_quantity {
                Some(q) => qty_cell(q),
                None => Cell::new(""),
            },
            Cell::new(&t.note),
        ]);
    }
    table
}
