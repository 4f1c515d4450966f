//! Shared argument types and lookup helpers for CLI commands

use anyhow::{anyhow, Result};
use clap::ValueEnum;
use rust_decimal::Decimal;

use crate::book::Book;
use crate::decimal::Quantizer;
use crate::domain::{ActionKind, InstrumentId, PortfolioId, TxKind};

/// Clap value parser for quantities, prices and fees. Routes through the
/// engine's tolerant parse so comma decimal separators and currency
/// prefixes are accepted on the command line, while outright garbage is
/// still rejected with a readable message.
pub fn decimal_arg(value: &str) -> std::result::Result<Decimal, String> {
    Quantizer::default()
        .try_parse(value)
        .ok_or_else(|| format!("'{value}' is not a number"))
}

/// Transaction kind as accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    Buy,
    Sell,
    Bonus,
    Subscription,
    Transfer,
    Amortization,
    Event,
}

impl From<KindArg> for TxKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Buy => TxKind::Buy,
            KindArg::Sell => TxKind::Sell,
            KindArg::Bonus => TxKind::Bonus,
            KindArg::Subscription => TxKind::Subscription,
            KindArg::Transfer => TxKind::Transfer,
            KindArg::Amortization => TxKind::Amortization,
            KindArg::Event => TxKind::Event,
        }
    }
}

/// Corporate-action kind as accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ActionKindArg {
    Split,
    ReverseSplit,
    Bonus,
    Rename,
}

impl From<ActionKindArg> for ActionKind {
    fn from(value: ActionKindArg) -> Self {
        match value {
            ActionKindArg::Split => ActionKind::Split,
            ActionKindArg::ReverseSplit => ActionKind::ReverseSplit,
            ActionKindArg::Bonus => ActionKind::Bonus,
            ActionKindArg::Rename => ActionKind::TickerRename,
        }
    }
}

/// Resolve a ticker to its instrument id, or fail with a readable message.
pub fn resolve_instrument(book: &Book, ticker: &str) -> Result<InstrumentId> {
    book.instrument_by_ticker(ticker)
        .map(|i| i.id)
        .ok_or_else(|| anyhow!("no instrument registered with ticker '{ticker}'"))
}

/// Resolve a portfolio name to its id, or fail with a readable message.
pub fn resolve_portfolio(book: &Book, name: &str) -> Result<PortfolioId> {
    book.portfolio_by_name(name)
        .map(|p| p.id)
        .ok_or_else(|| anyhow!("no portfolio registered with name '{name}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn decimal_arg_accepts_comma_separator_and_rejects_garbage() {
        assert_eq!(decimal_arg("10,50").unwrap(), dec!(10.50));
        assert_eq!(decimal_arg("R$ 12.34").unwrap(), dec!(12.34));
        assert_eq!(decimal_arg("0").unwrap(), Decimal::ZERO);
        assert!(decimal_arg("abc").is_err());
        assert!(decimal_arg("").is_err());
    }

    #[test]
    fn kind_args_map_onto_domain_kinds() {
        assert_eq!(TxKind::from(KindArg::Buy), TxKind::Buy);
        assert_eq!(TxKind::from(KindArg::Transfer), TxKind::Transfer);
        assert_eq!(ActionKind::from(ActionKindArg::Rename), ActionKind::TickerRename);
    }

    #[test]
    fn lookups_are_case_insensitive() {
        let mut book = Book::new();
        book.add_instrument("ABCD3".into(), None);
        book.add_portfolio("Main".into());
        assert_eq!(resolve_instrument(&book, "abcd3").unwrap(), 1);
        assert_eq!(resolve_portfolio(&book, "MAIN").unwrap(), 1);
        assert!(resolve_instrument(&book, "ZZZZ9").is_err());
    }
}
