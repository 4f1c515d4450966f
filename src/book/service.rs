//! Write-side operations on the book
//!
//! All mutation goes through here: transaction and corporate-action intake
//! with validation, paired inter-portfolio transfers, bonus materialization
//! and soft deletes. Business-rule rejection lives at this layer; the fold
//! engine itself never rejects anything.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::info;

use crate::book::store::Book;
use crate::decimal::Quantizer;
use crate::domain::{ActionKind, CorporateAction, InstrumentId, PortfolioId, Transaction, TxKind};
use crate::engine::fold::compute_position;
use crate::sources::{Ledger, TxQuery};

#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("unknown instrument #{0}")]
    UnknownInstrument(InstrumentId),
    #[error("unknown portfolio #{0}")]
    UnknownPortfolio(PortfolioId),
    #[error("quantity must be positive, got {0}")]
    NonPositiveQuantity(Decimal),
    #[error("{field} must not be negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },
    #[error("only {available} units available in portfolio #{portfolio} on {date}, cannot release {requested}")]
    OverSell {
        portfolio: PortfolioId,
        date: NaiveDate,
        available: Decimal,
        requested: Decimal,
    },
    #[error("origin and destination portfolios must differ")]
    SamePortfolio,
    #[error("{0:?} requires positive numerator and denominator")]
    InvalidRatio(ActionKind),
    #[error("ticker rename requires a rename target")]
    MissingRenameTarget,
    #[error("unknown corporate action #{0}")]
    UnknownAction(u64),
    #[error("corporate action #{0} is not a bonus")]
    NotABonus(u64),
    #[error("unknown transaction #{0}")]
    UnknownTransaction(u64),
    #[error("ledger query failed: {0}")]
    Ledger(String),
}

/// A transaction as submitted, before ids and defaults are assigned.
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    pub date: NaiveDate,
    pub kind: TxKind,
    pub instrument: InstrumentId,
    pub portfolio: PortfolioId,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub fees: Decimal,
    pub note: String,
}

/// A corporate action as submitted.
#[derive(Debug, Clone)]
pub struct ActionDraft {
    pub instrument: InstrumentId,
    pub kind: ActionKind,
    pub effective_date: NaiveDate,
    pub numerator: Decimal,
    pub denominator: Decimal,
    pub renamed_to: Option<InstrumentId>,
    pub note: String,
}

fn require_instrument(book: &Book, id: InstrumentId) -> Result<(), ValidateError> {
    if book.instrument_by_id(id).is_none() {
        return Err(ValidateError::UnknownInstrument(id));
    }
    Ok(())
}

fn require_portfolio(book: &Book, id: PortfolioId) -> Result<(), ValidateError> {
    if book.portfolio_by_id(id).is_none() {
        return Err(ValidateError::UnknownPortfolio(id));
    }
    Ok(())
}

/// Quantity available in (instrument, portfolio) at a date, from the plain
/// unadjusted fold, the same denomination the incoming record uses.
fn available_at(
    book: &Book,
    instrument: InstrumentId,
    portfolio: PortfolioId,
    date: NaiveDate,
    qz: &Quantizer,
) -> Result<Decimal, ValidateError> {
    let txs = book
        .transactions(&TxQuery::position(instrument, portfolio, Some(date)))
        .map_err(|e| ValidateError::Ledger(e.to_string()))?;
    Ok(compute_position(&txs, qz).quantity)
}

fn check_release(
    book: &Book,
    draft: &TransactionDraft,
    qz: &Quantizer,
) -> Result<(), ValidateError> {
    let available = available_at(book, draft.instrument, draft.portfolio, draft.date, qz)?;
    let requested = qz.qty(draft.quantity);
    if requested > available {
        return Err(ValidateError::OverSell {
            portfolio: draft.portfolio,
            date: draft.date,
            available,
            requested,
        });
    }
    Ok(())
}

/// Validate and append one transaction. Returns the new id.
pub fn record_transaction(
    book: &mut Book,
    mut draft: TransactionDraft,
    qz: &Quantizer,
) -> Result<u64, ValidateError> {
    require_instrument(book, draft.instrument)?;
    require_portfolio(book, draft.portfolio)?;
    if draft.quantity <= Decimal::ZERO {
        return Err(ValidateError::NonPositiveQuantity(draft.quantity));
    }
    if draft.unit_price < Decimal::ZERO {
        return Err(ValidateError::NegativeAmount {
            field: "unit price",
            value: draft.unit_price,
        });
    }
    if draft.fees < Decimal::ZERO {
        return Err(ValidateError::NegativeAmount {
            field: "fees",
            value: draft.fees,
        });
    }

    // Bonus shares cost nothing, whatever the input claims.
    if draft.kind == TxKind::Bonus {
        draft.unit_price = Decimal::ZERO;
        draft.fees = Decimal::ZERO;
    }

    // Actual over-sells are rejected here, at write time; the engine itself
    // only ever clamps.
    let is_release = draft.kind == TxKind::Sell
        || (draft.kind == TxKind::Transfer && draft.unit_price.is_zero());
    if is_release {
        check_release(book, &draft, qz)?;
    }

    let id = book.next_transaction_id();
    book.transactions.push(Transaction {
        id,
        date: draft.date,
        kind: draft.kind,
        instrument: draft.instrument,
        portfolio: draft.portfolio,
        quantity: qz.qty(draft.quantity),
        unit_price: qz.money(draft.unit_price),
        fees: qz.money(draft.fees),
        note: draft.note,
        active: true,
    });
    info!(id, kind = %draft.kind.as_str(), "Transaction recorded");
    Ok(id)
}

/// Move quantity between portfolios as a transfer pair: an out leg at price
/// zero in the origin and an in leg carrying the origin's average cost, so
/// the combined cost basis is preserved. Returns (out id, in id).
pub fn transfer_between(
    book: &mut Book,
    date: NaiveDate,
    instrument: InstrumentId,
    origin: PortfolioId,
    destination: PortfolioId,
    quantity: Decimal,
    qz: &Quantizer,
) -> Result<(u64, u64), ValidateError> {
    if origin == destination {
        return Err(ValidateError::SamePortfolio);
    }
    require_instrument(book, instrument)?;
    require_portfolio(book, origin)?;
    require_portfolio(book, destination)?;

    let txs = book
        .transactions(&TxQuery::position(instrument, origin, Some(date)))
        .map_err(|e| ValidateError::Ledger(e.to_string()))?;
    let origin_pos = compute_position(&txs, qz);

    let out_id = record_transaction(
        book,
        TransactionDraft {
            date,
            kind: TxKind::Transfer,
            instrument,
            portfolio: origin,
            quantity,
            unit_price: Decimal::ZERO,
            fees: Decimal::ZERO,
            note: "transfer out".into(),
        },
        qz,
    )?;
    let in_id = record_transaction(
        book,
        TransactionDraft {
            date,
            kind: TxKind::Transfer,
            instrument,
            portfolio: destination,
            quantity,
            unit_price: origin_pos.average_cost,
            fees: Decimal::ZERO,
            note: "transfer in".into(),
        },
        qz,
    )?;
    Ok((out_id, in_id))
}

/// Validate and append one corporate action. Returns the new id.
pub fn record_action(book: &mut Book, draft: ActionDraft) -> Result<u64, ValidateError> {
    require_instrument(book, draft.instrument)?;
    match draft.kind {
        ActionKind::Split | ActionKind::ReverseSplit | ActionKind::Bonus => {
            if draft.numerator <= Decimal::ZERO || draft.denominator <= Decimal::ZERO {
                return Err(ValidateError::InvalidRatio(draft.kind));
            }
        }
        ActionKind::TickerRename => {
            let target = draft.renamed_to.ok_or(ValidateError::MissingRenameTarget)?;
            require_instrument(book, target)?;
        }
    }

    let id = book.next_action_id();
    book.actions.push(CorporateAction {
        id,
        instrument: draft.instrument,
        kind: draft.kind,
        effective_date: draft.effective_date,
        numerator: draft.numerator,
        denominator: draft.denominator,
        renamed_to: draft.renamed_to,
        note: draft.note,
        active: true,
    });
    info!(id, kind = %draft.kind.as_str(), "Corporate action recorded");
    Ok(id)
}

/// Materialize a bonus action into ledger rows: for every portfolio holding
/// the instrument at the effective date, append a BONUS transaction of
/// `position × (num/den − 1)` shares. Returns the number of rows created.
pub fn apply_bonus(book: &mut Book, action_id: u64, qz: &Quantizer) -> Result<usize, ValidateError> {
    let action = book
        .action_by_id(action_id)
        .ok_or(ValidateError::UnknownAction(action_id))?
        .clone();
    if action.kind != ActionKind::Bonus || !action.active {
        return Err(ValidateError::NotABonus(action_id));
    }
    let Some(ratio) = action.ratio() else {
        return Err(ValidateError::InvalidRatio(action.kind));
    };
    let bonus_per_share = ratio - Decimal::ONE;
    if bonus_per_share <= Decimal::ZERO {
        return Ok(0);
    }

    let portfolios: Vec<PortfolioId> = book
        .portfolios
        .iter()
        .filter(|p| p.active)
        .map(|p| p.id)
        .collect();
    let mut created = 0;
    for portfolio in portfolios {
        let held = available_at(book, action.instrument, portfolio, action.effective_date, qz)?;
        if held <= Decimal::ZERO {
            continue;
        }
        let bonus_qty = qz.qty(held * bonus_per_share);
        if bonus_qty <= Decimal::ZERO {
            continue;
        }
        record_transaction(
            book,
            TransactionDraft {
                date: action.effective_date,
                kind: TxKind::Bonus,
                instrument: action.instrument,
                portfolio,
                quantity: bonus_qty,
                unit_price: Decimal::ZERO,
                fees: Decimal::ZERO,
                note: format!("bonus from action #{action_id}"),
            },
            qz,
        )?;
        created += 1;
    }
    info!(action_id, created, "Bonus action materialized");
    Ok(created)
}

/// Soft-delete a transaction. The row stays on disk but disappears from
/// every engine read.
pub fn delete_transaction(book: &mut Book, id: u64) -> Result<(), ValidateError> {
    let tx = book
        .transactions
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or(ValidateError::UnknownTransaction(id))?;
    tx.active = false;
    info!(id, "Transaction soft-deleted");
    Ok(())
}

/// Soft-delete a corporate action.
pub fn delete_action(book: &mut Book, id: u64) -> Result<(), ValidateError> {
    let action = book
        .actions
        .iter_mut()
        .find(|a| a.id == id)
        .ok_or(ValidateError::UnknownAction(id))?;
    action.active = false;
    info!(id, "Corporate action soft-deleted");
    Ok(())
}
