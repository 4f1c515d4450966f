//! Time-travel position resolver
//!
//! Answers "what was the position as of date D, expressed in D's share
//! denomination" by replaying the ledger from scratch. Each transaction
//! accumulates its own forward factor from its date up to D; one aggregate
//! factor over the final fold would be wrong whenever transactions straddle
//! an action date. The running state is a single collapsed tranche kept in
//! as-of terms throughout; see [`crate::engine::Tranche`] for the
//! tranche-vs-FIFO-lots trade-off.

use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::decimal::Quantizer;
use crate::domain::{InstrumentId, PortfolioId, TxKind};
use crate::engine::adjust::{adjust_tranche, factor_between};
use crate::engine::fold::{apply_effect, effect_of, Effect};
use crate::engine::Tranche;
use crate::sources::{ActionRegistry, Ledger, TxQuery};

/// Re-express one effect in as-of terms: share counts scale by the factor,
/// per-share prices by its inverse. Fees are cash and are never adjusted.
fn adjusted_effect(qz: &Quantizer, effect: Effect, factor: Decimal) -> Effect {
    match effect {
        Effect::Acquire {
            quantity,
            unit_price,
            fees,
        } => {
            let t = adjust_tranche(qz, quantity, unit_price, factor);
            Effect::Acquire {
                quantity: t.quantity,
                unit_price: t.average_cost,
                fees,
            }
        }
        Effect::Release { quantity } => Effect::Release {
            quantity: adjust_tranche(qz, quantity, Decimal::ZERO, factor).quantity,
        },
        Effect::None => Effect::None,
    }
}

/// Position and average cost for (instrument, portfolio) as of a date,
/// consistent with every corporate action known to the registry, including
/// actions recorded after the transactions they retroactively affect.
///
/// Pure function of the ledger and registry snapshots: identical inputs
/// give bit-identical output, and nothing is ever written back.
pub fn position_as_of<S>(
    store: &S,
    instrument: InstrumentId,
    portfolio: PortfolioId,
    as_of: Option<NaiveDate>,
    qz: &Quantizer,
) -> Result<Tranche>
where
    S: Ledger + ActionRegistry,
{
    let txs = store.transactions(&TxQuery::position(instrument, portfolio, as_of))?;
    let mut pos = Tranche::closed();
    for t in &txs {
        let factor = factor_between(store, instrument, t.date, as_of)?;
        let effect = effect_of(t.kind, qz.qty(t.quantity), qz.money(t.unit_price), qz.money(t.fees));
        pos = apply_effect(qz, pos, adjusted_effect(qz, effect, factor));
    }
    if pos.is_closed() {
        Ok(Tranche::closed())
    } else {
        Ok(pos)
    }
}

/// One step of the adjusted replay, for audit display.
#[derive(Debug, Clone, Serialize)]
pub struct TimelineRow {
    pub transaction_id: u64,
    pub date: NaiveDate,
    pub kind: TxKind,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub fees: Decimal,
    /// Forward factor from the transaction's date to the as-of date.
    pub factor: Decimal,
    pub adjusted_quantity: Decimal,
    /// Adjusted per-share price; absent for zero-priced records.
    pub adjusted_price: Option<Decimal>,
    /// Running tranche after this transaction, in as-of terms.
    pub position: Tranche,
}

/// The same replay as [`position_as_of`], but emitting the applied factor,
/// adjusted values and running tranche per transaction.
pub fn cost_basis_timeline<S>(
    store: &S,
    instrument: InstrumentId,
    portfolio: PortfolioId,
    as_of: Option<NaiveDate>,
    qz: &Quantizer,
) -> Result<Vec<TimelineRow>>
where
    S: Ledger + ActionRegistry,
{
    let txs = store.transactions(&TxQuery::position(instrument, portfolio, as_of))?;
    let mut pos = Tranche::closed();
    let mut rows = Vec::with_capacity(txs.len());
    for t in &txs {
        let factor = factor_between(store, instrument, t.date, as_of)?;
        let quantity = qz.qty(t.quantity);
        let unit_price = qz.money(t.unit_price);
        let fees = qz.money(t.fees);
        let effect = effect_of(t.kind, quantity, unit_price, fees);
        pos = apply_effect(qz, pos, adjusted_effect(qz, effect, factor));
        let adjusted = adjust_tranche(qz, quantity, unit_price, factor);
        rows.push(TimelineRow {
            transaction_id: t.id,
            date: t.date,
            kind: t.kind,
            quantity,
            unit_price,
            fees,
            factor,
            adjusted_quantity: adjusted.quantity,
            adjusted_price: (unit_price > Decimal::ZERO).then_some(adjusted.average_cost),
            position: pos,
        });
    }
    Ok(rows)
}
