//! Cost-basis fold
//!
//! Sequential fold over a chronologically ordered transaction stream
//! producing the running (quantity, average_cost) tranche. The fold is
//! total: it never errors, never panics, and clamps over-sells to a closed
//! position. It gets invoked speculatively on intermediate states that can
//! transiently go negative before later records restore consistency, so
//! rejecting an actual over-sell is the write-side validator's job
//! ([`crate::book::service`]), never this fold's.

use rust_decimal::Decimal;

use crate::decimal::Quantizer;
use crate::domain::{Transaction, TxKind};
use crate::engine::Tranche;

/// What one transaction does to a position, with the transfer direction
/// already resolved from the raw unit price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Effect {
    /// Adds shares at a cost: buys, subscriptions, transfer-ins and (at
    /// price zero) bonus issuances.
    Acquire {
        quantity: Decimal,
        unit_price: Decimal,
        fees: Decimal,
    },
    /// Removes shares without touching average cost: sells, transfer-outs.
    Release { quantity: Decimal },
    /// Amortizations, event markers: no effect on position.
    None,
}

/// Classify a transaction. Quantity/price/fees are expected pre-quantized.
pub(crate) fn effect_of(
    kind: TxKind,
    quantity: Decimal,
    unit_price: Decimal,
    fees: Decimal,
) -> Effect {
    match kind {
        TxKind::Buy | TxKind::Subscription => Effect::Acquire {
            quantity,
            unit_price,
            fees,
        },
        // Bonus shares are pure dilution: price and fees forced to zero no
        // matter what the record says.
        TxKind::Bonus => Effect::Acquire {
            quantity,
            unit_price: Decimal::ZERO,
            fees: Decimal::ZERO,
        },
        TxKind::Sell => Effect::Release { quantity },
        // Inferred direction: a transfer-in carries the origin's average
        // cost as its unit price, a transfer-out carries zero. Fees never
        // apply either way.
        TxKind::Transfer => {
            if unit_price > Decimal::ZERO {
                Effect::Acquire {
                    quantity,
                    unit_price,
                    fees: Decimal::ZERO,
                }
            } else {
                Effect::Release { quantity }
            }
        }
        TxKind::Amortization | TxKind::Event => Effect::None,
    }
}

/// Fold one effect into the running tranche. Quantity and average cost are
/// re-quantized after every step so downstream comparisons never see raw
/// intermediate values.
pub(crate) fn apply_effect(qz: &Quantizer, pos: Tranche, effect: Effect) -> Tranche {
    match effect {
        Effect::Acquire {
            quantity,
            unit_price,
            fees,
        } => {
            let cost = quantity * unit_price + fees;
            let new_qty = pos.quantity + quantity;
            if new_qty.is_zero() {
                return Tranche::closed();
            }
            let avg = (pos.average_cost * pos.quantity + cost) / new_qty;
            Tranche {
                quantity: qz.qty(new_qty),
                average_cost: qz.money(avg),
            }
        }
        Effect::Release { quantity } => {
            let new_qty = pos.quantity - quantity;
            if new_qty <= Decimal::ZERO {
                Tranche::closed()
            } else {
                Tranche {
                    quantity: qz.qty(new_qty),
                    average_cost: pos.average_cost,
                }
            }
        }
        Effect::None => pos,
    }
}

/// Compute (quantity, average_cost) for a transaction stream already
/// ordered by `(date, id)` ascending. Soft-deleted rows are skipped.
pub fn compute_position(transactions: &[Transaction], qz: &Quantizer) -> Tranche {
    let mut pos = Tranche::closed();
    for t in transactions.iter().filter(|t| t.active) {
        let effect = effect_of(t.kind, qz.qty(t.quantity), qz.money(t.unit_price), qz.money(t.fees));
        pos = apply_effect(qz, pos, effect);
    }
    if pos.is_closed() {
        Tranche::closed()
    } else {
        pos
    }
}
