//! Corporate-action adjustment
//!
//! Re-expresses historical share counts and per-share costs in a later
//! date's denomination. Factors apply strictly forward, from a
//! transaction's own date toward the query's as-of date, so post-split
//! counts come out higher at proportionally lower per-share cost, the
//! standard broker convention.
//!
//! Intermediate products ride on `Decimal`'s full 28-digit mantissa;
//! quantization happens once, at the tranche boundary, to keep chained
//! factors from compounding rounding error.

use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::decimal::Quantizer;
use crate::domain::InstrumentId;
use crate::engine::Tranche;
use crate::sources::ActionRegistry;

/// Cumulative adjustment factor for `instrument` over the half-open date
/// interval `(after, until]`: the product of num/den over every split,
/// reverse split and bonus action effective in the interval. An unset
/// `until` or an empty interval yields 1. Always strictly positive.
pub fn factor_between(
    registry: &impl ActionRegistry,
    instrument: InstrumentId,
    after: NaiveDate,
    until: Option<NaiveDate>,
) -> Result<Decimal> {
    let Some(until) = until else {
        return Ok(Decimal::ONE);
    };
    if until <= after {
        return Ok(Decimal::ONE);
    }
    let mut factor = Decimal::ONE;
    for action in registry.ratio_actions_between(instrument, after, until)? {
        match action.ratio() {
            Some(ratio) if ratio > Decimal::ZERO => factor *= ratio,
            // Zero denominators and non-positive ratios are data defects;
            // skip them rather than poison the whole factor.
            _ => {}
        }
    }
    Ok(factor)
}

/// Re-express one tranche as of a later date: quantity scales by the
/// factor, per-share cost scales by its inverse, total basis invariant.
/// A zero factor degenerates to the closed position.
pub fn adjust_tranche(
    qz: &Quantizer,
    quantity: Decimal,
    average_cost: Decimal,
    factor: Decimal,
) -> Tranche {
    if factor.is_zero() {
        return Tranche::closed();
    }
    Tranche {
        quantity: qz.qty(quantity * factor),
        average_cost: qz.money(average_cost / factor),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ActionKind, CorporateAction};
    use rust_decimal_macros::dec;

    /// Minimal registry over a fixed action list.
    struct FixedRegistry(Vec<CorporateAction>);

    impl ActionRegistry for FixedRegistry {
        fn ratio_actions_between(
            &self,
            instrument: InstrumentId,
            after: NaiveDate,
            until: NaiveDate,
        ) -> Result<Vec<CorporateAction>> {
            Ok(self
                .0
                .iter()
                .filter(|a| {
                    a.active
                        && a.instrument == instrument
                        && a.kind.has_ratio()
                        && a.effective_date > after
                        && a.effective_date <= until
                })
                .cloned()
                .collect())
        }

        fn latest_rename(
            &self,
            _instrument: InstrumentId,
            _until: Option<NaiveDate>,
        ) -> Result<Option<CorporateAction>> {
            Ok(None)
        }
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn action(id: u64, kind: ActionKind, day: u32, num: Decimal, den: Decimal) -> CorporateAction {
        CorporateAction {
            id,
            instrument: 1,
            kind,
            effective_date: d(day),
            numerator: num,
            denominator: den,
            renamed_to: None,
            note: String::new(),
            active: true,
        }
    }

    #[test]
    fn empty_interval_yields_one() {
        let reg = FixedRegistry(vec![action(1, ActionKind::Split, 10, dec!(2), dec!(1))]);
        assert_eq!(factor_between(&reg, 1, d(10), Some(d(10))).unwrap(), dec!(1));
        assert_eq!(factor_between(&reg, 1, d(15), Some(d(12))).unwrap(), dec!(1));
    }

    #[test]
    fn unset_end_date_yields_one() {
        let reg = FixedRegistry(vec![action(1, ActionKind::Split, 10, dec!(2), dec!(1))]);
        assert_eq!(factor_between(&reg, 1, d(1), None).unwrap(), dec!(1));
    }

    #[test]
    fn interval_is_open_at_start_closed_at_end() {
        let reg = FixedRegistry(vec![action(1, ActionKind::Split, 10, dec!(2), dec!(1))]);
        // Action on the start date is excluded...
        assert_eq!(factor_between(&reg, 1, d(10), Some(d(20))).unwrap(), dec!(1));
        // ...but an action on the end date is included.
        assert_eq!(factor_between(&reg, 1, d(1), Some(d(10))).unwrap(), dec!(2));
    }

    #[test]
    fn factors_multiply_across_actions() {
        let reg = FixedRegistry(vec![
            action(1, ActionKind::Split, 5, dec!(2), dec!(1)),
            action(2, ActionKind::ReverseSplit, 10, dec!(1), dec!(10)),
            action(3, ActionKind::Bonus, 15, dec!(11), dec!(10)),
        ]);
        // 2 * 0.1 * 1.1
        assert_eq!(factor_between(&reg, 1, d(1), Some(d(30))).unwrap(), dec!(0.22));
    }

    #[test]
    fn zero_denominator_action_is_skipped() {
        let reg = FixedRegistry(vec![
            action(1, ActionKind::Split, 5, dec!(2), dec!(0)),
            action(2, ActionKind::Split, 6, dec!(3), dec!(1)),
        ]);
        assert_eq!(factor_between(&reg, 1, d(1), Some(d(30))).unwrap(), dec!(3));
    }

    #[test]
    fn locality_actions_outside_the_interval_never_matter() {
        let inside_only = FixedRegistry(vec![action(1, ActionKind::Split, 10, dec!(2), dec!(1))]);
        let with_outside = FixedRegistry(vec![
            action(1, ActionKind::Split, 10, dec!(2), dec!(1)),
            action(2, ActionKind::Split, 2, dec!(5), dec!(1)),
            action(3, ActionKind::ReverseSplit, 25, dec!(1), dec!(4)),
        ]);
        let a = factor_between(&inside_only, 1, d(5), Some(d(20))).unwrap();
        let b = factor_between(&with_outside, 1, d(5), Some(d(20))).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn adjust_tranche_scales_quantity_and_inverts_cost() {
        let qz = Quantizer::default();
        let t = adjust_tranche(&qz, dec!(100), dec!(10), dec!(2));
        assert_eq!(t.quantity, dec!(200));
        assert_eq!(t.average_cost, dec!(5.0000));
        // Basis invariant under the adjustment.
        assert_eq!(t.cost_value(), dec!(1000.0000));
    }

    #[test]
    fn adjust_tranche_zero_factor_degenerates_to_closed() {
        let qz = Quantizer::default();
        assert_eq!(adjust_tranche(&qz, dec!(100), dec!(10), dec!(0)), Tranche::closed());
    }
}
