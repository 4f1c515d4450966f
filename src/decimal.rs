//! Fixed-point decimal rules shared by the whole engine
//!
//! Every quantity or price that enters the fold must first pass through a
//! [`Quantizer`]: a tolerant parse followed by quantization to a fixed scale
//! (6 decimals for quantities, 4 for money) with half-up rounding. All
//! comparisons against zero and all branching downstream happen on
//! quantized values only, so two runs over the same ledger always produce
//! bit-identical results.
//!
//! The quantizer is an explicit value passed into the engine, never ambient
//! global state. [`rust_decimal::Decimal`] carries the 28-digit mantissa
//! used for intermediate arithmetic before final quantization.

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal scale for monetary values (unit prices, fees, average cost).
pub const MONEY_SCALE: u32 = 4;

/// Decimal scale for share quantities.
pub const QTY_SCALE: u32 = 6;

/// Quantization rules for the position engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantizer {
    money_scale: u32,
    qty_scale: u32,
    rounding: RoundingStrategy,
}

impl Default for Quantizer {
    fn default() -> Self {
        Self {
            money_scale: MONEY_SCALE,
            qty_scale: QTY_SCALE,
            // Half-up: ties round away from zero, matching broker statements.
            rounding: RoundingStrategy::MidpointAwayFromZero,
        }
    }
}

impl Quantizer {
    /// Build a quantizer with custom scales. Used by tests; production code
    /// uses [`Quantizer::default`].
    pub fn new(money_scale: u32, qty_scale: u32) -> Self {
        Self {
            money_scale,
            qty_scale,
            rounding: RoundingStrategy::MidpointAwayFromZero,
        }
    }

    /// Tolerant decimal parse.
    ///
    /// Accepts comma decimal separators (`"10,50"`), surrounding whitespace,
    /// and currency prefixes. As a last resort, strips everything but
    /// digits, `.` and `-` and retries. Blank/`none`/`nan` markers and
    /// anything with no digits left yield `None`.
    pub fn try_parse(&self, value: &str) -> Option<Decimal> {
        let s = value.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("none") || s.eq_ignore_ascii_case("nan") {
            return None;
        }
        let s = s.replace(',', ".");
        if let Ok(d) = s.parse::<Decimal>() {
            return Some(d);
        }
        let filtered: String = s
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
            .collect();
        if filtered.is_empty() || filtered == "-" {
            return None;
        }
        filtered.parse::<Decimal>().ok()
    }

    /// Tolerant parse. Malformed input yields `default`; suspicious rows
    /// are the import stage's problem, not this engine's.
    pub fn parse(&self, value: &str, default: Decimal) -> Decimal {
        self.try_parse(value).unwrap_or(default)
    }

    /// Tolerant parse defaulting to zero.
    pub fn parse_or_zero(&self, value: &str) -> Decimal {
        self.parse(value, Decimal::ZERO)
    }

    /// Quantize a monetary value to 4 decimals, half-up.
    pub fn money(&self, value: Decimal) -> Decimal {
        value.round_dp_with_strategy(self.money_scale, self.rounding)
    }

    /// Quantize a share quantity to 6 decimals, half-up.
    pub fn qty(&self, value: Decimal) -> Decimal {
        value.round_dp_with_strategy(self.qty_scale, self.rounding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parse_accepts_comma_decimal_separator() {
        let q = Quantizer::default();
        assert_eq!(q.parse_or_zero("10,50"), dec!(10.50));
        assert_eq!(q.parse_or_zero(" 0,000001 "), dec!(0.000001));
    }

    #[test]
    fn parse_blank_and_null_markers_yield_default() {
        let q = Quantizer::default();
        assert_eq!(q.parse_or_zero(""), Decimal::ZERO);
        assert_eq!(q.parse_or_zero("   "), Decimal::ZERO);
        assert_eq!(q.parse_or_zero("None"), Decimal::ZERO);
        assert_eq!(q.parse_or_zero("NaN"), Decimal::ZERO);
        assert_eq!(q.parse("n/a", dec!(1)), dec!(1));
    }

    #[test]
    fn parse_strips_stray_characters_before_giving_up() {
        let q = Quantizer::default();
        assert_eq!(q.parse_or_zero("R$ 12.34"), dec!(12.34));
        assert_eq!(q.parse_or_zero("-"), Decimal::ZERO);
        assert_eq!(q.parse_or_zero("abc"), Decimal::ZERO);
    }

    #[test]
    fn try_parse_distinguishes_malformed_from_zero() {
        let q = Quantizer::default();
        assert_eq!(q.try_parse("0"), Some(Decimal::ZERO));
        assert_eq!(q.try_parse("10,50"), Some(dec!(10.50)));
        assert_eq!(q.try_parse("abc"), None);
        assert_eq!(q.try_parse(""), None);
    }

    #[test]
    fn money_quantizes_to_four_decimals_half_up() {
        let q = Quantizer::default();
        assert_eq!(q.money(dec!(1.23455)), dec!(1.2346));
        assert_eq!(q.money(dec!(1.23454)), dec!(1.2345));
        assert_eq!(q.money(dec!(10)), dec!(10.0000));
    }

    #[test]
    fn qty_quantizes_to_six_decimals_half_up() {
        let q = Quantizer::default();
        assert_eq!(q.qty(dec!(0.1234565)), dec!(0.123457));
        assert_eq!(q.qty(dec!(0.1234564)), dec!(0.123456));
    }

    #[test]
    fn quantization_is_idempotent() {
        let q = Quantizer::default();
        let v = q.money(dec!(3.14159265));
        assert_eq!(q.money(v), v);
        let w = q.qty(dec!(3.14159265358));
        assert_eq!(q.qty(w), w);
    }
}
