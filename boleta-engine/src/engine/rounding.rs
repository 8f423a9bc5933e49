//! Central monetary rounding rule.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round to the nearest whole peso, midpoints away from zero.
///
/// Every monetary line item passes through here exactly once, at the point
/// it is produced; downstream arithmetic only ever adds and subtracts
/// already-rounded amounts, so totals reproduce to the unit.
pub fn round_half_up(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}
