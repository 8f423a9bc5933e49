//! Discount aggregation.

use rust_decimal::Decimal;

use crate::models::{BillingPeriod, DiscountAllocation};

/// Sum of active discount allocations overlapping the period.
///
/// Simultaneous discounts are additive, not exclusive; absence yields zero.
pub fn discount_total(allocations: &[DiscountAllocation], period: &BillingPeriod) -> Decimal {
    allocations
        .iter()
        .filter(|a| a.active && a.overlaps(period))
        .map(|a| a.amount)
        .sum()
}
