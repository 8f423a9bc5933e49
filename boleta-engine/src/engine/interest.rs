//! Late-payment interest.

use rust_decimal::Decimal;

use crate::engine::rounding::round_half_up;
use crate::models::Tariff;

/// Simple interest accrued on an overdue balance.
///
/// Days inside the tariff's grace window accrue nothing; past it, the
/// monthly rate is prorated daily over a 30-day month.
pub fn late_payment_interest(balance: Decimal, days_overdue: i64, tariff: &Tariff) -> Decimal {
    if balance <= Decimal::ZERO || days_overdue <= tariff.interest_grace_days {
        return Decimal::ZERO;
    }

    let chargeable_days = Decimal::from(days_overdue - tariff.interest_grace_days);
    round_half_up(balance * tariff.monthly_interest_rate * chargeable_days / Decimal::from(30))
}
