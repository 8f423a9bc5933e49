//! Late-payment interest tests.

mod common;

use boleta_engine::engine::late_payment_interest;
use common::{d, separate_tariff};
use rust_decimal::Decimal;

#[test]
fn no_interest_inside_the_grace_window() {
    let tariff = separate_tariff();
    assert_eq!(late_payment_interest(d(10000), 0, &tariff), Decimal::ZERO);
    assert_eq!(late_payment_interest(d(10000), 10, &tariff), Decimal::ZERO);
}

#[test]
fn interest_prorates_the_monthly_rate_daily() {
    let tariff = separate_tariff();

    // 30 chargeable days at 1.5% monthly: one full month of interest.
    assert_eq!(late_payment_interest(d(10000), 40, &tariff), d(150));

    // 15 chargeable days: half of it.
    assert_eq!(late_payment_interest(d(10000), 25, &tariff), d(75));
}

#[test]
fn nothing_accrues_on_a_non_positive_balance() {
    let tariff = separate_tariff();
    assert_eq!(late_payment_interest(Decimal::ZERO, 60, &tariff), Decimal::ZERO);
    assert_eq!(late_payment_interest(d(-500), 60, &tariff), Decimal::ZERO);
}
