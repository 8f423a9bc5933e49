//! Base charge calculation tests.

mod common;

use boleta_engine::engine::base_charges;
use common::{combined_tariff, d, separate_tariff};
use rust_decimal::Decimal;

#[test]
fn separate_rates_itemize_three_volumetric_charges() {
    let breakdown = base_charges(d(10), &separate_tariff());

    assert_eq!(breakdown.fixed_charge, d(2000));
    assert_eq!(breakdown.water_charge, d(5000));
    assert_eq!(breakdown.sewage_charge, d(3000));
    assert_eq!(breakdown.treatment_charge, d(1000));
    assert_eq!(breakdown.subtotal, d(11000));

    // Adjustments start zeroed, both gross figures at the subtotal.
    assert_eq!(breakdown.discount_amount, Decimal::ZERO);
    assert_eq!(breakdown.subsidy_amount, Decimal::ZERO);
    assert_eq!(breakdown.tax_amount, Decimal::ZERO);
    assert_eq!(breakdown.gross_before_subsidy, breakdown.subtotal);
    assert_eq!(breakdown.gross_after_subsidy, breakdown.subtotal);
}

#[test]
fn combined_rate_bills_as_sewage_with_zero_treatment() {
    let breakdown = base_charges(d(10), &combined_tariff());

    assert_eq!(breakdown.water_charge, d(5000));
    assert_eq!(breakdown.sewage_charge, d(4000));
    assert_eq!(breakdown.treatment_charge, Decimal::ZERO);
    assert_eq!(breakdown.subtotal, d(11000));
}

#[test]
fn zero_consumption_still_bills_the_fixed_charge() {
    let breakdown = base_charges(Decimal::ZERO, &separate_tariff());

    assert_eq!(breakdown.water_charge, Decimal::ZERO);
    assert_eq!(breakdown.sewage_charge, Decimal::ZERO);
    assert_eq!(breakdown.treatment_charge, Decimal::ZERO);
    assert_eq!(breakdown.subtotal, d(2000));
}

#[test]
fn fractional_consumption_rounds_each_line_to_whole_units() {
    // 12.5 m3 * 500 = 6250; 12.5 * 300 = 3750; 12.5 * 100 = 1250.
    let breakdown = base_charges(Decimal::new(125, 1), &separate_tariff());
    assert_eq!(breakdown.water_charge, d(6250));

    // 10.3 m3 * 500 = 5150; * 300 = 3090; * 100 = 1030.
    let breakdown = base_charges(Decimal::new(103, 1), &separate_tariff());
    assert_eq!(breakdown.subtotal, d(2000) + d(5150) + d(3090) + d(1030));
}
