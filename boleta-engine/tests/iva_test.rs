//! IVA split and rounding rule tests.

mod common;

use boleta_engine::engine::{iva_split, round_half_up};
use common::d;
use rust_decimal::Decimal;

#[test]
fn net_plus_tax_reconstructs_gross_exactly() {
    let rates = [
        Decimal::new(19, 2),
        Decimal::new(10, 2),
        Decimal::new(8, 3),
        Decimal::new(255, 3),
    ];

    for gross in (0..5000i64).map(d) {
        for rate in rates {
            let split = iva_split(gross, rate);
            assert_eq!(
                split.net + split.tax,
                gross,
                "identity broken for gross {} at rate {}",
                gross,
                rate
            );
        }
    }
}

#[test]
fn iva_nineteen_percent_known_values() {
    let split = iva_split(d(11900), Decimal::new(19, 2));
    assert_eq!(split.net, d(10000));
    assert_eq!(split.tax, d(1900));

    // 10000 / 1.19 = 8403.36..., net rounds down, tax takes the residual.
    let split = iva_split(d(10000), Decimal::new(19, 2));
    assert_eq!(split.net, d(8403));
    assert_eq!(split.tax, d(1597));
}

#[test]
fn zero_gross_splits_to_zero() {
    let split = iva_split(Decimal::ZERO, Decimal::new(19, 2));
    assert_eq!(split.net, Decimal::ZERO);
    assert_eq!(split.tax, Decimal::ZERO);
}

#[test]
fn rounding_is_half_up_and_idempotent() {
    assert_eq!(round_half_up(Decimal::new(5, 1)), d(1));
    assert_eq!(round_half_up(Decimal::new(25, 1)), d(3));
    assert_eq!(round_half_up(Decimal::new(24, 1)), d(2));
    assert_eq!(round_half_up(Decimal::new(26, 1)), d(3));

    for value in (0..100i64).map(d) {
        assert_eq!(round_half_up(value), value, "re-rounding changed {}", value);
    }
}
