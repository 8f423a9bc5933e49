//! IVA net/tax split.

use rust_decimal::Decimal;

use crate::engine::rounding::round_half_up;

/// Net and tax components of a taxable gross amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IvaSplit {
    pub net: Decimal,
    pub tax: Decimal,
}

/// Split a taxable gross amount into net and tax.
///
/// The net is rounded through the central rule and the tax is the
/// residual, so `net + tax` reconstructs the gross exactly for any rate.
pub fn iva_split(gross: Decimal, tax_rate: Decimal) -> IvaSplit {
    let net = round_half_up(gross / (Decimal::ONE + tax_rate));
    let tax = gross - net;
    IvaSplit { net, tax }
}
