//! Base charge calculation.

use rust_decimal::Decimal;

use crate::engine::rounding::round_half_up;
use crate::models::{ChargeBreakdown, RateModel, Tariff};

/// Itemized pre-adjustment charges for a period's consumption.
///
/// Returns a breakdown with discount, subsidy and tax fields zeroed and
/// both gross figures equal to the subtotal; the rest of the pipeline
/// adjusts from there.
pub fn base_charges(consumption_m3: Decimal, tariff: &Tariff) -> ChargeBreakdown {
    let water_charge = round_half_up(consumption_m3 * tariff.water_rate_per_m3);

    let (sewage_charge, treatment_charge) = match tariff.rate_model {
        RateModel::Separate {
            sewage_rate_per_m3,
            treatment_rate_per_m3,
        } => (
            round_half_up(consumption_m3 * sewage_rate_per_m3),
            round_half_up(consumption_m3 * treatment_rate_per_m3),
        ),
        RateModel::Combined {
            sewage_treatment_rate_per_m3,
        } => (
            round_half_up(consumption_m3 * sewage_treatment_rate_per_m3),
            Decimal::ZERO,
        ),
    };

    ChargeBreakdown::from_base_charges(
        tariff.fixed_charge,
        water_charge,
        sewage_charge,
        treatment_charge,
    )
}
