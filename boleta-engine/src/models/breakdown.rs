//! Itemized charge breakdown.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fully itemized monetary breakdown for one customer and period.
///
/// Built by the computation pipeline and immutable once assembled. The
/// identities that hold for every finalized breakdown:
///
/// - `subtotal = fixed_charge + water_charge + sewage_charge + treatment_charge`
/// - `gross_before_subsidy = subtotal - discount_amount + taxable fines
///   + taxable reconnections` (the taxable base)
/// - `net_amount + tax_amount - subsidy_amount = gross_after_subsidy`
///
/// `exempt_amount` carries fines and reconnections outside the tax base;
/// it is folded into `net_amount` untaxed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeBreakdown {
    pub fixed_charge: Decimal,
    pub water_charge: Decimal,
    pub sewage_charge: Decimal,
    pub treatment_charge: Decimal,
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub subsidy_amount: Decimal,
    pub gross_before_subsidy: Decimal,
    pub gross_after_subsidy: Decimal,
    pub net_amount: Decimal,
    pub tax_amount: Decimal,
    pub exempt_amount: Decimal,
    /// Pending fines this computation would consume at finalization.
    pub applied_fine_ids: Vec<Uuid>,
    /// Eligible reconnection events this computation would consume.
    pub applied_reconnection_ids: Vec<Uuid>,
}

impl ChargeBreakdown {
    /// Breakdown containing only the base charges, adjustments zeroed.
    pub fn from_base_charges(
        fixed_charge: Decimal,
        water_charge: Decimal,
        sewage_charge: Decimal,
        treatment_charge: Decimal,
    ) -> Self {
        let subtotal = fixed_charge + water_charge + sewage_charge + treatment_charge;
        Self {
            fixed_charge,
            water_charge,
            sewage_charge,
            treatment_charge,
            subtotal,
            discount_amount: Decimal::ZERO,
            subsidy_amount: Decimal::ZERO,
            gross_before_subsidy: subtotal,
            gross_after_subsidy: subtotal,
            net_amount: Decimal::ZERO,
            tax_amount: Decimal::ZERO,
            exempt_amount: Decimal::ZERO,
            applied_fine_ids: Vec::new(),
            applied_reconnection_ids: Vec::new(),
        }
    }
}
