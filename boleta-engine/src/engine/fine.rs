//! Fine selection for the taxable base.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::Fine;

/// Pending fine totals split by tax applicability.
#[derive(Debug, Clone, Default)]
pub struct FineSplit {
    pub taxable_total: Decimal,
    pub exempt_total: Decimal,
    pub applied: Vec<Uuid>,
}

/// Split the pending fines into taxable and exempt accumulators.
///
/// Tax-applicable amounts join the taxable base before the IVA split;
/// exempt amounts bypass it and reach the net amount untaxed. Already
/// consumed fines never re-enter a run.
pub fn split_pending(fines: &[Fine]) -> FineSplit {
    let mut split = FineSplit::default();
    for fine in fines.iter().filter(|f| f.is_pending()) {
        if fine.tax_applicable {
            split.taxable_total += fine.amount;
        } else {
            split.exempt_total += fine.amount;
        }
        split.applied.push(fine.fine_id);
    }
    split
}
