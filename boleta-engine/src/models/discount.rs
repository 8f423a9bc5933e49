//! Discount allocation model.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::BillingPeriod;

/// Discount amount already resolved for a customer.
///
/// Percentage- or fixed-amount resolution happens upstream when the
/// discount is authored; the engine only sums the amounts whose validity
/// window overlaps the billing period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountAllocation {
    #[serde(default = "Uuid::new_v4")]
    pub allocation_id: Uuid,
    pub customer_id: Uuid,
    pub description: String,
    pub amount: Decimal,
    pub valid_from: NaiveDate,
    #[serde(default)]
    pub valid_to: Option<NaiveDate>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default = "Utc::now")]
    pub created_utc: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl DiscountAllocation {
    /// Whether the validity window overlaps the billing period.
    pub fn overlaps(&self, period: &BillingPeriod) -> bool {
        self.valid_from <= period.end && self.valid_to.is_none_or(|to| to >= period.start)
    }
}
