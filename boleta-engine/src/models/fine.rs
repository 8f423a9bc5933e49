//! Fine model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Operational fine charged to a customer.
///
/// A fine is billed exactly once: `applied_boleta_id` stays `None` until a
/// finalizing run claims it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fine {
    #[serde(default = "Uuid::new_v4")]
    pub fine_id: Uuid,
    pub customer_id: Uuid,
    pub description: String,
    pub amount: Decimal,
    #[serde(default = "default_tax_applicable")]
    pub tax_applicable: bool,
    #[serde(default)]
    pub applied_boleta_id: Option<Uuid>,
    #[serde(default = "Utc::now")]
    pub created_utc: DateTime<Utc>,
}

fn default_tax_applicable() -> bool {
    true
}

impl Fine {
    pub fn is_pending(&self) -> bool {
        self.applied_boleta_id.is_none()
    }
}
