//! Service-reconnection event model.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A service reconnection after a cutoff, pending billing.
///
/// The charge is always derived from the tariff in force, selected by
/// `sequence_number`; `stored_amount` is the ad-hoc figure recorded by the
/// field operation and is informational only. Like a fine, an event is
/// billed exactly once via `applied_boleta_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconnectionEvent {
    #[serde(default = "Uuid::new_v4")]
    pub event_id: Uuid,
    pub customer_id: Uuid,
    #[serde(default)]
    pub sequence_number: Option<u8>,
    #[serde(default = "default_tax_applicable")]
    pub tax_applicable: bool,
    #[serde(default)]
    pub stored_amount: Option<Decimal>,
    pub restored_at: NaiveDate,
    #[serde(default)]
    pub applied_boleta_id: Option<Uuid>,
    #[serde(default = "Utc::now")]
    pub created_utc: DateTime<Utc>,
}

fn default_tax_applicable() -> bool {
    true
}

impl ReconnectionEvent {
    pub fn is_pending(&self) -> bool {
        self.applied_boleta_id.is_none()
    }

    /// Sequence within the cutoff window, defaulting to a first event.
    pub fn sequence(&self) -> u8 {
        self.sequence_number.unwrap_or(1)
    }
}
