//! Tariff model.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-m3 rate schema for a tariff.
///
/// Tariffs authored before the schema migration carry separate sewage and
/// treatment rates; newer tariffs carry a single combined rate. The variant
/// is fixed when the record is constructed, so downstream code matches on it
/// instead of probing nullable columns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum RateModel {
    Separate {
        sewage_rate_per_m3: Decimal,
        treatment_rate_per_m3: Decimal,
    },
    Combined {
        sewage_treatment_rate_per_m3: Decimal,
    },
}

impl RateModel {
    /// Sewage and treatment rates as an additive pair.
    ///
    /// A combined rate rides entirely on the sewage slot with a zero
    /// treatment rate, so subtotals stay additive without a third term
    /// double counting.
    pub fn sewage_treatment_rates(&self) -> (Decimal, Decimal) {
        match self {
            RateModel::Separate {
                sewage_rate_per_m3,
                treatment_rate_per_m3,
            } => (*sewage_rate_per_m3, *treatment_rate_per_m3),
            RateModel::Combined {
                sewage_treatment_rate_per_m3,
            } => (*sewage_treatment_rate_per_m3, Decimal::ZERO),
        }
    }
}

/// Tariff in effect for the half-open range `[effective_from, effective_to)`.
///
/// Ranges for the utility never overlap; an open-ended tariff has
/// `effective_to = None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tariff {
    #[serde(default = "Uuid::new_v4")]
    pub tariff_id: Uuid,
    pub effective_from: NaiveDate,
    #[serde(default)]
    pub effective_to: Option<NaiveDate>,
    pub fixed_charge: Decimal,
    pub water_rate_per_m3: Decimal,
    #[serde(flatten)]
    pub rate_model: RateModel,
    pub reconnection_cost_1: Decimal,
    pub reconnection_cost_2: Decimal,
    pub tax_rate: Decimal,
    pub monthly_interest_rate: Decimal,
    pub interest_grace_days: i64,
    #[serde(default = "Utc::now")]
    pub created_utc: DateTime<Utc>,
}

impl Tariff {
    /// Whether this tariff is effective on the given billing date.
    pub fn is_effective_on(&self, date: NaiveDate) -> bool {
        date >= self.effective_from && self.effective_to.is_none_or(|end| date < end)
    }

    /// Reconnection cost by event sequence: 1st vs 2nd-and-later within
    /// the cutoff window.
    pub fn reconnection_cost(&self, sequence_number: u8) -> Decimal {
        if sequence_number >= 2 {
            self.reconnection_cost_2
        } else {
            self.reconnection_cost_1
        }
    }
}
