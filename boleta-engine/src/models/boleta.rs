//! Boleta model and billing period.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Half-open billing period `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl BillingPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The calendar month `[first day, first day of next month)`.
    pub fn month(year: i32, month: u32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let end = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)?
        };
        Some(Self { start, end })
    }

    pub fn is_valid(&self) -> bool {
        self.start < self.end
    }
}

impl std::fmt::Display for BillingPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Boleta status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoletaStatus {
    Issued,
    Paid,
    Annulled,
}

impl BoletaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoletaStatus::Issued => "issued",
            BoletaStatus::Paid => "paid",
            BoletaStatus::Annulled => "annulled",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "paid" => BoletaStatus::Paid,
            "annulled" => BoletaStatus::Annulled,
            _ => BoletaStatus::Issued,
        }
    }
}

/// Finalized invoice for one customer and billing period.
///
/// Monetary fields are copied from a finalized `ChargeBreakdown` and are
/// immutable thereafter; corrections go through a separate mechanism.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boleta {
    pub boleta_id: Uuid,
    pub customer_id: Uuid,
    pub folio: i64,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub consumption_m3: Decimal,
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
    pub prior_balance: Decimal,
    pub other_charges: Decimal,
    pub restructuring_amount: Decimal,
    pub total_amount: Decimal,
    pub status: String,
    pub created_utc: DateTime<Utc>,
}
