//! Engine error type.

use chrono::NaiveDate;
use service_core::error::AppError;
use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by boleta computation and finalization.
///
/// `NoEffectiveTariff` is fatal for the customer/period: billing cannot
/// proceed and no partial boleta is produced. A missing subsidy assignment
/// is deliberately not an error; it resolves to a zero subsidy.
#[derive(Debug, Error)]
pub enum ComputationError {
    #[error("No effective tariff for billing date {billing_date}")]
    NoEffectiveTariff { billing_date: NaiveDate },

    #[error("No meter reading for customer {customer_id} in period starting {period_start}")]
    NoMeterReading {
        customer_id: Uuid,
        period_start: NaiveDate,
    },

    #[error("Boleta already issued for customer {customer_id} and period starting {period_start}")]
    AlreadyBilled {
        customer_id: Uuid,
        period_start: NaiveDate,
    },

    #[error("Invalid billing period: start {start} is not before end {end}")]
    InvalidPeriod { start: NaiveDate, end: NaiveDate },

    #[error(transparent)]
    Repository(#[from] AppError),
}
