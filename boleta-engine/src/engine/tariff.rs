//! Tariff resolution.

use chrono::NaiveDate;

use crate::models::Tariff;

/// Select the tariff effective on `billing_date`.
///
/// Tariff ranges never overlap, so the first match is the only match.
/// `None` means billing cannot proceed for the date; callers surface
/// `ComputationError::NoEffectiveTariff`.
pub fn effective_on(tariffs: &[Tariff], billing_date: NaiveDate) -> Option<&Tariff> {
    tariffs.iter().find(|t| t.is_effective_on(billing_date))
}
