//! Repository capabilities consumed by the engine.

mod memory;

pub use memory::MemoryRepository;

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use service_core::error::AppError;

use crate::models::{
    BillingPeriod, Boleta, DiscountAllocation, Fine, ReconnectionEvent, SubsidyAssignment, Tariff,
};

/// Narrow persistence capabilities the engine depends on.
///
/// The engine holds no ambient database handles; a production
/// implementation backs these with whatever store the utility runs, the
/// in-memory implementation backs the tests and batch demo.
///
/// Claim methods are conditional writes: a claim succeeds only while the
/// record's `applied_boleta_id` is still unset, so two concurrent runs can
/// never both bill the same record.
#[async_trait]
pub trait BillingRepository: Send + Sync {
    /// Tariff effective on a billing date, if any.
    async fn effective_tariff(&self, billing_date: NaiveDate) -> Result<Option<Tariff>, AppError>;

    /// Full append-only subsidy history for a customer.
    async fn subsidy_history(&self, customer_id: Uuid) -> Result<Vec<SubsidyAssignment>, AppError>;

    /// Discount allocations recorded for a customer.
    async fn discount_allocations(
        &self,
        customer_id: Uuid,
    ) -> Result<Vec<DiscountAllocation>, AppError>;

    /// Metered consumption in m3 for a customer and period, if a reading
    /// was taken.
    async fn metered_consumption(
        &self,
        customer_id: Uuid,
        period: &BillingPeriod,
    ) -> Result<Option<Decimal>, AppError>;

    /// Fines not yet applied to any boleta.
    async fn pending_fines(&self, customer_id: Uuid) -> Result<Vec<Fine>, AppError>;

    /// Reconnection events not yet applied to any boleta.
    async fn pending_reconnections(
        &self,
        customer_id: Uuid,
    ) -> Result<Vec<ReconnectionEvent>, AppError>;

    /// All pending reconnection events grouped by customer, for a batch
    /// run's pre-fetched cache.
    async fn pending_reconnections_by_customer(
        &self,
    ) -> Result<HashMap<Uuid, Vec<ReconnectionEvent>>, AppError>;

    /// Conditionally claim a fine for a boleta. `Ok(false)` means another
    /// run already consumed it.
    async fn claim_fine(&self, fine_id: Uuid, boleta_id: Uuid) -> Result<bool, AppError>;

    /// Release a fine claim held by `boleta_id`; a claim held by a
    /// different boleta is left untouched.
    async fn release_fine_claim(&self, fine_id: Uuid, boleta_id: Uuid) -> Result<(), AppError>;

    /// Conditionally claim a reconnection event for a boleta.
    async fn claim_reconnection(&self, event_id: Uuid, boleta_id: Uuid) -> Result<bool, AppError>;

    /// Release a reconnection claim held by `boleta_id`.
    async fn release_reconnection_claim(
        &self,
        event_id: Uuid,
        boleta_id: Uuid,
    ) -> Result<(), AppError>;

    /// Whether a boleta already exists for the customer and period start.
    async fn boleta_exists(
        &self,
        customer_id: Uuid,
        period_start: NaiveDate,
    ) -> Result<bool, AppError>;

    /// Next folio in the utility's issuing sequence.
    async fn next_folio(&self) -> Result<i64, AppError>;

    /// Persist a finalized boleta. Fails with a conflict if one already
    /// exists for the customer and period.
    async fn insert_boleta(&self, boleta: &Boleta) -> Result<(), AppError>;

    /// Customers with a meter reading for the period, due for billing.
    async fn customers_due(&self, period: &BillingPeriod) -> Result<Vec<Uuid>, AppError>;
}
