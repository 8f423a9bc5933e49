//! Concurrent in-memory repository.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rust_decimal::Decimal;
use tracing::instrument;
use uuid::Uuid;

use service_core::error::AppError;

use crate::engine::tariff::effective_on;
use crate::models::{
    BillingPeriod, Boleta, DiscountAllocation, Fine, ReconnectionEvent, SubsidyAssignment, Tariff,
};
use crate::repository::BillingRepository;

/// In-memory `BillingRepository` backing the tests and the batch demo.
///
/// Sharded maps keep reads lock-free across concurrent workers; the claim
/// methods rely on the per-shard exclusive guard for their conditional
/// writes.
#[derive(Default)]
pub struct MemoryRepository {
    tariffs: RwLock<Vec<Tariff>>,
    subsidies: DashMap<Uuid, Vec<SubsidyAssignment>>,
    discounts: DashMap<Uuid, Vec<DiscountAllocation>>,
    consumption: DashMap<(Uuid, NaiveDate), Decimal>,
    fines: DashMap<Uuid, Fine>,
    reconnections: DashMap<Uuid, ReconnectionEvent>,
    boletas: DashMap<(Uuid, NaiveDate), Boleta>,
    folio_counter: AtomicI64,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_tariff(&self, tariff: Tariff) {
        self.tariffs
            .write()
            .expect("tariff lock poisoned")
            .push(tariff);
    }

    pub fn add_subsidy_assignment(&self, assignment: SubsidyAssignment) {
        self.subsidies
            .entry(assignment.customer_id)
            .or_default()
            .push(assignment);
    }

    pub fn add_discount(&self, allocation: DiscountAllocation) {
        self.discounts
            .entry(allocation.customer_id)
            .or_default()
            .push(allocation);
    }

    pub fn set_consumption(&self, customer_id: Uuid, period_start: NaiveDate, m3: Decimal) {
        self.consumption.insert((customer_id, period_start), m3);
    }

    pub fn add_fine(&self, fine: Fine) {
        self.fines.insert(fine.fine_id, fine);
    }

    pub fn add_reconnection(&self, event: ReconnectionEvent) {
        self.reconnections.insert(event.event_id, event);
    }

    /// Current state of a fine, for assertions and inspection.
    pub fn fine(&self, fine_id: Uuid) -> Option<Fine> {
        self.fines.get(&fine_id).map(|f| f.clone())
    }

    /// Current state of a reconnection event.
    pub fn reconnection(&self, event_id: Uuid) -> Option<ReconnectionEvent> {
        self.reconnections.get(&event_id).map(|e| e.clone())
    }

    /// Boleta stored for a customer and period start, if any.
    pub fn boleta(&self, customer_id: Uuid, period_start: NaiveDate) -> Option<Boleta> {
        self.boletas.get(&(customer_id, period_start)).map(|b| b.clone())
    }

    pub fn boleta_count(&self) -> usize {
        self.boletas.len()
    }
}

#[async_trait]
impl BillingRepository for MemoryRepository {
    async fn effective_tariff(&self, billing_date: NaiveDate) -> Result<Option<Tariff>, AppError> {
        let tariffs = self.tariffs.read().expect("tariff lock poisoned");
        Ok(effective_on(&tariffs, billing_date).cloned())
    }

    async fn subsidy_history(&self, customer_id: Uuid) -> Result<Vec<SubsidyAssignment>, AppError> {
        Ok(self
            .subsidies
            .get(&customer_id)
            .map(|h| h.clone())
            .unwrap_or_default())
    }

    async fn discount_allocations(
        &self,
        customer_id: Uuid,
    ) -> Result<Vec<DiscountAllocation>, AppError> {
        Ok(self
            .discounts
            .get(&customer_id)
            .map(|d| d.clone())
            .unwrap_or_default())
    }

    async fn metered_consumption(
        &self,
        customer_id: Uuid,
        period: &BillingPeriod,
    ) -> Result<Option<Decimal>, AppError> {
        Ok(self
            .consumption
            .get(&(customer_id, period.start))
            .map(|m3| *m3))
    }

    async fn pending_fines(&self, customer_id: Uuid) -> Result<Vec<Fine>, AppError> {
        Ok(self
            .fines
            .iter()
            .filter(|f| f.customer_id == customer_id && f.is_pending())
            .map(|f| f.clone())
            .collect())
    }

    async fn pending_reconnections(
        &self,
        customer_id: Uuid,
    ) -> Result<Vec<ReconnectionEvent>, AppError> {
        Ok(self
            .reconnections
            .iter()
            .filter(|e| e.customer_id == customer_id && e.is_pending())
            .map(|e| e.clone())
            .collect())
    }

    async fn pending_reconnections_by_customer(
        &self,
    ) -> Result<HashMap<Uuid, Vec<ReconnectionEvent>>, AppError> {
        let mut cache: HashMap<Uuid, Vec<ReconnectionEvent>> = HashMap::new();
        for event in self.reconnections.iter().filter(|e| e.is_pending()) {
            cache
                .entry(event.customer_id)
                .or_default()
                .push(event.clone());
        }
        Ok(cache)
    }

    #[instrument(skip(self))]
    async fn claim_fine(&self, fine_id: Uuid, boleta_id: Uuid) -> Result<bool, AppError> {
        match self.fines.get_mut(&fine_id) {
            Some(mut fine) if fine.applied_boleta_id.is_none() => {
                fine.applied_boleta_id = Some(boleta_id);
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Err(AppError::NotFound(anyhow::anyhow!(
                "Fine {} not found",
                fine_id
            ))),
        }
    }

    async fn release_fine_claim(&self, fine_id: Uuid, boleta_id: Uuid) -> Result<(), AppError> {
        if let Some(mut fine) = self.fines.get_mut(&fine_id) {
            if fine.applied_boleta_id == Some(boleta_id) {
                fine.applied_boleta_id = None;
            }
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn claim_reconnection(&self, event_id: Uuid, boleta_id: Uuid) -> Result<bool, AppError> {
        match self.reconnections.get_mut(&event_id) {
            Some(mut event) if event.applied_boleta_id.is_none() => {
                event.applied_boleta_id = Some(boleta_id);
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Err(AppError::NotFound(anyhow::anyhow!(
                "Reconnection event {} not found",
                event_id
            ))),
        }
    }

    async fn release_reconnection_claim(
        &self,
        event_id: Uuid,
        boleta_id: Uuid,
    ) -> Result<(), AppError> {
        if let Some(mut event) = self.reconnections.get_mut(&event_id) {
            if event.applied_boleta_id == Some(boleta_id) {
                event.applied_boleta_id = None;
            }
        }
        Ok(())
    }

    async fn boleta_exists(
        &self,
        customer_id: Uuid,
        period_start: NaiveDate,
    ) -> Result<bool, AppError> {
        Ok(self.boletas.contains_key(&(customer_id, period_start)))
    }

    async fn next_folio(&self) -> Result<i64, AppError> {
        Ok(self.folio_counter.fetch_add(1, Ordering::SeqCst) + 1)
    }

    #[instrument(skip(self, boleta), fields(boleta_id = %boleta.boleta_id))]
    async fn insert_boleta(&self, boleta: &Boleta) -> Result<(), AppError> {
        match self
            .boletas
            .entry((boleta.customer_id, boleta.period_start))
        {
            Entry::Occupied(_) => Err(AppError::Conflict(anyhow::anyhow!(
                "Boleta already exists for customer {} and period starting {}",
                boleta.customer_id,
                boleta.period_start
            ))),
            Entry::Vacant(slot) => {
                slot.insert(boleta.clone());
                Ok(())
            }
        }
    }

    async fn customers_due(&self, period: &BillingPeriod) -> Result<Vec<Uuid>, AppError> {
        let mut customers: Vec<Uuid> = self
            .consumption
            .iter()
            .filter(|entry| entry.key().1 == period.start)
            .map(|entry| entry.key().0)
            .collect();
        customers.sort();
        customers.dedup();
        Ok(customers)
    }
}
