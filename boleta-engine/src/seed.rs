//! Seed dataset for the batch demo and fixtures.

use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use service_core::error::AppError;

use crate::models::{DiscountAllocation, Fine, ReconnectionEvent, SubsidyAssignment, Tariff};
use crate::repository::MemoryRepository;

/// One meter reading resolved to consumption for a period.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedConsumption {
    pub period_start: NaiveDate,
    pub cubic_meters: Decimal,
}

/// Everything known about one customer in the dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedCustomer {
    pub customer_id: Uuid,
    #[serde(default)]
    pub consumption: Vec<SeedConsumption>,
    #[serde(default)]
    pub subsidies: Vec<SubsidyAssignment>,
    #[serde(default)]
    pub discounts: Vec<DiscountAllocation>,
    #[serde(default)]
    pub fines: Vec<Fine>,
    #[serde(default)]
    pub reconnections: Vec<ReconnectionEvent>,
}

/// Deserialized seed dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedData {
    pub tariffs: Vec<Tariff>,
    pub customers: Vec<SeedCustomer>,
}

impl SeedData {
    /// Load a dataset from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Populate a fresh in-memory repository with the dataset.
    pub fn into_repository(self) -> MemoryRepository {
        let repo = MemoryRepository::new();

        for tariff in self.tariffs {
            repo.add_tariff(tariff);
        }

        for customer in self.customers {
            for reading in customer.consumption {
                repo.set_consumption(
                    customer.customer_id,
                    reading.period_start,
                    reading.cubic_meters,
                );
            }
            for assignment in customer.subsidies {
                repo.add_subsidy_assignment(assignment);
            }
            for allocation in customer.discounts {
                repo.add_discount(allocation);
            }
            for fine in customer.fines {
                repo.add_fine(fine);
            }
            for event in customer.reconnections {
                repo.add_reconnection(event);
            }
        }

        repo
    }
}
