//! Test helper module for boleta-engine integration tests.
//!
//! Builds seeded in-memory repositories around the tariffs the scenario
//! tests share.

#![allow(dead_code)]

use std::sync::Arc;

use boleta_engine::engine::BillingEngine;
use boleta_engine::models::{
    BillingPeriod, DiscountAllocation, Fine, RateModel, ReconnectionEvent, SubsidyAssignment,
    SubsidyChangeKind, SubsidyType, Tariff,
};
use boleta_engine::repository::MemoryRepository;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

pub fn d(value: i64) -> Decimal {
    Decimal::from(value)
}

/// 19% IVA as a fraction.
pub fn iva_rate() -> Decimal {
    Decimal::new(19, 2)
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// A pre-2023 period billed under the legacy subsidy formula.
pub fn legacy_period() -> BillingPeriod {
    BillingPeriod::month(2022, 6).expect("valid period")
}

/// A post-cutoff period billed under the revised subsidy formula.
pub fn current_period() -> BillingPeriod {
    BillingPeriod::month(2024, 3).expect("valid period")
}

/// Open-ended tariff with separate sewage and treatment rates, matching
/// the scenario figures: water 500, sewage 300, treatment 100, fixed 2000.
pub fn separate_tariff() -> Tariff {
    Tariff {
        tariff_id: Uuid::new_v4(),
        effective_from: date(2015, 1, 1),
        effective_to: None,
        fixed_charge: d(2000),
        water_rate_per_m3: d(500),
        rate_model: RateModel::Separate {
            sewage_rate_per_m3: d(300),
            treatment_rate_per_m3: d(100),
        },
        reconnection_cost_1: d(9500),
        reconnection_cost_2: d(14000),
        tax_rate: iva_rate(),
        monthly_interest_rate: Decimal::new(15, 3),
        interest_grace_days: 10,
        created_utc: Utc::now(),
    }
}

/// Open-ended tariff with the combined sewage/treatment rate of 400.
pub fn combined_tariff() -> Tariff {
    Tariff {
        rate_model: RateModel::Combined {
            sewage_treatment_rate_per_m3: d(400),
        },
        ..separate_tariff()
    }
}

pub fn subsidy_assignment(
    customer_id: Uuid,
    subsidy_type: SubsidyType,
    change_kind: SubsidyChangeKind,
    effective_from: NaiveDate,
) -> SubsidyAssignment {
    SubsidyAssignment {
        assignment_id: Uuid::new_v4(),
        customer_id,
        subsidy_type,
        change_kind,
        effective_from,
        created_utc: Utc::now(),
    }
}

pub fn discount(
    customer_id: Uuid,
    amount: i64,
    valid_from: NaiveDate,
    valid_to: Option<NaiveDate>,
) -> DiscountAllocation {
    DiscountAllocation {
        allocation_id: Uuid::new_v4(),
        customer_id,
        description: "Test discount".to_string(),
        amount: d(amount),
        valid_from,
        valid_to,
        active: true,
        created_utc: Utc::now(),
    }
}

pub fn fine(customer_id: Uuid, amount: i64, tax_applicable: bool) -> Fine {
    Fine {
        fine_id: Uuid::new_v4(),
        customer_id,
        description: "Test fine".to_string(),
        amount: d(amount),
        tax_applicable,
        applied_boleta_id: None,
        created_utc: Utc::now(),
    }
}

pub fn reconnection(
    customer_id: Uuid,
    sequence_number: Option<u8>,
    tax_applicable: bool,
    restored_at: NaiveDate,
) -> ReconnectionEvent {
    ReconnectionEvent {
        event_id: Uuid::new_v4(),
        customer_id,
        sequence_number,
        tax_applicable,
        stored_amount: None,
        restored_at,
        applied_boleta_id: None,
        created_utc: Utc::now(),
    }
}

/// Engine plus repository around one tariff.
pub struct TestContext {
    pub repo: Arc<MemoryRepository>,
    pub engine: BillingEngine<MemoryRepository>,
}

impl TestContext {
    pub fn with_tariff(tariff: Tariff) -> Self {
        let repo = Arc::new(MemoryRepository::new());
        repo.add_tariff(tariff);
        let engine = BillingEngine::new(Arc::clone(&repo));
        Self { repo, engine }
    }

    /// Register a customer with a reading for the period and return its id.
    pub fn customer_with_consumption(&self, period: BillingPeriod, m3: i64) -> Uuid {
        let customer_id = Uuid::new_v4();
        self.repo.set_consumption(customer_id, period.start, d(m3));
        customer_id
    }
}
