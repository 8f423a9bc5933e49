//! Billing run model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Billing run type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingRunType {
    Scheduled,
    Manual,
}

impl BillingRunType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingRunType::Scheduled => "scheduled",
            BillingRunType::Manual => "manual",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "manual" => BillingRunType::Manual,
            _ => BillingRunType::Scheduled,
        }
    }
}

/// Billing run status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingRunStatus {
    Running,
    Completed,
    Cancelled,
    Failed,
}

impl BillingRunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingRunStatus::Running => "running",
            BillingRunStatus::Completed => "completed",
            BillingRunStatus::Cancelled => "cancelled",
            BillingRunStatus::Failed => "failed",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "completed" => BillingRunStatus::Completed,
            "cancelled" => BillingRunStatus::Cancelled,
            "failed" => BillingRunStatus::Failed,
            _ => BillingRunStatus::Running,
        }
    }
}

/// Batch billing run over the customers due for a period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingRun {
    pub run_id: Uuid,
    pub run_type: String,
    pub status: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub started_utc: DateTime<Utc>,
    pub completed_utc: Option<DateTime<Utc>>,
    pub customers_processed: i32,
    pub customers_succeeded: i32,
    pub customers_failed: i32,
    pub customers_skipped: i32,
}

/// Billing run result per customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingRunOutcome {
    pub run_id: Uuid,
    pub customer_id: Uuid,
    pub status: String,
    pub boleta_id: Option<Uuid>,
    pub folio: Option<i64>,
    pub error_message: Option<String>,
}

impl BillingRunOutcome {
    pub fn finalized(run_id: Uuid, customer_id: Uuid, boleta_id: Uuid, folio: i64) -> Self {
        Self {
            run_id,
            customer_id,
            status: "finalized".to_string(),
            boleta_id: Some(boleta_id),
            folio: Some(folio),
            error_message: None,
        }
    }

    pub fn failed(run_id: Uuid, customer_id: Uuid, error_message: String) -> Self {
        Self {
            run_id,
            customer_id,
            status: "failed".to_string(),
            boleta_id: None,
            folio: None,
            error_message: Some(error_message),
        }
    }

    pub fn skipped(run_id: Uuid, customer_id: Uuid, reason: String) -> Self {
        Self {
            run_id,
            customer_id,
            status: "skipped".to_string(),
            boleta_id: None,
            folio: None,
            error_message: Some(reason),
        }
    }
}
