//! Subsidy assignment model.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Government subsidy granted to a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubsidyType {
    None,
    Half,
    Full,
}

impl SubsidyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubsidyType::None => "none",
            SubsidyType::Half => "half",
            SubsidyType::Full => "full",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "half" => SubsidyType::Half,
            "full" => SubsidyType::Full,
            _ => SubsidyType::None,
        }
    }

    /// Formula multiplier: the full subsidy doubles the half-subsidy amount.
    pub fn multiplier(&self) -> Decimal {
        match self {
            SubsidyType::None => Decimal::ZERO,
            SubsidyType::Half => Decimal::ONE,
            SubsidyType::Full => Decimal::TWO,
        }
    }
}

/// Kind of change an assignment records in the append-only history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubsidyChangeKind {
    Granted,
    Modified,
    Removed,
}

impl SubsidyChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubsidyChangeKind::Granted => "granted",
            SubsidyChangeKind::Modified => "modified",
            SubsidyChangeKind::Removed => "removed",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "modified" => SubsidyChangeKind::Modified,
            "removed" => SubsidyChangeKind::Removed,
            _ => SubsidyChangeKind::Granted,
        }
    }
}

/// One entry in a customer's subsidy history.
///
/// The history is append-only; resolution picks the latest entry whose
/// `effective_from` is on or before the billing-period start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubsidyAssignment {
    #[serde(default = "Uuid::new_v4")]
    pub assignment_id: Uuid,
    pub customer_id: Uuid,
    pub subsidy_type: SubsidyType,
    pub change_kind: SubsidyChangeKind,
    pub effective_from: NaiveDate,
    #[serde(default = "Utc::now")]
    pub created_utc: DateTime<Utc>,
}
