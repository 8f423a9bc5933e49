//! Reconnection-event selection and costing.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::warn;
use uuid::Uuid;

use crate::models::{ReconnectionEvent, Tariff};

/// Reconnection events grouped by customer, pre-loaded for a batch run.
pub type ReposicionCache = HashMap<Uuid, Vec<ReconnectionEvent>>;

/// One eligible reconnection with its tariff-derived cost.
#[derive(Debug, Clone)]
pub struct SelectedReposicion {
    pub event_id: Uuid,
    pub cost: Decimal,
    pub tax_applicable: bool,
}

/// Eligible reconnections for a billing run, split by tax applicability.
#[derive(Debug, Clone, Default)]
pub struct ReposicionSelection {
    pub taxable_total: Decimal,
    pub exempt_total: Decimal,
    pub selected: Vec<SelectedReposicion>,
}

impl ReposicionSelection {
    pub fn selected_ids(&self) -> Vec<Uuid> {
        self.selected.iter().map(|s| s.event_id).collect()
    }
}

/// Select the unconsumed reconnection events billable in this run.
///
/// Eligibility: service restored on or before the period end and not yet
/// applied to a boleta. The charge always comes from the tariff, selected
/// by the event's sequence number; a stored ad-hoc amount is informational
/// only. Events whose tariff-derived cost is not positive are skipped and
/// left unconsumed, so a later run under a corrected tariff picks them up.
pub fn select_eligible(
    events: &[ReconnectionEvent],
    period_end: NaiveDate,
    tariff: &Tariff,
) -> ReposicionSelection {
    let mut selection = ReposicionSelection::default();

    for event in events
        .iter()
        .filter(|e| e.is_pending() && e.restored_at <= period_end)
    {
        let cost = tariff.reconnection_cost(event.sequence());

        if cost <= Decimal::ZERO {
            warn!(
                event_id = %event.event_id,
                customer_id = %event.customer_id,
                sequence = event.sequence(),
                tariff_id = %tariff.tariff_id,
                "Reconnection event skipped: tariff-derived cost is not positive"
            );
            continue;
        }

        if let Some(stored) = event.stored_amount {
            if stored != cost {
                warn!(
                    event_id = %event.event_id,
                    customer_id = %event.customer_id,
                    stored_amount = %stored,
                    tariff_cost = %cost,
                    "Reconnection amount discrepancy: billing the tariff-derived cost"
                );
            }
        }

        if event.tax_applicable {
            selection.taxable_total += cost;
        } else {
            selection.exempt_total += cost;
        }
        selection.selected.push(SelectedReposicion {
            event_id: event.event_id,
            cost,
            tax_applicable: event.tax_applicable,
        });
    }

    selection
}

/// Batch-mode variant over a pre-loaded per-customer cache.
///
/// Selection and costing are identical to the per-customer path; a
/// customer absent from the cache simply has no eligible events.
pub fn select_from_cache(
    cache: &ReposicionCache,
    customer_id: Uuid,
    period_end: NaiveDate,
    tariff: &Tariff,
) -> ReposicionSelection {
    match cache.get(&customer_id) {
        Some(events) => select_eligible(events, period_end, tariff),
        None => ReposicionSelection::default(),
    }
}
