//! Boleta assembly: Draft -> Computed -> Finalized.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use service_core::error::AppError;

use crate::engine::base_charge::base_charges;
use crate::engine::discount::discount_total;
use crate::engine::fine::split_pending;
use crate::engine::iva::iva_split;
use crate::engine::reposicion::select_eligible;
use crate::engine::subsidy::{resolve_subsidy, subsidy_amount_for_tariff, uses_new_formula};
use crate::error::ComputationError;
use crate::models::{
    BillingPeriod, Boleta, BoletaStatus, ChargeBreakdown, Fine, ReconnectionEvent, SubsidyType,
    Tariff,
};
use crate::repository::BillingRepository;

/// Days between issue and due date when the caller does not schedule one.
pub const DEFAULT_DUE_DAYS: i64 = 20;

/// Resolved inputs for one customer and period: the Draft state.
///
/// Everything needed to compute a breakdown without further reads, so a
/// computation can be re-run over a filtered candidate set when a claim
/// is lost to a concurrent run.
#[derive(Debug, Clone)]
pub struct BoletaInputs {
    pub customer_id: Uuid,
    pub period: BillingPeriod,
    pub consumption_m3: Decimal,
    pub tariff: Tariff,
    pub subsidy: SubsidyType,
    pub discount_amount: Decimal,
    pub fines: Vec<Fine>,
    pub reconnections: Vec<ReconnectionEvent>,
}

/// Caller-supplied finalization parameters.
///
/// Prior balance, other charges and restructuring amounts are resolved by
/// outside collaborators and carried into the boleta total untaxed.
#[derive(Debug, Clone)]
pub struct FinalizeOptions {
    pub issue_date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub prior_balance: Decimal,
    pub other_charges: Decimal,
    pub restructuring_amount: Decimal,
}

impl FinalizeOptions {
    pub fn for_issue(issue_date: NaiveDate) -> Self {
        Self {
            issue_date,
            due_date: None,
            prior_balance: Decimal::ZERO,
            other_charges: Decimal::ZERO,
            restructuring_amount: Decimal::ZERO,
        }
    }

    fn effective_due_date(&self) -> NaiveDate {
        self.due_date
            .unwrap_or(self.issue_date + chrono::Duration::days(DEFAULT_DUE_DAYS))
    }
}

/// Draft -> Computed: derive every monetary field from resolved inputs.
///
/// The stage order is mandatory and must not change: base charges,
/// discounts, reconnections and fines extending the taxable base, the
/// subsidy on the pre-fine consumption base, then the IVA split on the
/// fine-inclusive, subsidy-exclusive base. Reordering changes the taxable
/// base and produces incorrect amounts.
pub fn compute_breakdown(inputs: &BoletaInputs) -> ChargeBreakdown {
    let mut breakdown = base_charges(inputs.consumption_m3, &inputs.tariff);

    breakdown.discount_amount = inputs.discount_amount;

    let reposiciones = select_eligible(&inputs.reconnections, inputs.period.end, &inputs.tariff);
    let fines = split_pending(&inputs.fines);

    // Taxable base: post-fine, pre-subsidy.
    breakdown.gross_before_subsidy = breakdown.subtotal - breakdown.discount_amount
        + fines.taxable_total
        + reposiciones.taxable_total;
    breakdown.exempt_amount = fines.exempt_total + reposiciones.exempt_total;

    breakdown.subsidy_amount = subsidy_amount_for_tariff(
        inputs.subsidy,
        inputs.consumption_m3,
        &inputs.tariff,
        uses_new_formula(inputs.period.start),
    );
    breakdown.gross_after_subsidy =
        breakdown.gross_before_subsidy + breakdown.exempt_amount - breakdown.subsidy_amount;

    let split = iva_split(breakdown.gross_before_subsidy, inputs.tariff.tax_rate);
    breakdown.net_amount = split.net + breakdown.exempt_amount;
    breakdown.tax_amount = split.tax;

    breakdown.applied_fine_ids = fines.applied;
    breakdown.applied_reconnection_ids = reposiciones.selected_ids();

    breakdown
}

/// Charge-computation engine over an injected repository.
pub struct BillingEngine<R: BillingRepository> {
    repo: Arc<R>,
}

impl<R: BillingRepository> Clone for BillingEngine<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
        }
    }
}

impl<R: BillingRepository> BillingEngine<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Resolve the Draft inputs for one customer and period.
    #[instrument(skip(self), fields(customer_id = %customer_id, period = %period))]
    pub async fn resolve_inputs(
        &self,
        customer_id: Uuid,
        period: BillingPeriod,
    ) -> Result<BoletaInputs, ComputationError> {
        if !period.is_valid() {
            return Err(ComputationError::InvalidPeriod {
                start: period.start,
                end: period.end,
            });
        }

        let tariff = self
            .repo
            .effective_tariff(period.start)
            .await?
            .ok_or(ComputationError::NoEffectiveTariff {
                billing_date: period.start,
            })?;
        let reconnections = self.repo.pending_reconnections(customer_id).await?;

        self.resolve_inputs_with(customer_id, period, tariff, reconnections)
            .await
    }

    /// Draft resolution with the tariff and reconnection events already in
    /// hand, as a batch run provides them from its pre-fetched cache.
    pub async fn resolve_inputs_with(
        &self,
        customer_id: Uuid,
        period: BillingPeriod,
        tariff: Tariff,
        reconnections: Vec<ReconnectionEvent>,
    ) -> Result<BoletaInputs, ComputationError> {
        if !period.is_valid() {
            return Err(ComputationError::InvalidPeriod {
                start: period.start,
                end: period.end,
            });
        }

        let consumption_m3 = self
            .repo
            .metered_consumption(customer_id, &period)
            .await?
            .ok_or(ComputationError::NoMeterReading {
                customer_id,
                period_start: period.start,
            })?;

        let history = self.repo.subsidy_history(customer_id).await?;
        let subsidy = resolve_subsidy(&history, period.start);

        let allocations = self.repo.discount_allocations(customer_id).await?;
        let discount_amount = discount_total(&allocations, &period);

        let fines = self.repo.pending_fines(customer_id).await?;

        Ok(BoletaInputs {
            customer_id,
            period,
            consumption_m3,
            tariff,
            subsidy,
            discount_amount,
            fines,
            reconnections,
        })
    }

    /// Pure preview of the breakdown for one customer and period. Nothing
    /// is claimed or persisted.
    #[instrument(skip(self), fields(customer_id = %customer_id, period = %period))]
    pub async fn compute_boleta(
        &self,
        customer_id: Uuid,
        period: BillingPeriod,
    ) -> Result<ChargeBreakdown, ComputationError> {
        let inputs = self.resolve_inputs(customer_id, period).await?;
        Ok(compute_breakdown(&inputs))
    }

    /// Compute and finalize: claim the consumed fine/reconnection records
    /// and persist the boleta.
    #[instrument(skip(self, options), fields(customer_id = %customer_id, period = %period))]
    pub async fn finalize_boleta(
        &self,
        customer_id: Uuid,
        period: BillingPeriod,
        options: &FinalizeOptions,
    ) -> Result<Boleta, ComputationError> {
        let inputs = self.resolve_inputs(customer_id, period).await?;
        self.finalize_inputs(inputs, options).await
    }

    /// Computed -> Finalized over already-resolved inputs.
    ///
    /// Claims are conditional: a record lost to a concurrent run is
    /// excluded and the breakdown recomputed from the surviving set, so the
    /// boleta never double counts. If persistence fails after claiming, the
    /// claims are released and every source record stays billable.
    pub async fn finalize_inputs(
        &self,
        mut inputs: BoletaInputs,
        options: &FinalizeOptions,
    ) -> Result<Boleta, ComputationError> {
        let customer_id = inputs.customer_id;
        let period = inputs.period;

        if self.repo.boleta_exists(customer_id, period.start).await? {
            return Err(ComputationError::AlreadyBilled {
                customer_id,
                period_start: period.start,
            });
        }

        let mut breakdown = compute_breakdown(&inputs);
        let boleta_id = Uuid::new_v4();

        let mut claimed_fines = Vec::new();
        let mut claimed_events = Vec::new();
        let mut lost_any = false;

        for fine_id in &breakdown.applied_fine_ids {
            match self.repo.claim_fine(*fine_id, boleta_id).await {
                Ok(true) => claimed_fines.push(*fine_id),
                Ok(false) => {
                    warn!(
                        fine_id = %fine_id,
                        customer_id = %customer_id,
                        "Fine already consumed by another run; excluding from this boleta"
                    );
                    lost_any = true;
                }
                Err(e) => {
                    self.release_claims(boleta_id, &claimed_fines, &claimed_events)
                        .await;
                    return Err(e.into());
                }
            }
        }

        for event_id in &breakdown.applied_reconnection_ids {
            match self.repo.claim_reconnection(*event_id, boleta_id).await {
                Ok(true) => claimed_events.push(*event_id),
                Ok(false) => {
                    warn!(
                        event_id = %event_id,
                        customer_id = %customer_id,
                        "Reconnection already consumed by another run; excluding from this boleta"
                    );
                    lost_any = true;
                }
                Err(e) => {
                    self.release_claims(boleta_id, &claimed_fines, &claimed_events)
                        .await;
                    return Err(e.into());
                }
            }
        }

        if lost_any {
            inputs.fines.retain(|f| claimed_fines.contains(&f.fine_id));
            inputs
                .reconnections
                .retain(|e| claimed_events.contains(&e.event_id));
            breakdown = compute_breakdown(&inputs);
        }

        let folio = match self.repo.next_folio().await {
            Ok(folio) => folio,
            Err(e) => {
                self.release_claims(boleta_id, &claimed_fines, &claimed_events)
                    .await;
                return Err(e.into());
            }
        };

        let boleta = build_boleta(boleta_id, folio, &inputs, &breakdown, options);

        if let Err(e) = self.repo.insert_boleta(&boleta).await {
            self.release_claims(boleta_id, &claimed_fines, &claimed_events)
                .await;
            return Err(match e {
                AppError::Conflict(_) => ComputationError::AlreadyBilled {
                    customer_id,
                    period_start: period.start,
                },
                other => other.into(),
            });
        }

        info!(
            boleta_id = %boleta.boleta_id,
            folio = boleta.folio,
            customer_id = %customer_id,
            total_amount = %boleta.total_amount,
            "Boleta finalized"
        );

        Ok(boleta)
    }

    /// Best-effort rollback of conditional claims held by a boleta that
    /// will not be persisted.
    async fn release_claims(&self, boleta_id: Uuid, fine_ids: &[Uuid], event_ids: &[Uuid]) {
        for fine_id in fine_ids {
            if let Err(e) = self.repo.release_fine_claim(*fine_id, boleta_id).await {
                tracing::error!(fine_id = %fine_id, error = %e, "Failed to release fine claim");
            }
        }
        for event_id in event_ids {
            if let Err(e) = self
                .repo
                .release_reconnection_claim(*event_id, boleta_id)
                .await
            {
                tracing::error!(event_id = %event_id, error = %e, "Failed to release reconnection claim");
            }
        }
    }
}

fn build_boleta(
    boleta_id: Uuid,
    folio: i64,
    inputs: &BoletaInputs,
    breakdown: &ChargeBreakdown,
    options: &FinalizeOptions,
) -> Boleta {
    let total_amount = breakdown.gross_after_subsidy
        + options.prior_balance
        + options.other_charges
        + options.restructuring_amount;

    Boleta {
        boleta_id,
        customer_id: inputs.customer_id,
        folio,
        period_start: inputs.period.start,
        period_end: inputs.period.end,
        issue_date: options.issue_date,
        due_date: options.effective_due_date(),
        consumption_m3: inputs.consumption_m3,
        fixed_charge: breakdown.fixed_charge,
        water_charge: breakdown.water_charge,
        sewage_charge: breakdown.sewage_charge,
        treatment_charge: breakdown.treatment_charge,
        subtotal: breakdown.subtotal,
        discount_amount: breakdown.discount_amount,
        subsidy_amount: breakdown.subsidy_amount,
        gross_before_subsidy: breakdown.gross_before_subsidy,
        gross_after_subsidy: breakdown.gross_after_subsidy,
        net_amount: breakdown.net_amount,
        tax_amount: breakdown.tax_amount,
        exempt_amount: breakdown.exempt_amount,
        prior_balance: options.prior_balance,
        other_charges: options.other_charges,
        restructuring_amount: options.restructuring_amount,
        total_amount,
        status: BoletaStatus::Issued.as_str().to_string(),
        created_utc: Utc::now(),
    }
}
