//! Multi-customer batch billing runs.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use futures::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use service_core::error::AppError;

use crate::engine::{BillingEngine, FinalizeOptions};
use crate::error::ComputationError;
use crate::models::{
    BillingPeriod, BillingRun, BillingRunOutcome, BillingRunStatus, BillingRunType, Tariff,
};
use crate::repository::BillingRepository;

/// How many customers to process concurrently when unspecified.
pub const DEFAULT_WORKERS: usize = 4;

/// Parameters for one batch run.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub period: BillingPeriod,
    pub issue_date: NaiveDate,
    pub run_type: BillingRunType,
    pub workers: usize,
}

impl BatchRequest {
    pub fn new(period: BillingPeriod, issue_date: NaiveDate, run_type: BillingRunType) -> Self {
        Self {
            period,
            issue_date,
            run_type,
            workers: DEFAULT_WORKERS,
        }
    }
}

/// Read-only data fetched once per run and shared across workers.
#[derive(Debug)]
pub struct BatchContext {
    pub tariff: Tariff,
    pub reconnections: crate::engine::ReposicionCache,
}

/// Result of a batch run: the run record plus per-customer outcomes.
#[derive(Debug)]
pub struct BatchReport {
    pub run: BillingRun,
    pub outcomes: Vec<BillingRunOutcome>,
}

/// Drives billing for every customer due in a period.
///
/// Customers are independent and processed with bounded concurrency;
/// cancellation is honored between customers, never mid-customer, so a
/// cancelled run leaves already-finalized boletas intact.
pub struct BatchRunner<R: BillingRepository> {
    engine: BillingEngine<R>,
    repo: Arc<R>,
}

impl<R: BillingRepository> BatchRunner<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            engine: BillingEngine::new(Arc::clone(&repo)),
            repo,
        }
    }

    /// Resolve the run-wide context: the period's tariff and the pending
    /// reconnection cache.
    async fn build_context(&self, period: &BillingPeriod) -> Result<BatchContext, AppError> {
        let tariff = self
            .repo
            .effective_tariff(period.start)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(anyhow::anyhow!(
                    "No effective tariff for billing date {}",
                    period.start
                ))
            })?;

        let reconnections = self.repo.pending_reconnections_by_customer().await?;

        Ok(BatchContext {
            tariff,
            reconnections,
        })
    }

    #[instrument(skip(self, request, cancel), fields(period = %request.period, run_type = request.run_type.as_str()))]
    pub async fn run(
        &self,
        request: &BatchRequest,
        cancel: CancellationToken,
    ) -> Result<BatchReport, AppError> {
        let run_id = Uuid::new_v4();
        let started_utc = Utc::now();

        info!(run_id = %run_id, "Starting billing run");

        let context = Arc::new(self.build_context(&request.period).await?);
        let customers = self.repo.customers_due(&request.period).await?;
        let total = customers.len();

        info!(run_id = %run_id, customers = total, "Billing run scope resolved");

        let options = FinalizeOptions::for_issue(request.issue_date);

        let mut outcomes = Vec::with_capacity(total);
        let mut succeeded = 0;
        let mut failed = 0;
        let mut skipped = 0;
        let mut processed = 0;

        let mut stream = futures::stream::iter(customers.into_iter().map(|customer_id| {
            let context = Arc::clone(&context);
            let options = options.clone();
            let cancel = cancel.clone();
            async move {
                if cancel.is_cancelled() {
                    return BillingRunOutcome::skipped(
                        run_id,
                        customer_id,
                        "Run cancelled".to_string(),
                    );
                }
                self.process_customer(run_id, customer_id, request.period, &context, &options)
                    .await
            }
        }))
        .buffer_unordered(request.workers.max(1));

        while let Some(outcome) = stream.next().await {
            processed += 1;
            match outcome.status.as_str() {
                "finalized" => succeeded += 1,
                "skipped" => skipped += 1,
                _ => failed += 1,
            }
            outcomes.push(outcome);

            if processed % 100 == 0 {
                info!(
                    run_id = %run_id,
                    processed = processed,
                    succeeded = succeeded,
                    failed = failed,
                    "Billing run progress"
                );
            }
        }

        let status = if cancel.is_cancelled() {
            BillingRunStatus::Cancelled
        } else {
            BillingRunStatus::Completed
        };

        info!(
            run_id = %run_id,
            status = status.as_str(),
            processed = processed,
            succeeded = succeeded,
            failed = failed,
            skipped = skipped,
            "Billing run finished"
        );

        Ok(BatchReport {
            run: BillingRun {
                run_id,
                run_type: request.run_type.as_str().to_string(),
                status: status.as_str().to_string(),
                period_start: request.period.start,
                period_end: request.period.end,
                started_utc,
                completed_utc: Some(Utc::now()),
                customers_processed: processed,
                customers_succeeded: succeeded,
                customers_failed: failed,
                customers_skipped: skipped,
            },
            outcomes,
        })
    }

    async fn process_customer(
        &self,
        run_id: Uuid,
        customer_id: Uuid,
        period: BillingPeriod,
        context: &BatchContext,
        options: &FinalizeOptions,
    ) -> BillingRunOutcome {
        let reconnections = context
            .reconnections
            .get(&customer_id)
            .cloned()
            .unwrap_or_default();

        let inputs = match self
            .engine
            .resolve_inputs_with(customer_id, period, context.tariff.clone(), reconnections)
            .await
        {
            Ok(inputs) => inputs,
            Err(e) => {
                warn!(customer_id = %customer_id, error = %e, "Customer billing failed at resolution");
                return BillingRunOutcome::failed(run_id, customer_id, e.to_string());
            }
        };

        match self.engine.finalize_inputs(inputs, options).await {
            Ok(boleta) => {
                BillingRunOutcome::finalized(run_id, customer_id, boleta.boleta_id, boleta.folio)
            }
            Err(ComputationError::AlreadyBilled { .. }) => BillingRunOutcome::skipped(
                run_id,
                customer_id,
                "Boleta already issued for this period".to_string(),
            ),
            Err(e) => {
                warn!(customer_id = %customer_id, error = %e, "Customer billing failed at finalization");
                BillingRunOutcome::failed(run_id, customer_id, e.to_string())
            }
        }
    }
}
