//! Batch billing demo entry point.

use std::sync::Arc;

use boleta_engine::batch::{BatchRequest, BatchRunner};
use boleta_engine::config::BillingConfig;
use boleta_engine::models::{BillingPeriod, BillingRunType};
use boleta_engine::seed::SeedData;

use chrono::{Datelike, Utc};
use service_core::observability::init_tracing;
use tokio::signal;
use tokio_util::sync::CancellationToken;

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, cancelling billing run");
}

fn parse_period(value: &str) -> Option<BillingPeriod> {
    let (year, month) = value.split_once('-')?;
    BillingPeriod::month(year.parse().ok()?, month.parse().ok()?)
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let config = BillingConfig::from_env().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    init_tracing(&config.core.service_name, &config.core.log_level);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting boleta-engine batch demo"
    );

    let seed_path = config.seed_path.clone().ok_or_else(|| {
        std::io::Error::other("APP__SEED_PATH must point to a JSON seed dataset")
    })?;

    let seed = SeedData::load(&seed_path)
        .map_err(|e| std::io::Error::other(format!("Failed to load seed {}: {}", seed_path, e)))?;
    let repo = Arc::new(seed.into_repository());

    let today = Utc::now().date_naive();
    let period = match config.billing_period.as_deref() {
        Some(raw) => parse_period(raw)
            .ok_or_else(|| std::io::Error::other(format!("Invalid billing period: {}", raw)))?,
        None => BillingPeriod::month(today.year(), today.month())
            .ok_or_else(|| std::io::Error::other("Failed to derive current billing period"))?,
    };

    let mut request = BatchRequest::new(period, today, BillingRunType::Manual);
    request.workers = config.batch_workers;

    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal_token.cancel();
    });

    let runner = BatchRunner::new(repo);
    let report = runner
        .run(&request, cancel)
        .await
        .map_err(|e| std::io::Error::other(format!("Billing run failed: {}", e)))?;

    tracing::info!(
        run_id = %report.run.run_id,
        status = %report.run.status,
        processed = report.run.customers_processed,
        succeeded = report.run.customers_succeeded,
        failed = report.run.customers_failed,
        skipped = report.run.customers_skipped,
        "Billing run report"
    );

    let summary = serde_json::to_string_pretty(&report.run)
        .map_err(|e| std::io::Error::other(format!("Failed to serialize report: {}", e)))?;
    println!("{}", summary);

    Ok(())
}
