//! Batch billing run tests.

mod common;

use std::sync::Arc;

use boleta_engine::batch::{BatchRequest, BatchRunner};
use boleta_engine::engine::FinalizeOptions;
use boleta_engine::models::{BillingRunType, SubsidyChangeKind, SubsidyType};
use common::{date, fine, legacy_period, reconnection, separate_tariff, subsidy_assignment, TestContext};
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn run_finalizes_every_customer_due() {
    let ctx = TestContext::with_tariff(separate_tariff());
    let period = legacy_period();

    let customers: Vec<_> = (0..3)
        .map(|_| ctx.customer_with_consumption(period, 12))
        .collect();
    ctx.repo.add_subsidy_assignment(subsidy_assignment(
        customers[0],
        SubsidyType::Half,
        SubsidyChangeKind::Granted,
        date(2020, 1, 1),
    ));
    ctx.repo
        .add_reconnection(reconnection(customers[1], Some(1), true, date(2022, 6, 5)));
    ctx.repo.add_fine(fine(customers[2], 800, true));

    let runner = BatchRunner::new(Arc::clone(&ctx.repo));
    let request = BatchRequest::new(period, date(2022, 7, 1), BillingRunType::Scheduled);

    let report = runner
        .run(&request, CancellationToken::new())
        .await
        .expect("run should complete");

    assert_eq!(report.run.status, "completed");
    assert_eq!(report.run.customers_processed, 3);
    assert_eq!(report.run.customers_succeeded, 3);
    assert_eq!(report.run.customers_failed, 0);
    assert_eq!(ctx.repo.boleta_count(), 3);

    // Folios are drawn from one sequence, never reused.
    let mut folios: Vec<_> = report.outcomes.iter().filter_map(|o| o.folio).collect();
    folios.sort_unstable();
    assert_eq!(folios, vec![1, 2, 3]);
}

#[tokio::test]
async fn batch_amounts_match_the_single_customer_preview() {
    let ctx = TestContext::with_tariff(separate_tariff());
    let period = legacy_period();
    let customer_id = ctx.customer_with_consumption(period, 18);

    ctx.repo.add_subsidy_assignment(subsidy_assignment(
        customer_id,
        SubsidyType::Full,
        SubsidyChangeKind::Granted,
        date(2020, 1, 1),
    ));
    ctx.repo
        .add_reconnection(reconnection(customer_id, Some(2), true, date(2022, 6, 3)));

    let preview = ctx
        .engine
        .compute_boleta(customer_id, period)
        .await
        .expect("preview should succeed");

    let runner = BatchRunner::new(Arc::clone(&ctx.repo));
    let request = BatchRequest::new(period, date(2022, 7, 1), BillingRunType::Scheduled);
    runner
        .run(&request, CancellationToken::new())
        .await
        .expect("run should complete");

    let boleta = ctx
        .repo
        .boleta(customer_id, period.start)
        .expect("boleta should be stored");
    assert_eq!(boleta.subtotal, preview.subtotal);
    assert_eq!(boleta.gross_before_subsidy, preview.gross_before_subsidy);
    assert_eq!(boleta.subsidy_amount, preview.subsidy_amount);
    assert_eq!(boleta.net_amount, preview.net_amount);
    assert_eq!(boleta.tax_amount, preview.tax_amount);
}

#[tokio::test]
async fn already_billed_customers_are_skipped_not_failed() {
    let ctx = TestContext::with_tariff(separate_tariff());
    let period = legacy_period();
    let billed = ctx.customer_with_consumption(period, 10);
    let due = ctx.customer_with_consumption(period, 10);

    ctx.engine
        .finalize_boleta(billed, period, &FinalizeOptions::for_issue(date(2022, 7, 1)))
        .await
        .expect("manual finalization should succeed");

    let runner = BatchRunner::new(Arc::clone(&ctx.repo));
    let request = BatchRequest::new(period, date(2022, 7, 1), BillingRunType::Manual);
    let report = runner
        .run(&request, CancellationToken::new())
        .await
        .expect("run should complete");

    assert_eq!(report.run.customers_processed, 2);
    assert_eq!(report.run.customers_succeeded, 1);
    assert_eq!(report.run.customers_skipped, 1);
    assert_eq!(report.run.customers_failed, 0);

    let skipped = report
        .outcomes
        .iter()
        .find(|o| o.customer_id == billed)
        .expect("outcome for the billed customer");
    assert_eq!(skipped.status, "skipped");
    let finalized = report
        .outcomes
        .iter()
        .find(|o| o.customer_id == due)
        .expect("outcome for the due customer");
    assert_eq!(finalized.status, "finalized");
}

#[tokio::test]
async fn cancellation_stops_before_any_further_customer() {
    let ctx = TestContext::with_tariff(separate_tariff());
    let period = legacy_period();
    for _ in 0..5 {
        ctx.customer_with_consumption(period, 10);
    }

    let cancel = CancellationToken::new();
    cancel.cancel();

    let runner = BatchRunner::new(Arc::clone(&ctx.repo));
    let request = BatchRequest::new(period, date(2022, 7, 1), BillingRunType::Scheduled);
    let report = runner
        .run(&request, cancel)
        .await
        .expect("a cancelled run still reports");

    assert_eq!(report.run.status, "cancelled");
    assert_eq!(report.run.customers_succeeded, 0);
    assert_eq!(ctx.repo.boleta_count(), 0);
    assert!(report
        .outcomes
        .iter()
        .all(|o| o.status == "skipped"));
}

#[tokio::test]
async fn cancelled_run_leaves_finalized_boletas_intact() {
    let ctx = TestContext::with_tariff(separate_tariff());
    let period = legacy_period();
    let customer_id = ctx.customer_with_consumption(period, 10);

    let runner = BatchRunner::new(Arc::clone(&ctx.repo));
    let request = BatchRequest::new(period, date(2022, 7, 1), BillingRunType::Scheduled);
    runner
        .run(&request, CancellationToken::new())
        .await
        .expect("run should complete");
    assert_eq!(ctx.repo.boleta_count(), 1);

    // A later cancelled run does not disturb what is already billed.
    let cancel = CancellationToken::new();
    cancel.cancel();
    runner.run(&request, cancel).await.expect("cancelled run");

    assert!(ctx.repo.boleta(customer_id, period.start).is_some());
    assert_eq!(ctx.repo.boleta_count(), 1);
}
