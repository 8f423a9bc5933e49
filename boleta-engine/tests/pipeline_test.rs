//! End-to-end charge pipeline tests over the in-memory repository.

mod common;

use boleta_engine::models::{SubsidyChangeKind, SubsidyType};
use common::{
    combined_tariff, d, date, discount, fine, legacy_period, separate_tariff, subsidy_assignment,
    TestContext,
};
use rust_decimal::Decimal;

#[tokio::test]
async fn full_breakdown_with_subsidy_fine_and_discount() {
    let ctx = TestContext::with_tariff(separate_tariff());
    let period = legacy_period();
    let customer_id = ctx.customer_with_consumption(period, 10);

    ctx.repo.add_subsidy_assignment(subsidy_assignment(
        customer_id,
        SubsidyType::Half,
        SubsidyChangeKind::Granted,
        date(2020, 1, 1),
    ));
    ctx.repo
        .add_discount(discount(customer_id, 1000, date(2022, 1, 1), None));
    ctx.repo.add_fine(fine(customer_id, 1000, true));
    ctx.repo.add_fine(fine(customer_id, 500, false));

    let breakdown = ctx
        .engine
        .compute_boleta(customer_id, period)
        .await
        .expect("computation should succeed");

    assert_eq!(breakdown.subtotal, d(11000));
    assert_eq!(breakdown.discount_amount, d(1000));

    // Taxable base: post-fine, pre-subsidy.
    assert_eq!(breakdown.gross_before_subsidy, d(11000));
    assert_eq!(breakdown.exempt_amount, d(500));
    assert_eq!(breakdown.subsidy_amount, d(5500));
    assert_eq!(breakdown.gross_after_subsidy, d(6000));

    // 11000 / 1.19 rounds to 9244; the tax is the residual.
    assert_eq!(breakdown.net_amount, d(9244) + d(500));
    assert_eq!(breakdown.tax_amount, d(1756));
    assert_eq!(
        breakdown.net_amount + breakdown.tax_amount - breakdown.subsidy_amount,
        breakdown.gross_after_subsidy
    );

    assert_eq!(breakdown.applied_fine_ids.len(), 2);
}

#[tokio::test]
async fn subsidy_base_excludes_fines_while_tax_base_includes_them() {
    let period = legacy_period();

    let without_fine = TestContext::with_tariff(separate_tariff());
    let customer_a = without_fine.customer_with_consumption(period, 10);
    without_fine.repo.add_subsidy_assignment(subsidy_assignment(
        customer_a,
        SubsidyType::Half,
        SubsidyChangeKind::Granted,
        date(2020, 1, 1),
    ));

    let with_fine = TestContext::with_tariff(separate_tariff());
    let customer_b = with_fine.customer_with_consumption(period, 10);
    with_fine.repo.add_subsidy_assignment(subsidy_assignment(
        customer_b,
        SubsidyType::Half,
        SubsidyChangeKind::Granted,
        date(2020, 1, 1),
    ));
    with_fine.repo.add_fine(fine(customer_b, 2380, true));

    let base = without_fine
        .engine
        .compute_boleta(customer_a, period)
        .await
        .expect("computation should succeed");
    let fined = with_fine
        .engine
        .compute_boleta(customer_b, period)
        .await
        .expect("computation should succeed");

    // The fine extends the taxable base but never the subsidy.
    assert_eq!(fined.subsidy_amount, base.subsidy_amount);
    assert_eq!(
        fined.gross_before_subsidy,
        base.gross_before_subsidy + d(2380)
    );
    assert!(fined.tax_amount > base.tax_amount);
}

#[tokio::test]
async fn combined_tariff_flows_through_the_whole_pipeline() {
    let ctx = TestContext::with_tariff(combined_tariff());
    let period = legacy_period();
    let customer_id = ctx.customer_with_consumption(period, 10);

    ctx.repo.add_subsidy_assignment(subsidy_assignment(
        customer_id,
        SubsidyType::Full,
        SubsidyChangeKind::Granted,
        date(2020, 1, 1),
    ));

    let breakdown = ctx
        .engine
        .compute_boleta(customer_id, period)
        .await
        .expect("computation should succeed");

    assert_eq!(breakdown.sewage_charge, d(4000));
    assert_eq!(breakdown.treatment_charge, Decimal::ZERO);
    assert_eq!(breakdown.subtotal, d(11000));
    // Scenario D: the combined rate must not double subsidize.
    assert_eq!(breakdown.subsidy_amount, d(11000));
}

#[tokio::test]
async fn preview_consumes_nothing() {
    let ctx = TestContext::with_tariff(separate_tariff());
    let period = legacy_period();
    let customer_id = ctx.customer_with_consumption(period, 10);

    let pending_fine = fine(customer_id, 1000, true);
    let fine_id = pending_fine.fine_id;
    ctx.repo.add_fine(pending_fine);

    ctx.engine
        .compute_boleta(customer_id, period)
        .await
        .expect("computation should succeed");

    let stored = ctx.repo.fine(fine_id).expect("fine should exist");
    assert!(
        stored.is_pending(),
        "a pure preview must not consume the fine"
    );
    assert_eq!(ctx.repo.boleta_count(), 0);
}
