// Payment recording and the settlement rule: a payment covering the total
// settles the record; partials are stored without a transition unless the
// settle-on-partial policy is enabled.

#[path = "../helpers/mod.rs"]
mod helpers;

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use helpers::InMemoryStore;
use tatame::core::AppError;
use tatame::modules::fees::models::FeeStatus;
use tatame::modules::payments::models::RecordPaymentRequest;
use tatame::modules::payments::services::PaymentService;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn payment(amount: Decimal) -> RecordPaymentRequest {
    RecordPaymentRequest {
        amount_paid: amount,
        payment_date: date(2024, 11, 8),
        installment_count: 1,
        notes: None,
    }
}

fn service(store: &Arc<InMemoryStore>, settle_on_partial: bool) -> PaymentService {
    PaymentService::new(store.clone(), store.clone(), settle_on_partial)
}

#[tokio::test]
async fn full_payment_settles_the_record() {
    let store = Arc::new(InMemoryStore::new());
    let fee = store.seed_fee(1, 11, 2024, date(2024, 11, 10), dec!(180));

    let event = service(&store, false)
        .record(fee.id, payment(dec!(180)))
        .await
        .unwrap();

    assert_eq!(event.fee_record_id, fee.id);
    assert_eq!(store.fee(fee.id).unwrap().status, FeeStatus::Paid);
    assert_eq!(store.payment_count(), 1);
}

#[tokio::test]
async fn overpayment_settles_the_record() {
    let store = Arc::new(InMemoryStore::new());
    let fee = store.seed_fee(1, 11, 2024, date(2024, 11, 10), dec!(180));

    service(&store, false)
        .record(fee.id, payment(dec!(200)))
        .await
        .unwrap();

    assert_eq!(store.fee(fee.id).unwrap().status, FeeStatus::Paid);
}

#[tokio::test]
async fn partial_payment_is_recorded_without_settling() {
    let store = Arc::new(InMemoryStore::new());
    let fee = store.seed_fee(1, 11, 2024, date(2024, 11, 10), dec!(180));

    let event = service(&store, false)
        .record(fee.id, payment(dec!(90)))
        .await
        .unwrap();

    assert_eq!(event.amount_paid, dec!(90));
    assert_eq!(store.fee(fee.id).unwrap().status, FeeStatus::Pending);
    assert_eq!(store.payment_count(), 1);
}

#[tokio::test]
async fn partial_payment_settles_under_policy() {
    let store = Arc::new(InMemoryStore::new());
    let fee = store.seed_fee(1, 11, 2024, date(2024, 11, 10), dec!(180));

    service(&store, true)
        .record(fee.id, payment(dec!(90)))
        .await
        .unwrap();

    assert_eq!(store.fee(fee.id).unwrap().status, FeeStatus::Paid);
}

#[tokio::test]
async fn unknown_fee_record_is_not_found() {
    let store = Arc::new(InMemoryStore::new());

    let result = service(&store, false).record(42, payment(dec!(180))).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert_eq!(store.payment_count(), 0);
}

#[tokio::test]
async fn invalid_payment_is_rejected_before_lookup() {
    let store = Arc::new(InMemoryStore::new());
    let fee = store.seed_fee(1, 11, 2024, date(2024, 11, 10), dec!(180));
    let svc = service(&store, false);

    assert!(matches!(
        svc.record(fee.id, payment(Decimal::ZERO)).await,
        Err(AppError::Validation(_))
    ));

    let mut zero_installments = payment(dec!(180));
    zero_installments.installment_count = 0;
    assert!(svc.record(fee.id, zero_installments).await.is_err());

    assert_eq!(store.payment_count(), 0);
    assert_eq!(store.fee(fee.id).unwrap().status, FeeStatus::Pending);
}

#[tokio::test]
async fn payment_history_is_ordered_by_date() {
    let store = Arc::new(InMemoryStore::new());
    let fee = store.seed_fee(1, 11, 2024, date(2024, 11, 10), dec!(180));
    let svc = service(&store, false);

    let mut late = payment(dec!(90));
    late.payment_date = date(2024, 11, 9);
    svc.record(fee.id, late).await.unwrap();

    let mut early = payment(dec!(90));
    early.payment_date = date(2024, 11, 1);
    svc.record(fee.id, early).await.unwrap();

    let history = svc.list_for_fee(fee.id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].payment_date, date(2024, 11, 1));
    assert_eq!(history[1].payment_date, date(2024, 11, 9));
}

#[tokio::test]
async fn history_for_unknown_fee_is_not_found() {
    let store = Arc::new(InMemoryStore::new());
    let result = service(&store, false).list_for_fee(42).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}
