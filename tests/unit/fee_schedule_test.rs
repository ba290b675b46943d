// Multi-month fee creation: period rollover, duplicate handling, and the
// overdue sweep.

#[path = "../helpers/mod.rs"]
mod helpers;

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use helpers::InMemoryStore;
use tatame::modules::fees::models::{CreateFeeRequest, FeeStatus};
use tatame::modules::fees::services::{FeeService, OverdueChecker};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn request(month: u32, year: i32, month_count: u32) -> CreateFeeRequest {
    CreateFeeRequest {
        student_id: 1,
        plan_id: None,
        base_amount: dec!(200),
        discount_amount: dec!(20),
        surcharge_amount: Decimal::ZERO,
        reference_month: month,
        reference_year: year,
        due_date: date(year, month, 10),
        month_count,
        allow_duplicates: true,
        notes: None,
    }
}

#[tokio::test]
async fn multi_month_run_rolls_over_the_year() {
    let store = Arc::new(InMemoryStore::new());
    let service = FeeService::new(store.clone());

    let outcome = service.create(request(11, 2024, 3)).await.unwrap();

    assert_eq!(outcome.created.len(), 3);
    assert_eq!(outcome.duplicates, 0);

    let periods: Vec<(u32, i32)> = outcome
        .created
        .iter()
        .map(|r| (r.reference_month, r.reference_year))
        .collect();
    assert_eq!(periods, vec![(11, 2024), (12, 2024), (1, 2025)]);

    // Due date advances by calendar month alongside the reference period.
    assert_eq!(outcome.created[2].due_date, date(2025, 1, 10));

    for record in &outcome.created {
        assert_eq!(record.status, FeeStatus::Pending);
        assert_eq!(record.total_amount, dec!(180));
    }
}

#[tokio::test]
async fn duplicates_are_counted_but_still_created_by_default() {
    let store = Arc::new(InMemoryStore::new());
    store.seed_fee(1, 12, 2024, date(2024, 12, 10), dec!(180));

    let service = FeeService::new(store.clone());
    let outcome = service.create(request(11, 2024, 3)).await.unwrap();

    assert_eq!(outcome.created.len(), 3);
    assert_eq!(outcome.duplicates, 1);
    assert_eq!(store.fees.lock().unwrap().len(), 4);
}

#[tokio::test]
async fn duplicates_are_skipped_when_opted_out() {
    let store = Arc::new(InMemoryStore::new());
    store.seed_fee(1, 12, 2024, date(2024, 12, 10), dec!(180));

    let service = FeeService::new(store.clone());
    let mut request = request(11, 2024, 3);
    request.allow_duplicates = false;

    let outcome = service.create(request).await.unwrap();

    assert_eq!(outcome.created.len(), 2);
    assert_eq!(outcome.duplicates, 1);
    let periods: Vec<(u32, i32)> = outcome
        .created
        .iter()
        .map(|r| (r.reference_month, r.reference_year))
        .collect();
    assert_eq!(periods, vec![(11, 2024), (1, 2025)]);
}

#[tokio::test]
async fn duplicate_detection_is_per_student() {
    let store = Arc::new(InMemoryStore::new());
    // Same period, different student.
    store.seed_fee(2, 11, 2024, date(2024, 11, 10), dec!(180));

    let service = FeeService::new(store);
    let outcome = service.create(request(11, 2024, 1)).await.unwrap();

    assert_eq!(outcome.created.len(), 1);
    assert_eq!(outcome.duplicates, 0);
}

#[tokio::test]
async fn invalid_request_creates_nothing() {
    let store = Arc::new(InMemoryStore::new());
    let service = FeeService::new(store.clone());

    let mut bad_amounts = request(11, 2024, 3);
    bad_amounts.discount_amount = dec!(500);
    assert!(service.create(bad_amounts).await.is_err());

    let mut bad_month = request(12, 2024, 1);
    bad_month.reference_month = 13;
    assert!(service.create(bad_month).await.is_err());

    let bad_count = request(11, 2024, 25);
    assert!(service.create(bad_count).await.is_err());

    assert!(store.fees.lock().unwrap().is_empty());
}

#[tokio::test]
async fn failed_multi_month_insert_persists_nothing() {
    let store = Arc::new(InMemoryStore::new());
    // The second of three inserts fails: the whole run must roll back.
    *store.fail_insert_at.lock().unwrap() = Some(1);

    let service = FeeService::new(store.clone());
    let result = service.create(request(11, 2024, 3)).await;

    assert!(result.is_err());
    assert!(store.fees.lock().unwrap().is_empty());
}

#[tokio::test]
async fn overdue_sweep_transitions_only_pending_past_due() {
    let store = Arc::new(InMemoryStore::new());
    let yesterday = chrono::Utc::now().date_naive() - chrono::Duration::days(1);
    let tomorrow = chrono::Utc::now().date_naive() + chrono::Duration::days(1);

    let past_due = store.seed_fee(1, 10, 2024, yesterday, dec!(180));
    let not_due = store.seed_fee(1, 11, 2024, tomorrow, dec!(180));
    let paid = store.seed_fee(1, 9, 2024, yesterday, dec!(180));
    store
        .fees
        .lock()
        .unwrap()
        .get_mut(&paid.id)
        .unwrap()
        .status = FeeStatus::Paid;

    let checker = OverdueChecker::new(store.clone(), Duration::from_secs(3600));
    let marked = checker.check_once().await.unwrap();

    assert_eq!(marked, 1);
    assert_eq!(store.fee(past_due.id).unwrap().status, FeeStatus::Overdue);
    assert_eq!(store.fee(not_due.id).unwrap().status, FeeStatus::Pending);
    assert_eq!(store.fee(paid.id).unwrap().status, FeeStatus::Paid);
}
