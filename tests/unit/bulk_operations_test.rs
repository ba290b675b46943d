// Bulk edit, bulk status update, and bulk delete are item-isolated: each
// record is processed independently and failures never abort the batch.

#[path = "../helpers/mod.rs"]
mod helpers;

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal_macros::dec;

use helpers::InMemoryStore;
use tatame::modules::fees::models::{EditFeeFields, FeeFilters, FeeStatus};
use tatame::modules::fees::services::FeeService;
use tatame::modules::payments::models::PaymentEvent;
use tatame::modules::payments::repositories::PaymentRepository;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seeded_store(count: u32) -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    for i in 0..count {
        store.seed_fee(1, 1 + i, 2025, date(2025, 1 + i, 10), dec!(180));
    }
    store
}

#[tokio::test]
async fn bulk_edit_counts_failures_without_aborting() {
    let store = seeded_store(3);
    let service = FeeService::new(store.clone());

    // Id 99 does not exist; the other two succeed.
    let fields = EditFeeFields {
        discount_amount: Some(dec!(30)),
        ..Default::default()
    };
    let outcome = service.bulk_edit(&[1, 99, 2], fields).await.unwrap();

    assert_eq!(outcome.processed, 2);
    assert_eq!(outcome.errors, 1);
    assert_eq!(outcome.total(), 3);
    assert_eq!(store.fee(1).unwrap().total_amount, dec!(150));
    assert_eq!(store.fee(2).unwrap().total_amount, dec!(150));
    assert_eq!(store.fee(3).unwrap().total_amount, dec!(180));
}

#[tokio::test]
async fn bulk_edit_validation_failure_leaves_record_untouched() {
    let store = seeded_store(2);
    let service = FeeService::new(store.clone());

    let fields = EditFeeFields {
        discount_amount: Some(dec!(500)),
        ..Default::default()
    };
    let outcome = service.bulk_edit(&[1, 2], fields).await.unwrap();

    assert_eq!(outcome.processed, 0);
    assert_eq!(outcome.errors, 2);
    assert_eq!(store.fee(1).unwrap().discount_amount, dec!(0));
}

#[tokio::test]
async fn bulk_status_update_does_not_touch_amounts() {
    let store = seeded_store(3);
    let service = FeeService::new(store.clone());

    let outcome = service
        .bulk_update_status(&[1, 2, 99], FeeStatus::Cancelled)
        .await
        .unwrap();

    assert_eq!(outcome.processed, 2);
    assert_eq!(outcome.errors, 1);
    assert_eq!(store.fee(1).unwrap().status, FeeStatus::Cancelled);
    assert_eq!(store.fee(1).unwrap().total_amount, dec!(180));
    assert_eq!(store.fee(3).unwrap().status, FeeStatus::Pending);
}

#[tokio::test]
async fn bulk_delete_removes_payment_events_with_the_record() {
    let store = seeded_store(2);
    let event = PaymentEvent {
        id: 0,
        fee_record_id: 1,
        amount_paid: dec!(180),
        payment_date: date(2025, 1, 5),
        installment_count: 1,
        notes: None,
        created_at: Utc::now(),
    };
    store.insert_settling(&event, true).await.unwrap();
    assert_eq!(store.payment_count(), 1);

    let service = FeeService::new(store.clone());
    let outcome = service.bulk_delete(&[1, 99]).await.unwrap();

    assert_eq!(outcome.processed, 1);
    assert_eq!(outcome.errors, 1);
    assert!(store.fee(1).is_none());
    assert_eq!(store.payment_count(), 0);
}

#[tokio::test]
async fn list_filters_and_paginates() {
    let store = seeded_store(5);
    store
        .fees
        .lock()
        .unwrap()
        .get_mut(&3)
        .unwrap()
        .status = FeeStatus::Paid;

    let service = FeeService::new(store);

    let filters = FeeFilters {
        status: Some(FeeStatus::Pending),
        ..Default::default()
    };
    let page = service.list(filters).await.unwrap();
    assert_eq!(page.items.len(), 4);
    assert_eq!(page.pagination.total, 4);

    let filters = FeeFilters {
        page: Some(2),
        limit: Some(2),
        ..Default::default()
    };
    let page = service.list(filters).await.unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.pagination.total, 5);
    assert_eq!(page.pagination.total_pages, 3);
    // Ordered by due date ascending, so page 2 holds March and April.
    assert_eq!(page.items[0].reference_month, 3);
    assert_eq!(page.items[1].reference_month, 4);
}

#[tokio::test]
async fn open_listing_excludes_paid_and_cancelled() {
    let store = seeded_store(4);
    {
        let mut fees = store.fees.lock().unwrap();
        fees.get_mut(&1).unwrap().status = FeeStatus::Paid;
        fees.get_mut(&2).unwrap().status = FeeStatus::Cancelled;
        fees.get_mut(&3).unwrap().status = FeeStatus::Overdue;
    }

    let service = FeeService::new(store);
    let page = service.list_open(FeeFilters::default()).await.unwrap();

    let statuses: Vec<FeeStatus> = page.items.iter().map(|r| r.status).collect();
    assert_eq!(statuses, vec![FeeStatus::Overdue, FeeStatus::Pending]);
}
