// MySQL persistence for payment events.
//
// Inserting the event and settling the owning fee record happen inside one
// database transaction: a payment must never be recorded without the fee
// status update it implies, or vice versa.

use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::core::Result;
use crate::modules::payments::models::PaymentEvent;

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Insert a payment event; when `settle` is set, mark the owning fee
    /// record paid in the same transaction.
    async fn insert_settling(&self, event: &PaymentEvent, settle: bool) -> Result<PaymentEvent>;

    /// Settlement history for a fee record, oldest first.
    async fn list_for_fee(&self, fee_record_id: i64) -> Result<Vec<PaymentEvent>>;
}

pub struct MySqlPaymentRepository {
    pool: MySqlPool,
}

impl MySqlPaymentRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentRepository for MySqlPaymentRepository {
    async fn insert_settling(&self, event: &PaymentEvent, settle: bool) -> Result<PaymentEvent> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO payment_events (
                fee_record_id, amount_paid, payment_date, installment_count,
                notes, created_at
            ) VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(event.fee_record_id)
        .bind(event.amount_paid)
        .bind(event.payment_date)
        .bind(event.installment_count)
        .bind(&event.notes)
        .bind(event.created_at)
        .execute(&mut *tx)
        .await?;

        if settle {
            sqlx::query("UPDATE fee_records SET status = 'paid', updated_at = NOW() WHERE id = ?")
                .bind(event.fee_record_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        let mut created = event.clone();
        created.id = result.last_insert_id() as i64;
        Ok(created)
    }

    async fn list_for_fee(&self, fee_record_id: i64) -> Result<Vec<PaymentEvent>> {
        let events = sqlx::query_as::<_, PaymentEvent>(
            r#"
            SELECT id, fee_record_id, amount_paid, payment_date,
                   installment_count, notes, created_at
            FROM payment_events
            WHERE fee_record_id = ?
            ORDER BY payment_date ASC, id ASC
            "#,
        )
        .bind(fee_record_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }
}
