// MySQL persistence for fee records.
//
// The trait is the seam the services depend on; tests provide an in-memory
// implementation. Deletion removes the record's payment events in the same
// transaction since a payment event must not outlive its fee record.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{MySqlPool, QueryBuilder};

use crate::core::{AppError, Page, Pagination, Result};
use crate::modules::fees::models::{FeeFilters, FeeRecord, FeeStatus, ReferencePeriod};

#[async_trait]
pub trait FeeRepository: Send + Sync {
    /// Insert a batch of records in one transaction, returning them with
    /// their generated ids. All-or-nothing: a failure mid-batch must leave
    /// no record behind.
    async fn insert_many(&self, records: &[FeeRecord]) -> Result<Vec<FeeRecord>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<FeeRecord>>;

    /// Which of the given reference periods already have a record for the
    /// student. Used for duplicate detection before batch insertion.
    async fn existing_periods(
        &self,
        student_id: i64,
        periods: &[ReferencePeriod],
    ) -> Result<Vec<ReferencePeriod>>;

    /// Persist an edited record. Last writer wins.
    async fn update(&self, record: &FeeRecord) -> Result<FeeRecord>;

    async fn update_status(&self, id: i64, status: FeeStatus) -> Result<()>;

    /// Irreversibly remove a record and its payment events.
    async fn delete_with_payments(&self, id: i64) -> Result<()>;

    /// Filtered, paginated listing ordered by due date ascending.
    async fn list(&self, filters: &FeeFilters) -> Result<Page<FeeRecord>>;

    /// Flip pending records past their due date to overdue. Returns the
    /// number of records transitioned.
    async fn mark_overdue(&self, today: NaiveDate) -> Result<u64>;
}

pub struct MySqlFeeRepository {
    pool: MySqlPool,
}

impl MySqlFeeRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn apply_filters<'a>(builder: &mut QueryBuilder<'a, sqlx::MySql>, filters: &'a FeeFilters) {
        if let Some(student_id) = filters.student_id {
            builder.push(" AND student_id = ").push_bind(student_id);
        }
        if let Some(status) = filters.status {
            builder.push(" AND status = ").push_bind(status.to_string());
        }
        if let Some(month) = filters.reference_month {
            builder.push(" AND reference_month = ").push_bind(month);
        }
        if let Some(year) = filters.reference_year {
            builder.push(" AND reference_year = ").push_bind(year);
        }
        if let Some(due_from) = filters.due_from {
            builder.push(" AND due_date >= ").push_bind(due_from);
        }
        if let Some(due_to) = filters.due_to {
            builder.push(" AND due_date <= ").push_bind(due_to);
        }
        if filters.open_only {
            builder.push(" AND status IN ('pending', 'overdue')");
        }
    }
}

#[async_trait]
impl FeeRepository for MySqlFeeRepository {
    async fn insert_many(&self, records: &[FeeRecord]) -> Result<Vec<FeeRecord>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        // One transaction for the whole batch; an error on any insert rolls
        // back every record before it.
        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(records.len());

        for record in records {
            let result = sqlx::query(
                r#"
                INSERT INTO fee_records (
                    student_id, plan_id, reference_month, reference_year, due_date,
                    base_amount, discount_amount, surcharge_amount, total_amount,
                    status, notes, created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(record.student_id)
            .bind(record.plan_id)
            .bind(record.reference_month)
            .bind(record.reference_year)
            .bind(record.due_date)
            .bind(record.base_amount)
            .bind(record.discount_amount)
            .bind(record.surcharge_amount)
            .bind(record.total_amount)
            .bind(record.status.to_string())
            .bind(&record.notes)
            .bind(record.created_at)
            .bind(record.updated_at)
            .execute(&mut *tx)
            .await?;

            let mut row = record.clone();
            row.id = result.last_insert_id() as i64;
            created.push(row);
        }

        tx.commit().await?;
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<FeeRecord>> {
        let record = sqlx::query_as::<_, FeeRecord>(
            r#"
            SELECT id, student_id, plan_id, reference_month, reference_year,
                   due_date, base_amount, discount_amount, surcharge_amount,
                   total_amount, status, notes, created_at, updated_at
            FROM fee_records
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn existing_periods(
        &self,
        student_id: i64,
        periods: &[ReferencePeriod],
    ) -> Result<Vec<ReferencePeriod>> {
        if periods.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::new(
            "SELECT DISTINCT reference_month, reference_year FROM fee_records WHERE student_id = ",
        );
        builder.push_bind(student_id);
        builder.push(" AND (reference_month, reference_year) IN ");
        builder.push_tuples(periods.iter(), |mut b, period| {
            b.push_bind(period.month).push_bind(period.year);
        });

        let rows: Vec<(u32, i32)> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(month, year)| ReferencePeriod { month, year })
            .collect())
    }

    async fn update(&self, record: &FeeRecord) -> Result<FeeRecord> {
        let result = sqlx::query(
            r#"
            UPDATE fee_records
            SET plan_id = ?, reference_month = ?, reference_year = ?,
                due_date = ?, base_amount = ?, discount_amount = ?,
                surcharge_amount = ?, total_amount = ?, notes = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(record.plan_id)
        .bind(record.reference_month)
        .bind(record.reference_year)
        .bind(record.due_date)
        .bind(record.base_amount)
        .bind(record.discount_amount)
        .bind(record.surcharge_amount)
        .bind(record.total_amount)
        .bind(&record.notes)
        .bind(record.updated_at)
        .bind(record.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Fee record {} not found",
                record.id
            )));
        }

        Ok(record.clone())
    }

    async fn update_status(&self, id: i64, status: FeeStatus) -> Result<()> {
        let result = sqlx::query(
            "UPDATE fee_records SET status = ?, updated_at = NOW() WHERE id = ?",
        )
        .bind(status.to_string())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Fee record {} not found", id)));
        }

        Ok(())
    }

    async fn delete_with_payments(&self, id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM payment_events WHERE fee_record_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM fee_records WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(AppError::not_found(format!("Fee record {} not found", id)));
        }

        tx.commit().await?;
        Ok(())
    }

    async fn list(&self, filters: &FeeFilters) -> Result<Page<FeeRecord>> {
        let mut count_builder =
            QueryBuilder::new("SELECT COUNT(*) FROM fee_records WHERE 1 = 1");
        Self::apply_filters(&mut count_builder, filters);

        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut builder = QueryBuilder::new(
            r#"
            SELECT id, student_id, plan_id, reference_month, reference_year,
                   due_date, base_amount, discount_amount, surcharge_amount,
                   total_amount, status, notes, created_at, updated_at
            FROM fee_records WHERE 1 = 1
            "#,
        );
        Self::apply_filters(&mut builder, filters);
        builder.push(" ORDER BY due_date ASC, id ASC");
        builder.push(" LIMIT ").push_bind(filters.limit());
        builder.push(" OFFSET ").push_bind(filters.offset());

        let items = builder
            .build_query_as::<FeeRecord>()
            .fetch_all(&self.pool)
            .await?;

        Ok(Page {
            items,
            pagination: Pagination::new(filters.page(), filters.limit(), total as u64),
        })
    }

    async fn mark_overdue(&self, today: NaiveDate) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE fee_records
            SET status = 'overdue', updated_at = NOW()
            WHERE status = 'pending' AND due_date < ?
            "#,
        )
        .bind(today)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
