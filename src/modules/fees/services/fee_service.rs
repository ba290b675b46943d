use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::core::{AppError, BatchOutcome, Page, Result};
use crate::modules::fees::models::{
    CreateFeeOutcome, CreateFeeRequest, EditFeeFields, FeeFilters, FeeRecord, FeeStatus,
};
use crate::modules::fees::repositories::FeeRepository;

/// Service for the fee record lifecycle: creation (single and multi-month),
/// edits, and the bulk operations. Bulk operations are item-isolated: one
/// failing record never aborts the rest of the batch.
pub struct FeeService {
    repo: Arc<dyn FeeRepository>,
}

impl FeeService {
    pub fn new(repo: Arc<dyn FeeRepository>) -> Self {
        Self { repo }
    }

    /// Create one fee record, or `month_count` consecutive monthly records.
    ///
    /// Reference periods that already have a record for the student are
    /// counted as duplicates; they are still inserted unless the request
    /// opts out with `allow_duplicates = false`. The whole run is written
    /// in one transaction: a failure persists nothing.
    pub async fn create(&self, request: CreateFeeRequest) -> Result<CreateFeeOutcome> {
        let schedule = request.schedule()?;
        let total = FeeRecord::compute_total(
            request.base_amount,
            request.discount_amount,
            request.surcharge_amount,
        )?;

        let periods: Vec<_> = schedule.iter().map(|(period, _)| *period).collect();
        let existing: HashSet<_> = self
            .repo
            .existing_periods(request.student_id, &periods)
            .await?
            .into_iter()
            .collect();

        let mut to_insert = Vec::with_capacity(schedule.len());
        let mut duplicates = 0u32;
        let now = Utc::now();

        for (period, due_date) in schedule {
            let is_duplicate = existing.contains(&period);
            if is_duplicate {
                duplicates += 1;
                warn!(
                    student_id = request.student_id,
                    period = %period,
                    "Duplicate reference period for student"
                );
                if !request.allow_duplicates {
                    continue;
                }
            }

            to_insert.push(FeeRecord {
                id: 0, // set by the database
                student_id: request.student_id,
                plan_id: request.plan_id,
                reference_month: period.month,
                reference_year: period.year,
                due_date,
                base_amount: request.base_amount,
                discount_amount: request.discount_amount,
                surcharge_amount: request.surcharge_amount,
                total_amount: total,
                status: FeeStatus::Pending,
                notes: request.notes.clone(),
                created_at: now,
                updated_at: now,
            });
        }

        let created = self.repo.insert_many(&to_insert).await?;

        info!(
            student_id = request.student_id,
            created = created.len(),
            duplicates = duplicates,
            "Fee records created"
        );

        Ok(CreateFeeOutcome { created, duplicates })
    }

    pub async fn get(&self, id: i64) -> Result<FeeRecord> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Fee record {} not found", id)))
    }

    /// Partial update of a single record, recomputing the total.
    pub async fn edit(&self, id: i64, fields: EditFeeFields) -> Result<FeeRecord> {
        let mut record = self.get(id).await?;
        record.apply_edit(&fields)?;
        self.repo.update(&record).await
    }

    /// Apply the same field-set to every record in `ids`. Per-record
    /// validation failures are counted, never raised.
    pub async fn bulk_edit(&self, ids: &[i64], fields: EditFeeFields) -> Result<BatchOutcome> {
        let mut outcome = BatchOutcome::default();

        for &id in ids {
            match self.edit(id, fields.clone()).await {
                Ok(_) => outcome.record_success(),
                Err(e) => {
                    warn!(fee_record_id = id, error = %e, "Bulk edit item failed");
                    outcome.record_error();
                }
            }
        }

        Ok(outcome)
    }

    /// Set the status of every record in `ids` without touching amounts.
    pub async fn bulk_update_status(
        &self,
        ids: &[i64],
        status: FeeStatus,
    ) -> Result<BatchOutcome> {
        let mut outcome = BatchOutcome::default();

        for &id in ids {
            match self.repo.update_status(id, status).await {
                Ok(()) => outcome.record_success(),
                Err(e) => {
                    warn!(fee_record_id = id, error = %e, "Bulk status update item failed");
                    outcome.record_error();
                }
            }
        }

        Ok(outcome)
    }

    /// Irreversibly remove the records in `ids` and their payment events.
    /// Upstream is expected to double-confirm before calling this.
    pub async fn bulk_delete(&self, ids: &[i64]) -> Result<BatchOutcome> {
        let mut outcome = BatchOutcome::default();

        for &id in ids {
            match self.repo.delete_with_payments(id).await {
                Ok(()) => outcome.record_success(),
                Err(e) => {
                    warn!(fee_record_id = id, error = %e, "Bulk delete item failed");
                    outcome.record_error();
                }
            }
        }

        info!(
            processed = outcome.processed,
            errors = outcome.errors,
            "Bulk delete completed"
        );

        Ok(outcome)
    }

    /// Filtered, paginated listing ordered by due date ascending.
    pub async fn list(&self, filters: FeeFilters) -> Result<Page<FeeRecord>> {
        self.repo.list(&filters).await
    }

    /// Open obligations (pendências): everything not paid or cancelled.
    pub async fn list_open(&self, mut filters: FeeFilters) -> Result<Page<FeeRecord>> {
        filters.open_only = true;
        filters.status = None;
        self.repo.list(&filters).await
    }
}
