use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::core::{AppError, Result};
use crate::modules::fees::repositories::FeeRepository;
use crate::modules::payments::models::{PaymentEvent, RecordPaymentRequest};
use crate::modules::payments::repositories::PaymentRepository;

/// Records settlements against fee records.
///
/// A payment covering the full total settles the record. Partial payments
/// are stored without a status transition unless `settle_on_partial` policy
/// is enabled.
pub struct PaymentService {
    payments: Arc<dyn PaymentRepository>,
    fees: Arc<dyn FeeRepository>,
    settle_on_partial: bool,
}

impl PaymentService {
    pub fn new(
        payments: Arc<dyn PaymentRepository>,
        fees: Arc<dyn FeeRepository>,
        settle_on_partial: bool,
    ) -> Self {
        Self {
            payments,
            fees,
            settle_on_partial,
        }
    }

    pub async fn record(
        &self,
        fee_record_id: i64,
        request: RecordPaymentRequest,
    ) -> Result<PaymentEvent> {
        request.validate()?;

        let fee = self
            .fees
            .find_by_id(fee_record_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Fee record {} not found", fee_record_id))
            })?;

        let covers_total = request.amount_paid >= fee.total_amount;
        let settle = covers_total || self.settle_on_partial;

        let event = PaymentEvent {
            id: 0, // set by the database
            fee_record_id,
            amount_paid: request.amount_paid,
            payment_date: request.payment_date,
            installment_count: request.installment_count,
            notes: request.notes,
            created_at: Utc::now(),
        };

        let created = self.payments.insert_settling(&event, settle).await?;

        info!(
            fee_record_id = fee_record_id,
            amount_paid = %created.amount_paid,
            settled = settle,
            partial = !covers_total,
            "Payment recorded"
        );

        Ok(created)
    }

    pub async fn list_for_fee(&self, fee_record_id: i64) -> Result<Vec<PaymentEvent>> {
        // 404 for unknown fee records rather than an empty list
        self.fees
            .find_by_id(fee_record_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Fee record {} not found", fee_record_id))
            })?;

        self.payments.list_for_fee(fee_record_id).await
    }
}
