use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::core::{AppError, Result};

/// One settlement recorded against a fee record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PaymentEvent {
    pub id: i64,
    pub fee_record_id: i64,
    pub amount_paid: Decimal,
    pub payment_date: NaiveDate,
    pub installment_count: u32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

fn default_installment_count() -> u32 {
    1
}

/// Request to record a payment against a fee record
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentRequest {
    pub amount_paid: Decimal,
    pub payment_date: NaiveDate,
    #[serde(default = "default_installment_count")]
    pub installment_count: u32,
    pub notes: Option<String>,
}

impl RecordPaymentRequest {
    pub fn validate(&self) -> Result<()> {
        if self.amount_paid <= Decimal::ZERO {
            return Err(AppError::validation("Amount paid must be positive"));
        }
        if self.installment_count == 0 {
            return Err(AppError::validation(
                "Installment count must be at least 1",
            ));
        }
        Ok(())
    }
}
