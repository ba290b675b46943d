// A fee record (mensalidade) is one billing obligation for a student for a
// specific reference month/year. The reference period is what the record
// bills for; the due date is when it must be paid.

use chrono::{DateTime, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

use crate::core::{AppError, Result};

/// Fee record status lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(20)", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FeeStatus {
    /// Created, not yet paid, not yet past due
    Pending,
    /// Settled by a payment event
    Paid,
    /// Past due date without settlement
    Overdue,
    /// Voided; excluded from the open-obligations view
    Cancelled,
}

impl Default for FeeStatus {
    fn default() -> Self {
        FeeStatus::Pending
    }
}

impl std::fmt::Display for FeeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeeStatus::Pending => write!(f, "pending"),
            FeeStatus::Paid => write!(f, "paid"),
            FeeStatus::Overdue => write!(f, "overdue"),
            FeeStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for FeeStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(FeeStatus::Pending),
            "paid" => Ok(FeeStatus::Paid),
            "overdue" => Ok(FeeStatus::Overdue),
            "cancelled" => Ok(FeeStatus::Cancelled),
            _ => Err(format!("Invalid fee status: {}", s)),
        }
    }
}

/// Calendar period a fee record bills for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferencePeriod {
    pub month: u32,
    pub year: i32,
}

impl ReferencePeriod {
    pub fn new(month: u32, year: i32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(AppError::validation(format!(
                "Reference month must be between 1 and 12, got {}",
                month
            )));
        }
        Ok(Self { month, year })
    }

    /// The following calendar period, rolling December into January.
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                month: 1,
                year: self.year + 1,
            }
        } else {
            Self {
                month: self.month + 1,
                year: self.year,
            }
        }
    }
}

impl std::fmt::Display for ReferencePeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

/// Represents one billing obligation
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FeeRecord {
    pub id: i64,
    pub student_id: i64,
    pub plan_id: Option<i64>,
    pub reference_month: u32,
    pub reference_year: i32,
    pub due_date: NaiveDate,
    pub base_amount: Decimal,
    pub discount_amount: Decimal,
    pub surcharge_amount: Decimal,
    /// Derived: base - discount + surcharge, rounded to 2 decimal places
    pub total_amount: Decimal,
    pub status: FeeStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FeeRecord {
    /// Compute and validate the total for a set of amounts.
    ///
    /// Fails when any amount is negative, the discount exceeds the base, or
    /// the resulting total is not strictly positive.
    pub fn compute_total(base: Decimal, discount: Decimal, surcharge: Decimal) -> Result<Decimal> {
        if base < Decimal::ZERO || discount < Decimal::ZERO || surcharge < Decimal::ZERO {
            return Err(AppError::validation("Amounts must not be negative"));
        }

        if discount > base {
            return Err(AppError::validation(format!(
                "Discount ({}) must not exceed base amount ({})",
                discount, base
            )));
        }

        let total = (base - discount + surcharge).round_dp(2);
        if total <= Decimal::ZERO {
            return Err(AppError::validation(format!(
                "Total amount must be positive, got {}",
                total
            )));
        }

        Ok(total)
    }

    pub fn period(&self) -> ReferencePeriod {
        ReferencePeriod {
            month: self.reference_month,
            year: self.reference_year,
        }
    }

    /// Apply a partial edit, recomputing the total.
    pub fn apply_edit(&mut self, fields: &EditFeeFields) -> Result<()> {
        if let Some(month) = fields.reference_month {
            // Reuse period validation for the 1-12 bound
            ReferencePeriod::new(month, self.reference_year)?;
            self.reference_month = month;
        }
        if let Some(year) = fields.reference_year {
            self.reference_year = year;
        }
        if let Some(due_date) = fields.due_date {
            self.due_date = due_date;
        }
        if let Some(base) = fields.base_amount {
            self.base_amount = base;
        }
        if let Some(discount) = fields.discount_amount {
            self.discount_amount = discount;
        }
        if let Some(surcharge) = fields.surcharge_amount {
            self.surcharge_amount = surcharge;
        }
        if let Some(ref notes) = fields.notes {
            self.notes = notes.clone();
        }

        self.total_amount =
            Self::compute_total(self.base_amount, self.discount_amount, self.surcharge_amount)?;
        self.updated_at = Utc::now();

        Ok(())
    }
}

fn default_month_count() -> u32 {
    1
}

fn default_allow_duplicates() -> bool {
    true
}

/// Request to create one fee record, or a run of consecutive monthly records
/// when `month_count > 1`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeeRequest {
    pub student_id: i64,
    pub plan_id: Option<i64>,
    pub base_amount: Decimal,
    #[serde(default)]
    pub discount_amount: Decimal,
    #[serde(default)]
    pub surcharge_amount: Decimal,
    pub reference_month: u32,
    pub reference_year: i32,
    pub due_date: NaiveDate,
    #[serde(default = "default_month_count")]
    pub month_count: u32,
    /// Duplicate reference periods for the student are counted either way;
    /// with `false` they are skipped instead of inserted.
    #[serde(default = "default_allow_duplicates")]
    pub allow_duplicates: bool,
    pub notes: Option<String>,
}

/// Upper bound on a single batch-creation run
pub const MAX_MONTH_COUNT: u32 = 24;

impl CreateFeeRequest {
    /// The periods and due dates this request generates, in order.
    ///
    /// Both the reference period and the due date advance by one calendar
    /// month per step (`chrono::Months` clamps to the last valid day, so a
    /// due date of Jan 31 becomes Feb 28/29).
    pub fn schedule(&self) -> Result<Vec<(ReferencePeriod, NaiveDate)>> {
        if self.month_count == 0 || self.month_count > MAX_MONTH_COUNT {
            return Err(AppError::validation(format!(
                "Month count must be between 1 and {}",
                MAX_MONTH_COUNT
            )));
        }

        // Validates amounts up front so a bad request creates nothing.
        FeeRecord::compute_total(self.base_amount, self.discount_amount, self.surcharge_amount)?;

        let first = ReferencePeriod::new(self.reference_month, self.reference_year)?;

        let mut schedule = Vec::with_capacity(self.month_count as usize);
        let mut period = first;
        for step in 0..self.month_count {
            let due_date = self
                .due_date
                .checked_add_months(Months::new(step))
                .ok_or_else(|| AppError::validation("Due date out of range"))?;
            schedule.push((period, due_date));
            period = period.next();
        }

        Ok(schedule)
    }
}

/// Outcome of a create call
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeeOutcome {
    pub created: Vec<FeeRecord>,
    /// Reference periods that already had a record for the student
    pub duplicates: u32,
}

/// Field-selective update, shared by single edit and bulk edit
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditFeeFields {
    pub reference_month: Option<u32>,
    pub reference_year: Option<i32>,
    pub due_date: Option<NaiveDate>,
    pub base_amount: Option<Decimal>,
    pub discount_amount: Option<Decimal>,
    pub surcharge_amount: Option<Decimal>,
    /// Absent field leaves notes unchanged; an explicit `null` clears them.
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
}

fn double_option<'de, T, D>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Immutable query parameters for listing fee records
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeFilters {
    pub student_id: Option<i64>,
    pub status: Option<FeeStatus>,
    pub reference_month: Option<u32>,
    pub reference_year: Option<i32>,
    pub due_from: Option<NaiveDate>,
    pub due_to: Option<NaiveDate>,
    /// Restrict to open obligations (excludes paid and cancelled)
    #[serde(default)]
    pub open_only: bool,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl FeeFilters {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }

    /// Computed in u64: page is caller-supplied and the product can exceed
    /// u32 for extreme values.
    pub fn offset(&self) -> u64 {
        (self.page() as u64 - 1) * self.limit() as u64
    }
}
