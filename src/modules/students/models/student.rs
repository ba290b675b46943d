use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Student record, read-only from this core's point of view. Enrollment and
/// contact editing belong to the registration module upstream.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_email: Option<String>,
    pub enrolled_on: NaiveDate,
}
