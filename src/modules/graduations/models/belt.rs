use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One rank in the progression sequence, with the requirements to advance
/// out of it to the next belt.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BeltDefinition {
    pub id: i64,
    /// Position in the sequence, 1-based; `order` on the wire.
    #[sqlx(rename = "belt_order")]
    #[serde(rename = "order")]
    pub order: u32,
    pub name: String,
    pub color: String,
    /// Minimum months in this belt before advancing
    pub min_months: u32,
    /// Minimum attended classes in this belt before advancing
    pub min_classes: u32,
    /// Minimum attendance rate (0-1) while in this belt
    pub min_attendance_rate: f64,
}

/// A belt a student has achieved
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GraduationRecord {
    pub student_id: i64,
    pub belt_order: u32,
    pub achieved_on: NaiveDate,
}

/// Attended vs. scheduled class counts over some window
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttendanceStats {
    pub attended: u32,
    pub scheduled: u32,
}

impl AttendanceStats {
    pub fn rate(&self) -> f64 {
        if self.scheduled == 0 {
            0.0
        } else {
            self.attended as f64 / self.scheduled as f64
        }
    }
}
