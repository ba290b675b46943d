use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::MySqlPool;

use crate::core::Result;
use crate::modules::graduations::models::{AttendanceStats, BeltDefinition, GraduationRecord};

#[async_trait]
pub trait GraduationRepository: Send + Sync {
    /// The full belt sequence, ordered by position ascending.
    async fn belt_sequence(&self) -> Result<Vec<BeltDefinition>>;

    /// Belts the student has achieved, ordered by position ascending.
    async fn history(&self, student_id: i64) -> Result<Vec<GraduationRecord>>;

    /// Attended vs. scheduled class counts for the student since a date.
    async fn attendance_since(&self, student_id: i64, since: NaiveDate)
        -> Result<AttendanceStats>;
}

pub struct MySqlGraduationRepository {
    pool: MySqlPool,
}

impl MySqlGraduationRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GraduationRepository for MySqlGraduationRepository {
    async fn belt_sequence(&self) -> Result<Vec<BeltDefinition>> {
        let belts = sqlx::query_as::<_, BeltDefinition>(
            r#"
            SELECT id, belt_order, name, color, min_months, min_classes,
                   min_attendance_rate
            FROM belts
            ORDER BY belt_order ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(belts)
    }

    async fn history(&self, student_id: i64) -> Result<Vec<GraduationRecord>> {
        let records = sqlx::query_as::<_, GraduationRecord>(
            r#"
            SELECT student_id, belt_order, achieved_on
            FROM graduations
            WHERE student_id = ?
            ORDER BY belt_order ASC
            "#,
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn attendance_since(
        &self,
        student_id: i64,
        since: NaiveDate,
    ) -> Result<AttendanceStats> {
        let (attended, scheduled): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(attended), 0), COUNT(*)
            FROM class_attendance
            WHERE student_id = ? AND class_date >= ?
            "#,
        )
        .bind(student_id)
        .bind(since)
        .fetch_one(&self.pool)
        .await?;

        Ok(AttendanceStats {
            attended: attended as u32,
            scheduled: scheduled as u32,
        })
    }
}
