use std::sync::Arc;

use chrono::{Duration, Months, NaiveDate, Utc};
use tracing::info;

use crate::config::EligibilityConfig;
use crate::core::{AppError, Result};
use crate::modules::graduations::models::{
    BeltStanding, BeltSummary, BeltTimelineEntry, EligibilityReport, ProjectionReport,
    ProjectionAssumptions,
};
use crate::modules::graduations::repositories::GraduationRepository;
use crate::modules::graduations::services::progress_calculator::{
    self, months_between, PaceSnapshot, Standing,
};
use crate::modules::students::models::Student;
use crate::modules::students::repositories::StudentRepository;

/// Eligibility projector: progress toward the next belt and a pace-based
/// estimate of the graduation date.
pub struct EligibilityService {
    graduations: Arc<dyn GraduationRepository>,
    students: Arc<dyn StudentRepository>,
    config: EligibilityConfig,
}

impl EligibilityService {
    pub fn new(
        graduations: Arc<dyn GraduationRepository>,
        students: Arc<dyn StudentRepository>,
        config: EligibilityConfig,
    ) -> Self {
        Self {
            graduations,
            students,
            config,
        }
    }

    async fn load_student(&self, student_id: i64) -> Result<Student> {
        self.students
            .find_by_id(student_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Student {} not found", student_id)))
    }

    async fn load_standing(&self, student: &Student) -> Result<Standing> {
        let belts = self.graduations.belt_sequence().await?;
        let history = self.graduations.history(student.id).await?;
        progress_calculator::resolve_standing(&belts, &history, student.enrolled_on)
    }

    pub async fn compute_eligibility(&self, student_id: i64) -> Result<EligibilityReport> {
        let student = self.load_student(student_id).await?;
        let standing = self.load_standing(&student).await?;
        let today = Utc::now().date_naive();

        let current_belt = summary(&standing.current);

        // Maximal belt: nothing left to satisfy.
        let Some(ref next) = standing.next else {
            return Ok(EligibilityReport {
                current_belt,
                next_belt: None,
                eligible: true,
                progress: None,
            });
        };

        let since_graduation = self
            .graduations
            .attendance_since(student_id, standing.since)
            .await?;
        let months_in_belt = months_between(standing.since, today);

        let progress = progress_calculator::compute_progress(
            &standing.current,
            months_in_belt,
            since_graduation,
        );

        Ok(EligibilityReport {
            current_belt,
            next_belt: Some(summary(next)),
            eligible: progress.all_met(),
            progress: Some(progress),
        })
    }

    pub async fn project_eligibility_date(&self, student_id: i64) -> Result<ProjectionReport> {
        let student = self.load_student(student_id).await?;
        let standing = self.load_standing(&student).await?;
        let today = Utc::now().date_naive();

        let window_weeks = self.config.projection_window_weeks;
        let window_start = today - Duration::weeks(window_weeks as i64);
        let window = self
            .graduations
            .attendance_since(student_id, window_start)
            .await?;
        let pace = PaceSnapshot::from_window(window, window_weeks);

        let months_in_belt = months_between(standing.since, today);
        let assumptions = ProjectionAssumptions {
            window_weeks,
            avg_classes_per_week: pace.classes_per_week,
            attendance_rate: pace.attendance_rate,
            months_in_belt,
        };
        let confidence = progress_calculator::confidence(&pace, &self.config);

        // Maximal belt: vacuously eligible, nothing to project.
        if standing.next.is_none() {
            return Ok(ProjectionReport {
                projected_date: Some(today),
                confidence,
                assumptions,
                suggestions: Vec::new(),
            });
        }

        let since_graduation = self
            .graduations
            .attendance_since(student_id, standing.since)
            .await?;
        let progress = progress_calculator::compute_progress(
            &standing.current,
            months_in_belt,
            since_graduation,
        );

        let suggestions = if progress.all_met() {
            Vec::new()
        } else {
            progress_calculator::suggestions(&progress, &pace)
        };

        let projected_date = progress_calculator::remaining_months(
            &standing.current,
            months_in_belt,
            since_graduation,
            &pace,
        )
        .and_then(|remaining| add_months_ceil(today, remaining));

        info!(
            student_id = student_id,
            projected_date = ?projected_date,
            confidence = ?confidence,
            "Eligibility projection computed"
        );

        Ok(ProjectionReport {
            projected_date,
            confidence,
            assumptions,
            suggestions,
        })
    }

    /// The full belt sequence annotated with the student's standing.
    pub async fn belt_timeline(&self, student_id: i64) -> Result<Vec<BeltTimelineEntry>> {
        let student = self.load_student(student_id).await?;
        let belts = self.graduations.belt_sequence().await?;
        let history = self.graduations.history(student_id).await?;
        let standing =
            progress_calculator::resolve_standing(&belts, &history, student.enrolled_on)?;
        let today = Utc::now().date_naive();

        let next_progress = match standing.next {
            Some(_) => {
                let since_graduation = self
                    .graduations
                    .attendance_since(student_id, standing.since)
                    .await?;
                let months_in_belt = months_between(standing.since, today);
                Some(
                    progress_calculator::compute_progress(
                        &standing.current,
                        months_in_belt,
                        since_graduation,
                    )
                    .overall_percentage(),
                )
            }
            None => None,
        };

        let timeline = belts
            .iter()
            .map(|belt| {
                let (status, achieved_date, time_in_belt, percentage) =
                    if belt.order < standing.current.order {
                        let achieved = history
                            .iter()
                            .find(|record| record.belt_order == belt.order)
                            .map(|record| record.achieved_on);
                        (BeltStanding::Completed, achieved, None, None)
                    } else if belt.order == standing.current.order {
                        (
                            BeltStanding::Current,
                            None,
                            Some(months_between(standing.since, today)),
                            None,
                        )
                    } else if belt.order == standing.current.order + 1 {
                        (BeltStanding::Next, None, None, next_progress)
                    } else {
                        (BeltStanding::Future, None, None, None)
                    };

                BeltTimelineEntry {
                    order: belt.order,
                    name: belt.name.clone(),
                    color: belt.color.clone(),
                    status,
                    achieved_date,
                    time_in_belt_months: time_in_belt,
                    progress_percentage: percentage,
                }
            })
            .collect();

        Ok(timeline)
    }
}

fn summary(belt: &crate::modules::graduations::models::BeltDefinition) -> BeltSummary {
    BeltSummary {
        order: belt.order,
        name: belt.name.clone(),
        color: belt.color.clone(),
    }
}

/// Today plus a fractional number of months, rounded up to whole months.
fn add_months_ceil(today: NaiveDate, months: f64) -> Option<NaiveDate> {
    let whole = months.ceil().max(0.0) as u32;
    today.checked_add_months(Months::new(whole))
}
