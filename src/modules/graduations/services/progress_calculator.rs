// Pure graduation arithmetic: standing resolution, progress dimensions, and
// pace-based projection of the remaining months. Kept free of I/O so the
// policy can be tested exhaustively.

use chrono::NaiveDate;

use crate::config::EligibilityConfig;
use crate::core::{AppError, Result};
use crate::modules::graduations::models::{
    AttendanceStats, BeltDefinition, Confidence, GraduationRecord, ProgressBreakdown,
    ProgressDimension,
};

/// Average weeks per calendar month, used to convert weekly pace to months
pub const WEEKS_PER_MONTH: f64 = 4.345;

/// Average days per calendar month, used for fractional month arithmetic
pub const DAYS_PER_MONTH: f64 = 30.44;

/// A student's position in the belt sequence
#[derive(Debug, Clone)]
pub struct Standing {
    pub current: BeltDefinition,
    pub next: Option<BeltDefinition>,
    /// When the current belt was achieved (enrollment date for the first)
    pub since: NaiveDate,
}

/// Current training pace over the trailing window
#[derive(Debug, Clone, Copy)]
pub struct PaceSnapshot {
    pub window_weeks: u32,
    pub classes_per_week: f64,
    pub scheduled_per_week: f64,
    pub attendance_rate: f64,
}

impl PaceSnapshot {
    pub fn from_window(window: AttendanceStats, window_weeks: u32) -> Self {
        let weeks = window_weeks.max(1) as f64;
        Self {
            window_weeks,
            classes_per_week: window.attended as f64 / weeks,
            scheduled_per_week: window.scheduled as f64 / weeks,
            attendance_rate: window.rate(),
        }
    }
}

pub fn months_between(from: NaiveDate, to: NaiveDate) -> f64 {
    ((to - from).num_days().max(0)) as f64 / DAYS_PER_MONTH
}

/// Resolve where a student stands in the belt sequence.
///
/// The highest achieved belt is current; a student with no graduation
/// record is current at the lowest belt, counting from enrollment.
pub fn resolve_standing(
    belts: &[BeltDefinition],
    history: &[GraduationRecord],
    enrolled_on: NaiveDate,
) -> Result<Standing> {
    if belts.is_empty() {
        return Err(AppError::internal("Belt sequence is not configured"));
    }

    let highest = history
        .iter()
        .max_by_key(|record| record.belt_order)
        .and_then(|record| {
            belts
                .iter()
                .position(|belt| belt.order == record.belt_order)
                .map(|index| (index, record.achieved_on))
        });

    let (index, since) = match highest {
        Some((index, achieved_on)) => (index, achieved_on),
        None => (0, enrolled_on),
    };

    Ok(Standing {
        current: belts[index].clone(),
        next: belts.get(index + 1).cloned(),
        since,
    })
}

/// Progress toward the requirements of the current belt.
pub fn compute_progress(
    requirements: &BeltDefinition,
    months_in_belt: f64,
    since_graduation: AttendanceStats,
) -> ProgressBreakdown {
    ProgressBreakdown {
        time: ProgressDimension::new(months_in_belt, requirements.min_months as f64),
        classes: ProgressDimension::new(
            since_graduation.attended as f64,
            requirements.min_classes as f64,
        ),
        attendance: ProgressDimension::new(
            since_graduation.rate() * 100.0,
            requirements.min_attendance_rate * 100.0,
        ),
    }
}

/// Months until every requirement is satisfied, assuming the student keeps
/// the current pace. `None` means the goal is unattainable at that pace
/// (no classes attended, or the attendance requirement cannot converge).
pub fn remaining_months(
    requirements: &BeltDefinition,
    months_in_belt: f64,
    since_graduation: AttendanceStats,
    pace: &PaceSnapshot,
) -> Option<f64> {
    let time_remaining = (requirements.min_months as f64 - months_in_belt).max(0.0);

    let classes_remaining = {
        let shortfall =
            requirements.min_classes as f64 - since_graduation.attended as f64;
        if shortfall <= 0.0 {
            0.0
        } else {
            let per_month = pace.classes_per_week * WEEKS_PER_MONTH;
            if per_month <= 0.0 {
                return None;
            }
            shortfall / per_month
        }
    };

    let attendance_remaining = {
        let required = requirements.min_attendance_rate;
        let attended = since_graduation.attended as f64;
        let scheduled = since_graduation.scheduled as f64;

        if scheduled > 0.0 && attended / scheduled >= required {
            0.0
        } else {
            // Smallest m with (attended + a*m) / (scheduled + s*m) >= r,
            // where a and s are the monthly pace. Diverges when a <= r*s.
            let a = pace.classes_per_week * WEEKS_PER_MONTH;
            let s = pace.scheduled_per_week * WEEKS_PER_MONTH;
            let need = required * scheduled - attended;
            if need <= 0.0 {
                0.0
            } else {
                let gain = a - required * s;
                if gain <= 0.0 {
                    return None;
                }
                need / gain
            }
        }
    };

    Some(
        time_remaining
            .max(classes_remaining)
            .max(attendance_remaining),
    )
}

/// Confidence thresholds are policy; see `EligibilityConfig`.
pub fn confidence(pace: &PaceSnapshot, config: &EligibilityConfig) -> Confidence {
    if pace.attendance_rate >= config.high_confidence_min_rate
        && pace.classes_per_week >= config.high_confidence_min_pace
    {
        Confidence::High
    } else if pace.attendance_rate >= config.medium_confidence_min_rate
        && pace.classes_per_week >= config.medium_confidence_min_pace
    {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

/// Coaching tips for each unmet dimension.
pub fn suggestions(progress: &ProgressBreakdown, pace: &PaceSnapshot) -> Vec<String> {
    let mut tips = Vec::new();

    if !progress.classes.met() {
        if pace.classes_per_week <= 0.0 {
            tips.push(
                "No classes attended in the recent window; resume training to make progress"
                    .to_string(),
            );
        } else {
            tips.push(format!(
                "Attend more classes: {:.0} of {:.0} required classes completed",
                progress.classes.current, progress.classes.required
            ));
        }
    }

    if !progress.attendance.met() {
        tips.push(format!(
            "Improve attendance consistency: currently {:.0}%, {:.0}% required",
            progress.attendance.current, progress.attendance.required
        ));
    }

    if !progress.time.met() {
        tips.push(format!(
            "Keep training: {:.1} of {:.0} required months in the current belt",
            progress.time.current, progress.time.required
        ));
    }

    tips
}
