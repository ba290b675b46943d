use chrono::NaiveDate;
use serde::Serialize;

/// One progress dimension toward the next belt
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressDimension {
    pub current: f64,
    pub required: f64,
    /// min(100, 100 * current / required)
    pub percentage: f64,
}

impl ProgressDimension {
    pub fn new(current: f64, required: f64) -> Self {
        let percentage = if required <= 0.0 {
            100.0
        } else {
            (100.0 * current / required).min(100.0)
        };
        Self {
            current,
            required,
            percentage,
        }
    }

    pub fn met(&self) -> bool {
        self.percentage >= 100.0
    }
}

/// The three dimensions gating a graduation
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProgressBreakdown {
    pub time: ProgressDimension,
    pub classes: ProgressDimension,
    pub attendance: ProgressDimension,
}

impl ProgressBreakdown {
    pub fn all_met(&self) -> bool {
        self.time.met() && self.classes.met() && self.attendance.met()
    }

    /// The binding constraint: eligibility is conjunctive, so overall
    /// progress is the minimum dimension.
    pub fn overall_percentage(&self) -> f64 {
        self.time
            .percentage
            .min(self.classes.percentage)
            .min(self.attendance.percentage)
    }
}

/// Belt identity as shown to the presentation layer
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeltSummary {
    pub order: u32,
    pub name: String,
    pub color: String,
}

/// Result of `computeEligibility`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityReport {
    pub current_belt: BeltSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_belt: Option<BeltSummary>,
    pub eligible: bool,
    /// Absent when the student holds the maximal belt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<ProgressBreakdown>,
}

/// Standing of one belt in a student's timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BeltStanding {
    Completed,
    Current,
    Next,
    Future,
}

/// One entry of the belt timeline view
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeltTimelineEntry {
    pub order: u32,
    pub name: String,
    pub color: String,
    pub status: BeltStanding,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub achieved_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_in_belt_months: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_percentage: Option<f64>,
}

/// How much to trust a projected date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// Inputs echoed back with a projection, for display transparency
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionAssumptions {
    pub window_weeks: u32,
    pub avg_classes_per_week: f64,
    pub attendance_rate: f64,
    pub months_in_belt: f64,
}

/// Result of `projectEligibilityDate`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionReport {
    /// Absent when the goal is unattainable at the current pace (or the
    /// student already holds the maximal belt)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projected_date: Option<NaiveDate>,
    pub confidence: Confidence,
    pub assumptions: ProjectionAssumptions,
    pub suggestions: Vec<String>,
}
