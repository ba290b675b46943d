pub mod belt;
pub mod progress;

pub use belt::{AttendanceStats, BeltDefinition, GraduationRecord};
pub use progress::{
    BeltStanding, BeltSummary, BeltTimelineEntry, Confidence, EligibilityReport,
    ProgressBreakdown, ProgressDimension, ProjectionAssumptions, ProjectionReport,
};
