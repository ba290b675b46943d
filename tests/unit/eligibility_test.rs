// Eligibility reports and the belt timeline. Eligibility is conjunctive:
// every dimension must be met, and overall progress is the minimum one.

#[path = "../helpers/mod.rs"]
mod helpers;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};

use helpers::{belt, student, InMemoryGraduationRepository, InMemoryStudentRepository};
use tatame::config::EligibilityConfig;
use tatame::core::AppError;
use tatame::modules::graduations::models::{BeltStanding, GraduationRecord};
use tatame::modules::graduations::services::EligibilityService;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Attendance log with `attended` of `scheduled` classes, spread weekly
/// backwards from today.
fn weekly_log(attended: u32, scheduled: u32) -> Vec<(NaiveDate, bool)> {
    let today = Utc::now().date_naive();
    (0..scheduled)
        .map(|i| (today - Duration::weeks(i as i64 / 2), i < attended))
        .collect()
}

fn three_belt_sequence() -> Vec<tatame::modules::graduations::models::BeltDefinition> {
    vec![
        belt(1, "White", 12, 80, 0.70),
        belt(2, "Blue", 18, 120, 0.70),
        belt(3, "Purple", 24, 160, 0.75),
    ]
}

fn service(
    graduations: InMemoryGraduationRepository,
    students: InMemoryStudentRepository,
) -> EligibilityService {
    EligibilityService::new(
        Arc::new(graduations),
        Arc::new(students),
        EligibilityConfig::default(),
    )
}

#[tokio::test]
async fn new_student_is_not_eligible() {
    let today = Utc::now().date_naive();
    let students = InMemoryStudentRepository::with(vec![student(
        1,
        "Ana",
        Some("ana@example.com"),
        None,
    )]);
    let mut students_map = students.students.lock().unwrap();
    students_map.get_mut(&1).unwrap().enrolled_on = today - Duration::days(60);
    drop(students_map);

    let graduations = InMemoryGraduationRepository {
        belts: three_belt_sequence(),
        history: vec![],
        attendance: HashMap::from([(1, weekly_log(10, 12))]),
    };

    let report = service(graduations, students)
        .compute_eligibility(1)
        .await
        .unwrap();

    assert_eq!(report.current_belt.order, 1);
    assert_eq!(report.next_belt.as_ref().unwrap().order, 2);
    assert!(!report.eligible);

    let progress = report.progress.unwrap();
    assert!(!progress.time.met());
    assert!(!progress.classes.met());
    // Overall progress is the binding dimension.
    assert!(progress.overall_percentage() <= progress.time.percentage);
    assert!(progress.overall_percentage() <= progress.classes.percentage);
    assert!(progress.overall_percentage() <= progress.attendance.percentage);
}

#[tokio::test]
async fn all_requirements_met_means_eligible() {
    let today = Utc::now().date_naive();
    let students = InMemoryStudentRepository::with(vec![student(
        1,
        "Ana",
        Some("ana@example.com"),
        None,
    )]);

    // Graduated to White 13 months ago, 90 of 100 classes since.
    let graduations = InMemoryGraduationRepository {
        belts: three_belt_sequence(),
        history: vec![GraduationRecord {
            student_id: 1,
            belt_order: 1,
            achieved_on: today - Duration::days(400),
        }],
        attendance: HashMap::from([(1, weekly_log(90, 100))]),
    };

    let report = service(graduations, students)
        .compute_eligibility(1)
        .await
        .unwrap();

    assert_eq!(report.current_belt.order, 1);
    assert!(report.eligible);
    assert!(report.progress.unwrap().all_met());
}

#[tokio::test]
async fn maximal_belt_is_vacuously_eligible() {
    let students = InMemoryStudentRepository::with(vec![student(
        1,
        "Ana",
        Some("ana@example.com"),
        None,
    )]);
    let graduations = InMemoryGraduationRepository {
        belts: three_belt_sequence(),
        history: vec![GraduationRecord {
            student_id: 1,
            belt_order: 3,
            achieved_on: date(2023, 6, 1),
        }],
        attendance: HashMap::new(),
    };

    let report = service(graduations, students)
        .compute_eligibility(1)
        .await
        .unwrap();

    assert_eq!(report.current_belt.order, 3);
    assert!(report.next_belt.is_none());
    assert!(report.eligible);
    assert!(report.progress.is_none());
}

#[tokio::test]
async fn unknown_student_is_not_found() {
    let students = InMemoryStudentRepository::default();
    let graduations = InMemoryGraduationRepository {
        belts: three_belt_sequence(),
        ..Default::default()
    };

    let result = service(graduations, students).compute_eligibility(9).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn timeline_has_exactly_one_current_belt() {
    let today = Utc::now().date_naive();
    let students = InMemoryStudentRepository::with(vec![student(
        1,
        "Ana",
        Some("ana@example.com"),
        None,
    )]);
    let graduations = InMemoryGraduationRepository {
        belts: three_belt_sequence(),
        history: vec![GraduationRecord {
            student_id: 1,
            belt_order: 1,
            achieved_on: today - Duration::days(200),
        }],
        attendance: HashMap::from([(1, weekly_log(30, 40))]),
    };

    let timeline = service(graduations, students).belt_timeline(1).await.unwrap();

    assert_eq!(timeline.len(), 3);
    let current: Vec<_> = timeline
        .iter()
        .filter(|e| e.status == BeltStanding::Current)
        .collect();
    assert_eq!(current.len(), 1);
    assert_eq!(current[0].order, 1);
    assert!(current[0].time_in_belt_months.unwrap() > 6.0);

    assert_eq!(timeline[1].status, BeltStanding::Next);
    assert!(timeline[1].progress_percentage.is_some());
    assert_eq!(timeline[2].status, BeltStanding::Future);
    assert!(timeline[2].progress_percentage.is_none());
}

#[tokio::test]
async fn timeline_shows_achieved_dates_for_completed_belts() {
    let students = InMemoryStudentRepository::with(vec![student(
        1,
        "Ana",
        Some("ana@example.com"),
        None,
    )]);
    let achieved = date(2022, 5, 1);
    let graduations = InMemoryGraduationRepository {
        belts: three_belt_sequence(),
        history: vec![
            GraduationRecord {
                student_id: 1,
                belt_order: 1,
                achieved_on: achieved,
            },
            GraduationRecord {
                student_id: 1,
                belt_order: 2,
                achieved_on: date(2024, 5, 1),
            },
        ],
        attendance: HashMap::new(),
    };

    let timeline = service(graduations, students).belt_timeline(1).await.unwrap();

    assert_eq!(timeline[0].status, BeltStanding::Completed);
    assert_eq!(timeline[0].achieved_date, Some(achieved));
    assert_eq!(timeline[1].status, BeltStanding::Current);
}
