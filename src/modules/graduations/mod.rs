// Eligibility projector module: belt progression and graduation projection

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{BeltDefinition, EligibilityReport, ProjectionReport};
pub use repositories::GraduationRepository;
pub use services::EligibilityService;
