pub mod eligibility_service;
pub mod progress_calculator;

pub use eligibility_service::EligibilityService;
