pub mod fee_service;
pub mod overdue_checker;

pub use fee_service::FeeService;
pub use overdue_checker::OverdueChecker;
