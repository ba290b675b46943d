// Fee lifecycle module: monthly billing obligations (mensalidades)

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{FeeRecord, FeeStatus, ReferencePeriod};
pub use repositories::FeeRepository;
pub use services::{FeeService, OverdueChecker};
