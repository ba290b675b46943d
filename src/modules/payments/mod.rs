// Payment recorder module: settlements against fee records

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::PaymentEvent;
pub use repositories::PaymentRepository;
pub use services::PaymentService;
