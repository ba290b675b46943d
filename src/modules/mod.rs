pub mod fees;
pub mod graduations;
pub mod health;
pub mod notifications;
pub mod payments;
pub mod students;
