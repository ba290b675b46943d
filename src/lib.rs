//! Tatame academy management core library
//!
//! Billing (mensalidade) lifecycle, payment recording, reminder dispatch,
//! and belt-graduation eligibility projection for a martial-arts academy.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

// Re-export commonly used types
pub use modules::fees;
pub use modules::graduations;
pub use modules::notifications;
pub use modules::payments;
pub use modules::students;
