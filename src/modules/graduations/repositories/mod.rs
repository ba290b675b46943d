pub mod graduation_repository;

pub use graduation_repository::{GraduationRepository, MySqlGraduationRepository};
