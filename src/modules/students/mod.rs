// Student records: read-only collaborator data (contacts, enrollment date)

pub mod models;
pub mod repositories;

pub use models::Student;
pub use repositories::StudentRepository;
