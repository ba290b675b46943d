pub mod fee_repository;

pub use fee_repository::{FeeRepository, MySqlFeeRepository};
