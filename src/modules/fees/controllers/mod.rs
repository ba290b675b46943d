pub mod fee_controller;
