pub mod graduation_controller;
