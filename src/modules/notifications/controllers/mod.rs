pub mod notification_controller;
