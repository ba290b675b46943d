// Notification dispatcher module: payment reminders over email

pub mod controllers;
pub mod models;
pub mod services;

pub use models::BulkNotificationReport;
pub use services::{EmailSender, HttpMailer, NotificationService};
