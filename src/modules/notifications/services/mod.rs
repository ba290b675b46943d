pub mod mailer;
pub mod notification_service;

pub use mailer::{EmailMessage, EmailSender, HttpMailer};
pub use notification_service::{NotificationService, MAX_CUSTOM_MESSAGE_CHARS};
