pub mod report;

pub use report::{
    BulkNotificationReport, NotificationFailure, RecipientKind, SendNotificationsRequest,
};
