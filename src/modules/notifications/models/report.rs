use serde::{Deserialize, Serialize};

/// Which contact on file a reminder was addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipientKind {
    Student,
    Guardian,
}

/// One per-recipient failure inside a bulk dispatch
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationFailure {
    pub fee_record_id: i64,
    pub name: String,
    pub email: Option<String>,
    #[serde(rename = "type")]
    pub kind: RecipientKind,
    pub error: String,
}

/// Aggregate result of a bulk reminder dispatch.
///
/// Field names on the wire are the Portuguese ones the consuming frontend
/// was built against.
#[derive(Debug, Default, Serialize)]
pub struct BulkNotificationReport {
    /// Fee records requested
    pub total: u32,
    /// Fee records with at least one reminder delivered
    pub sucessos: u32,
    /// Fee records where no recipient could be reached
    pub falhas: u32,
    /// Individual reminders delivered
    #[serde(rename = "emailsEnviados")]
    pub emails_sent: u32,
    #[serde(rename = "falhasList")]
    pub failures: Vec<NotificationFailure>,
}

/// Request body for POST /api/notifications/fees
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationsRequest {
    pub ids: Vec<i64>,
    pub custom_message: Option<String>,
}
