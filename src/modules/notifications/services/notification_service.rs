use std::sync::Arc;

use tracing::{info, warn};

use crate::core::{AppError, Result};
use crate::modules::fees::repositories::FeeRepository;
use crate::modules::notifications::models::{
    BulkNotificationReport, NotificationFailure, RecipientKind,
};
use crate::modules::notifications::services::mailer::{render_reminder, EmailSender};
use crate::modules::students::repositories::StudentRepository;

/// Upper bound on the caller-supplied message, enforced server-side
pub const MAX_CUSTOM_MESSAGE_CHARS: usize = 500;

/// Sends payment reminders for a batch of fee records.
///
/// Each record resolves to zero or more recipients (student email, guardian
/// email when on file); every failure is captured per recipient and never
/// aborts the batch.
pub struct NotificationService {
    fees: Arc<dyn FeeRepository>,
    students: Arc<dyn StudentRepository>,
    mailer: Arc<dyn EmailSender>,
}

struct Recipient {
    kind: RecipientKind,
    name: String,
    email: Option<String>,
}

impl NotificationService {
    pub fn new(
        fees: Arc<dyn FeeRepository>,
        students: Arc<dyn StudentRepository>,
        mailer: Arc<dyn EmailSender>,
    ) -> Self {
        Self {
            fees,
            students,
            mailer,
        }
    }

    pub async fn send_bulk(
        &self,
        ids: &[i64],
        custom_message: Option<String>,
    ) -> Result<BulkNotificationReport> {
        if let Some(ref message) = custom_message {
            if message.chars().count() > MAX_CUSTOM_MESSAGE_CHARS {
                return Err(AppError::validation(format!(
                    "Custom message must not exceed {} characters",
                    MAX_CUSTOM_MESSAGE_CHARS
                )));
            }
        }

        let today = chrono::Utc::now().date_naive();
        let mut report = BulkNotificationReport {
            total: ids.len() as u32,
            ..Default::default()
        };

        for &fee_record_id in ids {
            match self
                .dispatch_for_fee(fee_record_id, custom_message.as_deref(), today, &mut report)
                .await
            {
                Ok(sent) if sent > 0 => report.sucessos += 1,
                Ok(_) => report.falhas += 1,
                Err(failure) => {
                    report.falhas += 1;
                    report.failures.push(failure);
                }
            }
        }

        info!(
            total = report.total,
            sucessos = report.sucessos,
            falhas = report.falhas,
            emails_sent = report.emails_sent,
            "Bulk reminder dispatch completed"
        );

        Ok(report)
    }

    /// Dispatch reminders for one fee record. Returns the number of emails
    /// delivered; recipient-level failures are appended to the report. A
    /// record-level problem (unknown fee/student) is returned as a single
    /// failure entry instead.
    async fn dispatch_for_fee(
        &self,
        fee_record_id: i64,
        custom_message: Option<&str>,
        today: chrono::NaiveDate,
        report: &mut BulkNotificationReport,
    ) -> std::result::Result<u32, NotificationFailure> {
        let fee = match self.fees.find_by_id(fee_record_id).await {
            Ok(Some(fee)) => fee,
            Ok(None) => {
                return Err(NotificationFailure {
                    fee_record_id,
                    name: String::new(),
                    email: None,
                    kind: RecipientKind::Student,
                    error: "fee record not found".to_string(),
                })
            }
            Err(e) => {
                warn!(fee_record_id, error = %e, "Failed to load fee record");
                return Err(NotificationFailure {
                    fee_record_id,
                    name: String::new(),
                    email: None,
                    kind: RecipientKind::Student,
                    error: "failed to load fee record".to_string(),
                });
            }
        };

        let student = match self.students.find_by_id(fee.student_id).await {
            Ok(Some(student)) => student,
            Ok(None) => {
                return Err(NotificationFailure {
                    fee_record_id,
                    name: String::new(),
                    email: None,
                    kind: RecipientKind::Student,
                    error: "student not found".to_string(),
                })
            }
            Err(e) => {
                warn!(fee_record_id, error = %e, "Failed to load student");
                return Err(NotificationFailure {
                    fee_record_id,
                    name: String::new(),
                    email: None,
                    kind: RecipientKind::Student,
                    error: "failed to load student".to_string(),
                });
            }
        };

        let mut recipients = vec![Recipient {
            kind: RecipientKind::Student,
            name: student.name.clone(),
            email: student.email.clone(),
        }];
        if student.guardian_email.is_some() {
            recipients.push(Recipient {
                kind: RecipientKind::Guardian,
                name: student
                    .guardian_name
                    .clone()
                    .unwrap_or_else(|| student.name.clone()),
                email: student.guardian_email.clone(),
            });
        }

        let mut sent = 0u32;
        for recipient in recipients {
            let Some(ref email) = recipient.email else {
                report.failures.push(NotificationFailure {
                    fee_record_id,
                    name: recipient.name,
                    email: None,
                    kind: recipient.kind,
                    error: "no email on file".to_string(),
                });
                continue;
            };

            let message = render_reminder(
                email,
                &recipient.name,
                &student.name,
                fee.total_amount,
                fee.due_date,
                today,
                custom_message,
            );

            match self.mailer.send(&message).await {
                Ok(()) => {
                    sent += 1;
                    report.emails_sent += 1;
                }
                Err(e) => {
                    warn!(fee_record_id, email = %email, error = %e, "Reminder delivery failed");
                    report.failures.push(NotificationFailure {
                        fee_record_id,
                        name: recipient.name,
                        email: Some(email.clone()),
                        kind: recipient.kind,
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok(sent)
    }
}
