// Email sending seam.
//
// The dispatcher only knows the `EmailSender` trait; production wires in
// `HttpMailer`, which posts to a transactional-mail HTTP API. Tests use a
// recording fake.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::EmailConfig;
use crate::core::{AppError, Result};

/// One rendered message ready for delivery
#[derive(Debug, Clone, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<()>;
}

/// Delivery via a transactional-mail HTTP API
pub struct HttpMailer {
    client: reqwest::Client,
    config: EmailConfig,
}

impl HttpMailer {
    pub fn new(config: EmailConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[derive(Serialize)]
struct OutboundEmail<'a> {
    from_email: &'a str,
    from_name: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

#[async_trait]
impl EmailSender for HttpMailer {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        let payload = OutboundEmail {
            from_email: &self.config.from_address,
            from_name: &self.config.from_name,
            to: &message.to,
            subject: &message.subject,
            html: &message.html,
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::email(format!("Provider unreachable: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Email provider rejected message");
            return Err(AppError::email(format!(
                "Provider returned status {}",
                status
            )));
        }

        Ok(())
    }
}

/// Render a payment reminder for one recipient.
///
/// Pure so the template is testable without a provider. `custom_message` is
/// included verbatim; length is validated by the dispatcher before any
/// message is rendered.
pub fn render_reminder(
    to: &str,
    recipient_name: &str,
    student_name: &str,
    total_amount: Decimal,
    due_date: NaiveDate,
    today: NaiveDate,
    custom_message: Option<&str>,
) -> EmailMessage {
    let days = (due_date - today).num_days();
    let deadline_line = if days > 0 {
        format!("Payment is due in {} day(s), on {}.", days, due_date)
    } else if days == 0 {
        format!("Payment is due today, {}.", due_date)
    } else {
        format!("Payment was due on {} and is {} day(s) overdue.", due_date, -days)
    };

    let subject = format!("Monthly fee reminder - {}", student_name);

    let mut html = format!(
        "<p>Hello {},</p>\
         <p>This is a reminder about the monthly fee for {}.</p>\
         <p>Amount due: <strong>{}</strong></p>\
         <p>{}</p>",
        recipient_name, student_name, total_amount, deadline_line
    );

    if let Some(message) = custom_message {
        html.push_str(&format!("<p>{}</p>", message));
    }

    EmailMessage {
        to: to.to_string(),
        subject,
        html,
    }
}
