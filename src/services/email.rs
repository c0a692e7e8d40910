//! Email service for best-effort reader notifications
//!
//! Lifecycle notifications are persisted as rows regardless; email is an
//! extra channel. Send failures are the caller's to log, never to propagate
//! into a job run.

use lettre::{
    message::{header::ContentType, Mailbox, Message},
    transport::smtp::authentication::Credentials,
    SmtpTransport, Transport,
};
use std::str::FromStr;

use crate::{
    config::EmailConfig,
    error::{AppError, AppResult},
};

#[derive(Clone)]
pub struct EmailService {
    config: EmailConfig,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Reminder that a loan is approaching its due date
    pub async fn send_return_notice(&self, to: &str, title: &str, days_left: i64) -> AppResult<()> {
        let subject = "Athenaeum return notice";
        let body = if days_left == 0 {
            format!("\"{}\" is due back today. Please return it to your library.\n", title)
        } else {
            format!(
                "\"{}\" is due back in {} day(s). Please return it to your library.\n",
                title, days_left
            )
        };
        self.send_email(to, subject, &body).await
    }

    /// A queued hold got a copy
    pub async fn send_pickup_notice(&self, to: &str, title: &str, pickup_days: i64) -> AppResult<()> {
        let subject = "Athenaeum: your book is ready";
        let body = format!(
            "\"{}\" is ready for pickup at your library. You have {} days to collect it before the hold expires.\n",
            title, pickup_days
        );
        self.send_email(to, subject, &body).await
    }

    /// Generic email sending function
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        if !self.config.enabled {
            tracing::debug!(to, subject, "email disabled, skipping send");
            return Ok(());
        }

        let from_name = self.config.smtp_from_name.as_deref().unwrap_or("Athenaeum");
        let from_mailbox = Mailbox::from_str(&format!("{} <{}>", from_name, self.config.smtp_from))
            .map_err(|e| AppError::Internal(format!("Invalid from address: {}", e)))?;

        let to_mailbox = Mailbox::from_str(to)
            .map_err(|e| AppError::Internal(format!("Invalid to address: {}", e)))?;

        let email = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))?;

        let mut builder = if self.config.smtp_use_tls {
            SmtpTransport::starttls_relay(&self.config.smtp_host)
                .map_err(|e| AppError::Internal(format!("SMTP setup failed: {}", e)))?
        } else {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
        }
        .port(self.config.smtp_port);

        if let (Some(username), Some(password)) =
            (&self.config.smtp_username, &self.config.smtp_password)
        {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        let transport = builder.build();

        // lettre's sync transport; sends are rare enough not to warrant a
        // dedicated blocking pool
        tokio::task::spawn_blocking(move || transport.send(&email))
            .await
            .map_err(|e| AppError::Internal(format!("Email task failed: {}", e)))?
            .map_err(|e| AppError::Internal(format!("Failed to send email: {}", e)))?;

        Ok(())
    }
}
