use crate::core::{NotificationEvent, Notifier};
use crate::utils::error::{MonitorError, Result};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub sender_email: String,
    pub sender_password: String,
}

/// Sends alerts through an SMTP relay using STARTTLS, logging in as the sender.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotifier {
    pub fn new(settings: &SmtpSettings) -> Result<Self> {
        let from = parse_mailbox(&settings.sender_email)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .map_err(|e| MonitorError::NotificationError {
                message: format!("Invalid SMTP relay {}: {}", settings.host, e),
            })?
            .port(settings.port)
            .credentials(Credentials::new(
                settings.sender_email.clone(),
                settings.sender_password.clone(),
            ))
            .build();

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, event: &NotificationEvent) -> Result<()> {
        let message = compose_message(&self.from, event)?;

        tracing::debug!("Sending '{}' to {}", event.subject, event.recipient);
        self.transport
            .send(message)
            .await
            .map_err(|e| MonitorError::NotificationError {
                message: format!("SMTP delivery failed: {}", e),
            })?;

        Ok(())
    }
}

/// 沒有設定寄件帳號時使用：把通知內容寫進 log，並回報寄送失敗
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, event: &NotificationEvent) -> Result<()> {
        tracing::warn!(
            subject = %event.subject,
            recipient = %event.recipient,
            "📭 Email credentials not configured, alert only logged:\n{}",
            event.body
        );
        Err(MonitorError::NotificationError {
            message: "Email credentials not configured".to_string(),
        })
    }
}

pub fn compose_message(from: &Mailbox, event: &NotificationEvent) -> Result<Message> {
    let to = parse_mailbox(&event.recipient)?;

    Message::builder()
        .from(from.clone())
        .to(to)
        .subject(event.subject.as_str())
        .header(ContentType::TEXT_PLAIN)
        .body(event.body.clone())
        .map_err(|e| MonitorError::NotificationError {
            message: format!("Could not build e-mail: {}", e),
        })
}

fn parse_mailbox(address: &str) -> Result<Mailbox> {
    address
        .parse::<Mailbox>()
        .map_err(|e| MonitorError::NotificationError {
            message: format!("Invalid e-mail address '{}': {}", address, e),
        })
}
