use crate::error::{AppError, Result};
use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

/// A rendered email with plain text and HTML alternatives
#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Delivery backend for queued emails
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn deliver(&self, message: &EmailMessage) -> Result<()>;
}

/// SMTP email sender
#[derive(Clone)]
pub struct EmailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl EmailSender {
    /// Create a new email sender
    pub fn new(
        smtp_server: &str,
        smtp_port: u16,
        smtp_username: Option<String>,
        smtp_password: Option<String>,
        from_email: &str,
        from_name: Option<String>,
        use_tls: bool,
    ) -> Result<Self> {
        if smtp_server.is_empty() {
            return Err(AppError::Configuration(
                "SMTP server cannot be empty".to_string(),
            ));
        }

        let address = from_email
            .parse()
            .map_err(|e| AppError::Configuration(format!("Invalid from address: {}", e)))?;
        let from = Mailbox::new(from_name, address);

        let mut builder = if use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(smtp_server)
                .map_err(|e| AppError::Configuration(format!("Invalid SMTP server: {}", e)))?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(smtp_server)
        };
        builder = builder.port(smtp_port);

        if let (Some(user), Some(pass)) = (smtp_username, smtp_password) {
            builder = builder.credentials(Credentials::new(user, pass));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    /// Build the MIME message with plain text and HTML parts
    pub fn build_message(&self, email: &EmailMessage) -> Result<Message> {
        let to: Mailbox = email.to.parse().map_err(|e| {
            AppError::Validation(format!("Invalid recipient address '{}': {}", email.to, e))
        })?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject.as_str())
            .multipart(MultiPart::alternative_plain_html(
                email.text.clone(),
                email.html.clone(),
            ))
            .map_err(|e| AppError::Internal(format!("Failed to build email: {}", e)))
    }
}

#[async_trait]
impl MailTransport for EmailSender {
    async fn deliver(&self, email: &EmailMessage) -> Result<()> {
        let message = self.build_message(email)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AppError::Network(format!("Failed to send email: {}", e)))?;

        info!(to = %email.to, subject = %email.subject, "Email sent");
        Ok(())
    }
}
