use crate::config::NotificationConfig;
use crate::error::Result;
use crate::models::{Actor, ContactSubmission, Inquiry};
use crate::notifications::email::MailTransport;
use crate::notifications::{templates, EmailMessage, EmailSender};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{error, info, warn};

const DEFAULT_BRAND: &str = "Property Listings";

/// Queues outbound emails and delivers them from a background worker.
///
/// Queueing never fails the caller: when email is disabled or the queue is
/// full the message is logged and dropped.
#[derive(Clone)]
pub struct NotificationService {
    config: NotificationConfig,
    notification_tx: Option<mpsc::Sender<EmailMessage>>,
    counters: Arc<Counters>,
}

#[derive(Default)]
struct Counters {
    sent: AtomicU64,
    failed: AtomicU64,
    dropped: AtomicU64,
}

#[derive(Debug, Clone)]
pub struct NotificationStats {
    pub email_enabled: bool,
    pub queue_capacity: usize,
    pub sent: u64,
    pub failed: u64,
    pub dropped: u64,
}

impl NotificationService {
    /// Create a new notification service, spawning the SMTP worker if email
    /// is enabled and fully configured
    pub fn new(config: NotificationConfig) -> Result<Self> {
        if !config.email_enabled {
            info!("Email notifications disabled");
            return Ok(Self::disabled(config));
        }

        let (Some(server), Some(from)) = (config.smtp_server.as_ref(), config.email_from.as_ref())
        else {
            warn!("Email notifications enabled but SMTP server or from address not configured");
            return Ok(Self::disabled(config));
        };

        let username = config
            .smtp_username_env
            .as_ref()
            .and_then(|env_var| std::env::var(env_var).ok());

        let password = config
            .smtp_password_env
            .as_ref()
            .and_then(|env_var| std::env::var(env_var).ok());

        let sender = EmailSender::new(
            server,
            config.smtp_port,
            username,
            password,
            from,
            config.email_from_name.clone(),
            config.smtp_use_tls,
        )?;

        Ok(Self::with_transport(config, Arc::new(sender)))
    }

    /// Service that logs and drops every message
    pub fn disabled(config: NotificationConfig) -> Self {
        Self {
            config,
            notification_tx: None,
            counters: Arc::new(Counters::default()),
        }
    }

    /// Service delivering through an arbitrary transport
    pub fn with_transport(config: NotificationConfig, transport: Arc<dyn MailTransport>) -> Self {
        let (notification_tx, notification_rx) = mpsc::channel(config.queue_size.max(1));

        let service = Self {
            config,
            notification_tx: Some(notification_tx),
            counters: Arc::new(Counters::default()),
        };
        service.spawn_worker(transport, notification_rx);

        info!(
            queue_size = service.config.queue_size,
            max_retries = service.config.max_retries,
            "Notification service initialized"
        );
        service
    }

    fn brand(&self) -> &str {
        self.config.email_from_name.as_deref().unwrap_or(DEFAULT_BRAND)
    }

    /// Queue a message for delivery
    pub fn queue(&self, message: EmailMessage) {
        let Some(tx) = &self.notification_tx else {
            info!(to = %message.to, subject = %message.subject, "Email disabled, notification dropped");
            self.counters.dropped.fetch_add(1, Ordering::Relaxed);
            return;
        };

        if let Err(e) = tx.try_send(message) {
            warn!(error = %e, "Failed to queue notification");
            self.counters.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Alert the admin about a contact form and confirm receipt to the sender
    pub fn notify_contact_submission(&self, submission: &ContactSubmission) {
        match &self.config.admin_email {
            Some(admin) => self.queue(templates::contact_admin(submission, admin, self.brand())),
            None => warn!(submission_id = %submission.id, "No admin email configured, skipping admin alert"),
        }
        self.queue(templates::contact_confirmation(submission, self.brand()));
    }

    /// Alert the admin about an inquiry and confirm it to the user
    pub fn notify_inquiry(&self, inquiry: &Inquiry, property_title: &str, user: &Actor) {
        match &self.config.admin_email {
            Some(admin) => self.queue(templates::inquiry_admin(
                inquiry,
                property_title,
                user,
                admin,
                self.brand(),
            )),
            None => warn!(inquiry_id = %inquiry.id, "No admin email configured, skipping admin alert"),
        }
        self.queue(templates::inquiry_confirmation(
            inquiry,
            property_title,
            user,
            self.brand(),
        ));
    }

    fn spawn_worker(
        &self,
        transport: Arc<dyn MailTransport>,
        mut notification_rx: mpsc::Receiver<EmailMessage>,
    ) {
        let max_retries = self.config.max_retries;
        let retry_backoff = self.config.retry_backoff_secs;
        let counters = self.counters.clone();

        tokio::spawn(async move {
            info!("Notification worker started");

            while let Some(message) = notification_rx.recv().await {
                let mut attempts = 0;
                let mut success = false;

                while attempts <= max_retries && !success {
                    if attempts > 0 {
                        let delay = retry_delay_secs(retry_backoff, attempts);
                        info!(
                            to = %message.to,
                            attempt = attempts + 1,
                            delay_secs = delay,
                            "Retrying notification"
                        );
                        sleep(Duration::from_secs(delay)).await;
                    }

                    match transport.deliver(&message).await {
                        Ok(()) => success = true,
                        Err(e) => {
                            error!(
                                to = %message.to,
                                attempts = attempts + 1,
                                error = %e,
                                "Failed to send notification"
                            );
                        }
                    }

                    attempts += 1;
                }

                if success {
                    counters.sent.fetch_add(1, Ordering::Relaxed);
                } else {
                    counters.failed.fetch_add(1, Ordering::Relaxed);
                    error!(
                        to = %message.to,
                        total_attempts = attempts,
                        "Notification failed after all retries"
                    );
                }
            }

            info!("Notification worker stopped");
        });
    }

    /// Get notification statistics
    pub fn get_stats(&self) -> NotificationStats {
        NotificationStats {
            email_enabled: self.notification_tx.is_some(),
            queue_capacity: self.config.queue_size,
            sent: self.counters.sent.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
            dropped: self.counters.dropped.load(Ordering::Relaxed),
        }
    }
}

/// Longest wait between two delivery attempts
const MAX_RETRY_DELAY_SECS: u64 = 3600;

/// Exponential backoff before retry number `retry` (1-based), capped
fn retry_delay_secs(base_secs: u64, retry: u32) -> u64 {
    let factor = 2_u64.saturating_pow(retry.saturating_sub(1));
    base_secs.saturating_mul(factor).min(MAX_RETRY_DELAY_SECS)
}
