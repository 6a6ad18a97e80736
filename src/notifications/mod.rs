pub mod email;
pub mod service;
pub mod templates;

pub use email::{EmailMessage, EmailSender, MailTransport};
pub use service::{NotificationService, NotificationStats};
