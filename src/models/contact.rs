use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use uuid::Uuid;
use validator::Validate;

/// Public contact form payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ContactForm {
    #[validate(length(min = 1, max = 200))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[serde(default)]
    pub phone: Option<String>,

    #[validate(length(min = 1, max = 5000))]
    pub message: String,

    /// Listing the message is about, if any
    #[serde(default)]
    pub property_id: Option<Uuid>,
}

/// Stored contact form submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub message: String,
    #[serde(default)]
    pub property_id: Option<Uuid>,
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_by: Option<String>,
}

impl ContactSubmission {
    pub fn new(form: ContactForm) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: form.name,
            email: form.email,
            phone: form.phone,
            message: form.message,
            property_id: form.property_id,
            status: ContactStatus::New,
            created_at: now,
            updated_at: now,
            updated_by: None,
        }
    }

    pub fn set_status(&mut self, status: ContactStatus, actor_id: &str) {
        self.status = status;
        self.updated_at = Utc::now();
        self.updated_by = Some(actor_id.to_string());
    }
}

/// Acknowledgement returned to the contact form sender
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactReceipt {
    pub id: Uuid,
    pub status: String,
    pub message: String,
}

impl ContactReceipt {
    pub fn received(id: Uuid) -> Self {
        Self {
            id,
            status: "received".to_string(),
            message: "Thank you for your message. We'll get back to you soon!".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContactStatus {
    New,
    InProgress,
    Contacted,
    Resolved,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InquiryStatus {
    New,
    Contacted,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContactMethod {
    #[default]
    Email,
    Phone,
    InPerson,
}

/// Inquiry creation request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewInquiry {
    pub property_id: Uuid,

    #[validate(length(min = 1, max = 5000))]
    pub message: String,

    #[serde(default)]
    pub contact_method: ContactMethod,
}

/// A signed-in user's question about a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inquiry {
    pub id: Uuid,
    pub property_id: Uuid,
    pub user_id: String,
    pub message: String,
    pub contact_method: ContactMethod,
    pub status: InquiryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub updated_by: Option<String>,
}

impl Inquiry {
    pub fn new(request: NewInquiry, user_id: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            property_id: request.property_id,
            user_id: user_id.to_string(),
            message: request.message,
            contact_method: request.contact_method,
            status: InquiryStatus::New,
            created_at: now,
            updated_at: now,
            response: None,
            updated_by: None,
        }
    }

    pub fn set_status(&mut self, status: InquiryStatus, response: Option<String>, actor_id: &str) {
        self.status = status;
        if let Some(response) = response.filter(|r| !r.is_empty()) {
            self.response = Some(response);
        }
        self.updated_at = Utc::now();
        self.updated_by = Some(actor_id.to_string());
    }
}

/// Comma-separated list of every variant, for error messages
pub fn valid_values<E: IntoEnumIterator + std::fmt::Display>() -> String {
    E::iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ")
}
