use crate::error::{AppError, Result};
use crate::models::{
    valid_values, Actor, ContactForm, ContactReceipt, ContactStatus, ContactSubmission, Inquiry,
    InquiryStatus, NewInquiry,
};
use crate::notifications::NotificationService;
use crate::policy;
use crate::search::{fields, Predicate};
use crate::state::{decode_all, Collection, DocumentStore};
use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;
use strum::IntoEnumIterator;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

const UNKNOWN_PROPERTY: &str = "Unknown Property";

mod field {
    pub const USER_ID: &str = "user_id";
    pub const PROPERTY_ID: &str = "property_id";
}

/// Parse a workflow status, listing the accepted values on failure
pub fn parse_status<E>(value: &str) -> Result<E>
where
    E: FromStr + IntoEnumIterator + Display,
{
    value.parse().map_err(|_| {
        AppError::Validation(format!(
            "Invalid status. Must be one of: {}",
            valid_values::<E>()
        ))
    })
}

/// Contact form intake and the listing inquiry workflow
#[derive(Clone)]
pub struct ContactService {
    store: Arc<dyn DocumentStore>,
    notifications: NotificationService,
}

impl ContactService {
    pub fn new(store: Arc<dyn DocumentStore>, notifications: NotificationService) -> Self {
        Self {
            store,
            notifications,
        }
    }

    /// Store a public contact form and queue the emails
    pub async fn submit_contact(&self, form: ContactForm) -> Result<ContactReceipt> {
        form.validate()?;

        let submission = ContactSubmission::new(form);
        self.store
            .insert(
                Collection::ContactSubmissions,
                &submission.id.to_string(),
                serde_json::to_value(&submission)?,
            )
            .await?;

        self.notifications.notify_contact_submission(&submission);
        info!(submission_id = %submission.id, "Contact submission received");
        Ok(ContactReceipt::received(submission.id))
    }

    pub async fn list_submissions(
        &self,
        status: Option<ContactStatus>,
        actor: &Actor,
    ) -> Result<Vec<ContactSubmission>> {
        policy::ensure_admin(actor)?;

        let mut predicate = Predicate::all();
        if let Some(status) = status {
            predicate = predicate.with_eq(fields::STATUS, status);
        }

        let docs = self
            .store
            .find(Collection::ContactSubmissions, &predicate, None)
            .await?;
        let mut submissions: Vec<ContactSubmission> = decode_all(docs, "contact_submission");
        submissions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(submissions)
    }

    pub async fn update_submission_status(
        &self,
        id: &Uuid,
        status: &str,
        actor: &Actor,
    ) -> Result<ContactSubmission> {
        policy::ensure_admin(actor)?;
        let status: ContactStatus = parse_status(status)?;

        let key = id.to_string();
        let doc = self
            .store
            .get(Collection::ContactSubmissions, &key)
            .await?
            .ok_or_else(|| AppError::NotFound("Contact submission not found".to_string()))?;

        let mut submission: ContactSubmission = serde_json::from_value(doc)?;
        submission.set_status(status, &actor.id);

        if !self
            .store
            .replace(
                Collection::ContactSubmissions,
                &key,
                serde_json::to_value(&submission)?,
            )
            .await?
        {
            return Err(AppError::NotFound("Contact submission not found".to_string()));
        }

        info!(submission_id = %id, %status, actor_id = %actor.id, "Contact submission status updated");
        Ok(submission)
    }

    async fn property_title(&self, property_id: &Uuid) -> Result<String> {
        let title = self
            .store
            .get(Collection::Properties, &property_id.to_string())
            .await?
            .and_then(|doc| doc.get("title").and_then(|t| t.as_str()).map(String::from));

        Ok(title.unwrap_or_else(|| UNKNOWN_PROPERTY.to_string()))
    }

    /// Record an inquiry from the signed-in actor and queue the emails
    pub async fn create_inquiry(&self, request: NewInquiry, actor: &Actor) -> Result<Inquiry> {
        request.validate()?;

        let property_title = self.property_title(&request.property_id).await?;
        let inquiry = Inquiry::new(request, &actor.id);

        self.store
            .insert(
                Collection::Inquiries,
                &inquiry.id.to_string(),
                serde_json::to_value(&inquiry)?,
            )
            .await?;

        self.notifications
            .notify_inquiry(&inquiry, &property_title, actor);
        info!(inquiry_id = %inquiry.id, property_id = %inquiry.property_id, "Inquiry created");
        Ok(inquiry)
    }

    async fn find_inquiries(&self, predicate: &Predicate) -> Result<Vec<Inquiry>> {
        let docs = self
            .store
            .find(Collection::Inquiries, predicate, None)
            .await?;
        let mut inquiries: Vec<Inquiry> = decode_all(docs, "inquiry");
        inquiries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(inquiries)
    }

    pub async fn list_inquiries(
        &self,
        status: Option<InquiryStatus>,
        property_id: Option<Uuid>,
        actor: &Actor,
    ) -> Result<Vec<Inquiry>> {
        policy::ensure_admin(actor)?;

        let mut predicate = Predicate::all();
        if let Some(status) = status {
            predicate = predicate.with_eq(fields::STATUS, status);
        }
        if let Some(property_id) = property_id {
            predicate = predicate.with_eq(field::PROPERTY_ID, property_id);
        }

        self.find_inquiries(&predicate).await
    }

    pub async fn my_inquiries(&self, actor: &Actor) -> Result<Vec<Inquiry>> {
        self.find_inquiries(&Predicate::all().with_eq(field::USER_ID, &actor.id))
            .await
    }

    pub async fn get_inquiry(&self, id: &Uuid, actor: &Actor) -> Result<Inquiry> {
        let doc = self
            .store
            .get(Collection::Inquiries, &id.to_string())
            .await?
            .ok_or_else(|| AppError::NotFound("Inquiry not found".to_string()))?;

        let inquiry: Inquiry = serde_json::from_value(doc)?;
        policy::ensure_can_view_inquiry(actor, &inquiry)?;
        Ok(inquiry)
    }

    pub async fn update_inquiry_status(
        &self,
        id: &Uuid,
        status: &str,
        response: Option<String>,
        actor: &Actor,
    ) -> Result<Inquiry> {
        policy::ensure_admin(actor)?;
        let status: InquiryStatus = parse_status(status)?;

        let key = id.to_string();
        let doc = self
            .store
            .get(Collection::Inquiries, &key)
            .await?
            .ok_or_else(|| AppError::NotFound("Inquiry not found".to_string()))?;

        let mut inquiry: Inquiry = serde_json::from_value(doc)?;
        inquiry.set_status(status, response, &actor.id);

        if !self
            .store
            .replace(Collection::Inquiries, &key, serde_json::to_value(&inquiry)?)
            .await?
        {
            return Err(AppError::NotFound("Inquiry not found".to_string()));
        }

        info!(inquiry_id = %id, %status, actor_id = %actor.id, "Inquiry status updated");
        Ok(inquiry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NotificationConfig;
    use crate::models::{ContactMethod, UserRole};
    use crate::state::InMemoryStore;
    use serde_json::json;

    fn service() -> (ContactService, Arc<dyn DocumentStore>) {
        let store: Arc<dyn DocumentStore> = Arc::new(InMemoryStore::new());
        let notifications = NotificationService::disabled(NotificationConfig::default());
        (ContactService::new(store.clone(), notifications), store)
    }

    fn admin() -> Actor {
        Actor::new("admin-1", "admin@example.com", "Admin", UserRole::Admin)
    }

    fn user(id: &str) -> Actor {
        Actor::new(id, format!("{}@example.com", id), id, UserRole::User)
    }

    fn form() -> ContactForm {
        ContactForm {
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            phone: Some("555-0100".to_string()),
            message: "Please call me".to_string(),
            property_id: None,
        }
    }

    fn inquiry_request(property_id: Uuid) -> NewInquiry {
        NewInquiry {
            property_id,
            message: "Is parking included?".to_string(),
            contact_method: ContactMethod::Email,
        }
    }

    #[tokio::test]
    async fn test_submit_and_list_contact() {
        let (svc, _) = service();
        let receipt = svc.submit_contact(form()).await.unwrap();
        assert_eq!(receipt.status, "received");

        let listed = svc.list_submissions(None, &admin()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, receipt.id);
        assert_eq!(listed[0].status, ContactStatus::New);

        assert!(matches!(
            svc.list_submissions(None, &user("u1")).await,
            Err(AppError::Authorization(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_contact_form_is_rejected() {
        let (svc, _) = service();
        let mut bad = form();
        bad.email = "nope".to_string();
        assert!(matches!(svc.submit_contact(bad).await, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_submission_status() {
        let (svc, _) = service();
        let receipt = svc.submit_contact(form()).await.unwrap();

        let err = svc
            .update_submission_status(&receipt.id, "archived", &admin())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: Invalid status. Must be one of: new, in_progress, contacted, resolved, closed"
        );

        let updated = svc
            .update_submission_status(&receipt.id, "in_progress", &admin())
            .await
            .unwrap();
        assert_eq!(updated.status, ContactStatus::InProgress);
        assert_eq!(updated.updated_by.as_deref(), Some("admin-1"));

        let filtered = svc
            .list_submissions(Some(ContactStatus::InProgress), &admin())
            .await
            .unwrap();
        assert_eq!(filtered.len(), 1);

        assert!(matches!(
            svc.update_submission_status(&Uuid::new_v4(), "closed", &admin()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_inquiry_workflow() {
        let (svc, store) = service();
        let property_id = Uuid::new_v4();
        store
            .insert(
                Collection::Properties,
                &property_id.to_string(),
                json!({ "id": property_id, "title": "Sunny Loft" }),
            )
            .await
            .unwrap();

        let mine = svc
            .create_inquiry(inquiry_request(property_id), &user("u1"))
            .await
            .unwrap();
        svc.create_inquiry(inquiry_request(Uuid::new_v4()), &user("u2"))
            .await
            .unwrap();

        let own = svc.my_inquiries(&user("u1")).await.unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].id, mine.id);

        assert!(svc.get_inquiry(&mine.id, &user("u1")).await.is_ok());
        assert!(matches!(
            svc.get_inquiry(&mine.id, &user("u2")).await,
            Err(AppError::Authorization(_))
        ));

        let by_property = svc
            .list_inquiries(None, Some(property_id), &admin())
            .await
            .unwrap();
        assert_eq!(by_property.len(), 1);

        let updated = svc
            .update_inquiry_status(&mine.id, "contacted", Some("Yes it is".to_string()), &admin())
            .await
            .unwrap();
        assert_eq!(updated.status, InquiryStatus::Contacted);
        assert_eq!(updated.response.as_deref(), Some("Yes it is"));

        assert!(matches!(
            svc.update_inquiry_status(&mine.id, "resolved", None, &admin()).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_property_title_fallback() {
        let (svc, _) = service();
        assert_eq!(
            svc.property_title(&Uuid::new_v4()).await.unwrap(),
            UNKNOWN_PROPERTY
        );
    }

    #[tokio::test]
    async fn test_lists_are_newest_first() {
        let (svc, _) = service();
        let first = svc.submit_contact(form()).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = svc.submit_contact(form()).await.unwrap();

        let listed = svc.list_submissions(None, &admin()).await.unwrap();
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }
}
