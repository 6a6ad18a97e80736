use crate::api::AppState;
use crate::error::Result;
use crate::models::{
    Actor, ContactForm, ContactReceipt, ContactStatus, ContactSubmission, Inquiry, InquiryStatus,
    NewInquiry,
};
use crate::services::parse_status;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
pub struct SubmissionListParams {
    pub status_filter: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct InquiryListParams {
    pub status_filter: Option<String>,
    pub property_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateParams {
    pub new_status: String,
    pub response_message: Option<String>,
}

/// Public contact form
pub async fn submit_contact(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> Result<(StatusCode, Json<ContactReceipt>)> {
    let receipt = state.contacts.submit_contact(form).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

pub async fn list_submissions(
    State(state): State<AppState>,
    actor: Actor,
    Query(params): Query<SubmissionListParams>,
) -> Result<Json<Vec<ContactSubmission>>> {
    let status = params
        .status_filter
        .as_deref()
        .map(parse_status::<ContactStatus>)
        .transpose()?;

    Ok(Json(state.contacts.list_submissions(status, &actor).await?))
}

pub async fn update_submission_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    actor: Actor,
    Query(params): Query<StatusUpdateParams>,
) -> Result<Json<ContactSubmission>> {
    Ok(Json(
        state
            .contacts
            .update_submission_status(&id, &params.new_status, &actor)
            .await?,
    ))
}

pub async fn create_inquiry(
    State(state): State<AppState>,
    actor: Actor,
    Json(request): Json<NewInquiry>,
) -> Result<(StatusCode, Json<Inquiry>)> {
    let inquiry = state.contacts.create_inquiry(request, &actor).await?;
    Ok((StatusCode::CREATED, Json(inquiry)))
}

pub async fn list_inquiries(
    State(state): State<AppState>,
    actor: Actor,
    Query(params): Query<InquiryListParams>,
) -> Result<Json<Vec<Inquiry>>> {
    let status = params
        .status_filter
        .as_deref()
        .map(parse_status::<InquiryStatus>)
        .transpose()?;

    Ok(Json(
        state
            .contacts
            .list_inquiries(status, params.property_id, &actor)
            .await?,
    ))
}

pub async fn my_inquiries(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<Vec<Inquiry>>> {
    Ok(Json(state.contacts.my_inquiries(&actor).await?))
}

pub async fn get_inquiry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    actor: Actor,
) -> Result<Json<Inquiry>> {
    Ok(Json(state.contacts.get_inquiry(&id, &actor).await?))
}

pub async fn update_inquiry_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    actor: Actor,
    Query(params): Query<StatusUpdateParams>,
) -> Result<Json<Inquiry>> {
    Ok(Json(
        state
            .contacts
            .update_inquiry_status(&id, &params.new_status, params.response_message, &actor)
            .await?,
    ))
}
