//! Caller identity forwarded by the authenticating gateway

use crate::error::AppError;
use crate::models::{Actor, UserRole};
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";
pub const USER_EMAIL_HEADER: &str = "x-user-email";
pub const USER_NAME_HEADER: &str = "x-user-name";

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Extracts the [`Actor`] from trusted identity headers.
///
/// A missing user id rejects with 401; a missing role means a plain user.
/// Use `Option<Actor>` on routes where identity is optional.
#[async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = header(parts, USER_ID_HEADER)
            .ok_or_else(|| AppError::Authentication("Not authenticated".to_string()))?;

        let role = match header(parts, USER_ROLE_HEADER) {
            Some(role) => role
                .parse::<UserRole>()
                .map_err(|_| AppError::Authentication(format!("Unknown role '{}'", role)))?,
            None => UserRole::User,
        };

        Ok(Actor::new(
            id,
            header(parts, USER_EMAIL_HEADER).unwrap_or_default(),
            header(parts, USER_NAME_HEADER).unwrap_or_default(),
            role,
        ))
    }
}
