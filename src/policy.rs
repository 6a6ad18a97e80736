//! Authorization rules, checked by services before any business logic runs

use crate::error::{AppError, Result};
use crate::models::{Actor, Inquiry, Property};

/// Admins and agents may create listings
pub fn ensure_can_create_listing(actor: &Actor) -> Result<()> {
    if actor.is_admin() || actor.is_agent() {
        Ok(())
    } else {
        Err(AppError::Authorization(
            "Only admins and agents can create properties".to_string(),
        ))
    }
}

/// Admins may modify any listing, agents only their own
pub fn ensure_can_modify_listing(actor: &Actor, listing: &Property) -> Result<()> {
    if actor.is_admin() {
        return Ok(());
    }
    if !actor.is_agent() {
        return Err(AppError::Authorization(
            "Only admins and agents can modify properties".to_string(),
        ));
    }
    if listing.agent_id.as_deref() != Some(actor.id.as_str()) {
        return Err(AppError::Authorization(
            "You can only modify your own properties".to_string(),
        ));
    }
    Ok(())
}

pub fn ensure_agent(actor: &Actor) -> Result<()> {
    if actor.is_agent() {
        Ok(())
    } else {
        Err(AppError::Authorization(
            "Only agents can access this endpoint".to_string(),
        ))
    }
}

pub fn ensure_admin(actor: &Actor) -> Result<()> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(AppError::Authorization("Admin access required".to_string()))
    }
}

/// Inquiry owners and admins
pub fn ensure_can_view_inquiry(actor: &Actor, inquiry: &Inquiry) -> Result<()> {
    if actor.is_admin() || inquiry.user_id == actor.id {
        Ok(())
    } else {
        Err(AppError::Authorization(
            "Not authorized to view this inquiry".to_string(),
        ))
    }
}
