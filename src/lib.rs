//! Real-estate listing backend: listing CRUD, map and radius search, and
//! contact/inquiry intake with email notification.

pub mod api;
pub mod config;
pub mod error;
pub mod geo;
pub mod models;
pub mod notifications;
pub mod policy;
pub mod search;
pub mod services;
pub mod state;

pub use error::{AppError, Result};
