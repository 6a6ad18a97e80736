pub mod handlers;
pub mod identity;
pub mod routes;

pub use routes::*;

use crate::geo::GeoProvider;
use crate::services::{ContactService, PropertyService};
use std::sync::Arc;
use std::time::Instant;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub properties: PropertyService,
    pub contacts: ContactService,
    pub geo: Arc<dyn GeoProvider>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(properties: PropertyService, contacts: ContactService, geo: Arc<dyn GeoProvider>) -> Self {
        Self {
            properties,
            contacts,
            geo,
            started_at: Instant::now(),
        }
    }
}
