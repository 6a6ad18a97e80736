//! Filter search and radius resolution over the property store

use crate::config::SearchConfig;
use crate::error::{AppError, Result};
use crate::geo::GeoProvider;
use crate::models::{Coordinates, Property};
use crate::search::{bounding_box, build_predicate, SearchFilters};
use crate::state::{decode_all, Collection, DocumentStore};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Search entry points: direct filters, radius around a point, radius
/// around an existing listing.
#[derive(Clone)]
pub struct PropertySearch {
    store: Arc<dyn DocumentStore>,
    geo: Arc<dyn GeoProvider>,
    config: SearchConfig,
}

impl PropertySearch {
    pub fn new(store: Arc<dyn DocumentStore>, geo: Arc<dyn GeoProvider>, config: SearchConfig) -> Self {
        Self { store, geo, config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Listings matching `filters`, in id order, capped at `max_results`.
    ///
    /// Documents that fail to parse are logged and skipped.
    pub async fn search(&self, filters: &SearchFilters) -> Result<Vec<Property>> {
        let predicate = build_predicate(filters);
        debug!(constraints = predicate.len(), "Running property search");

        let docs = self
            .store
            .find(Collection::Properties, &predicate, Some(self.config.max_results))
            .await?;

        let properties: Vec<Property> = decode_all(docs, "property");
        info!(count = properties.len(), "Property search completed");
        Ok(properties)
    }

    /// Reject radius/limit values outside the configured envelope
    pub fn validate_nearby(&self, radius_miles: f64, limit: usize) -> Result<()> {
        if !radius_miles.is_finite() || radius_miles <= 0.0 {
            return Err(AppError::Validation(
                "radius_miles must be a positive number".to_string(),
            ));
        }
        if radius_miles > self.config.max_radius_miles {
            return Err(AppError::Validation(format!(
                "radius_miles must not exceed {}",
                self.config.max_radius_miles
            )));
        }
        if limit == 0 || limit > self.config.max_nearby_limit {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {}",
                self.config.max_nearby_limit
            )));
        }
        Ok(())
    }

    /// Listings within `radius_miles` of `center`.
    ///
    /// Candidates come from a bounding-box query and are distance-checked
    /// one at a time in store order; refinement stops as soon as `limit`
    /// results are collected. Results keep store order, not distance order.
    pub async fn find_nearby(
        &self,
        center: Coordinates,
        radius_miles: f64,
        limit: usize,
    ) -> Result<Vec<Property>> {
        self.validate_nearby(radius_miles, limit)?;

        let bounds = bounding_box(center, radius_miles);
        let candidates = self.search(&SearchFilters::within(bounds)).await?;
        let candidate_count = candidates.len();

        let mut nearby = Vec::with_capacity(limit.min(candidate_count));
        for property in candidates {
            if nearby.len() >= limit {
                break;
            }

            let distance = self.geo.distance(center, property.coordinates).await?;
            if distance <= radius_miles {
                nearby.push(property);
            }
        }

        info!(
            latitude = center.latitude,
            longitude = center.longitude,
            radius_miles,
            candidates = candidate_count,
            count = nearby.len(),
            "Nearby search completed"
        );
        Ok(nearby)
    }

    /// Listings near an existing listing, excluding the listing itself.
    ///
    /// The exclusion runs after the radius search, so the result may hold
    /// fewer than `limit` entries even when more neighbours exist.
    pub async fn find_near_property(
        &self,
        property_id: &Uuid,
        radius_miles: f64,
        limit: usize,
    ) -> Result<Vec<Property>> {
        self.validate_nearby(radius_miles, limit)?;

        let doc = self
            .store
            .get(Collection::Properties, &property_id.to_string())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Property {} not found", property_id)))?;

        let target = Property::from_document(doc).map_err(|e| {
            warn!(property_id = %property_id, error = %e, "Stored property is malformed");
            AppError::NotFound(format!("Property {} not found", property_id))
        })?;

        let mut nearby = self.find_nearby(target.coordinates, radius_miles, limit).await?;
        nearby.retain(|p| p.id != target.id);
        Ok(nearby)
    }
}
