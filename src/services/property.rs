use crate::error::{AppError, Result};
use crate::geo::GeoProvider;
use crate::models::{Actor, Coordinates, NewProperty, Property, PropertyPatch};
use crate::policy;
use crate::search::{fields, Predicate, PropertySearch, SearchFilters};
use crate::state::{decode_all, Collection, DocumentStore};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

/// Listing CRUD plus the search entry points
#[derive(Clone)]
pub struct PropertyService {
    store: Arc<dyn DocumentStore>,
    geo: Arc<dyn GeoProvider>,
    search: PropertySearch,
}

impl PropertyService {
    pub fn new(store: Arc<dyn DocumentStore>, geo: Arc<dyn GeoProvider>, search: PropertySearch) -> Self {
        Self { store, geo, search }
    }

    pub fn search_config(&self) -> &crate::config::SearchConfig {
        self.search.config()
    }

    async fn resolve_coordinates(&self, request: &NewProperty) -> Result<Coordinates> {
        if let Some(coordinates) = request.coordinates {
            return Ok(coordinates);
        }

        let address = request.address.full_address();
        self.geo.geocode(&address).await?.ok_or_else(|| {
            AppError::Validation("Unable to geocode the provided address".to_string())
        })
    }

    /// Create a listing. Agents always list under their own id.
    pub async fn create(&self, request: NewProperty, actor: &Actor) -> Result<Property> {
        policy::ensure_can_create_listing(actor)?;
        request.validate()?;

        let coordinates = self.resolve_coordinates(&request).await?;
        let agent_id = if actor.is_agent() {
            Some(actor.id.clone())
        } else {
            request.agent_id.clone()
        };

        let property = Property::new(request, coordinates, agent_id);
        self.store
            .insert(
                Collection::Properties,
                &property.id.to_string(),
                property.to_document()?,
            )
            .await?;

        info!(property_id = %property.id, actor_id = %actor.id, "Property created");
        Ok(property)
    }

    pub async fn get(&self, id: &Uuid) -> Result<Property> {
        let doc = self
            .store
            .get(Collection::Properties, &id.to_string())
            .await?
            .ok_or_else(|| AppError::NotFound("Property not found".to_string()))?;

        Property::from_document(doc).map_err(|e| {
            warn!(property_id = %id, error = %e, "Stored property is malformed");
            AppError::NotFound("Property not found".to_string())
        })
    }

    /// Apply a partial update. A new address is geocoded unless the patch
    /// also carries coordinates; a geocoding miss keeps the old coordinates.
    pub async fn update(&self, id: &Uuid, mut patch: PropertyPatch, actor: &Actor) -> Result<Property> {
        patch.validate()?;

        let mut property = self.get(id).await?;
        policy::ensure_can_modify_listing(actor, &property)?;

        if let (Some(address), None) = (&patch.address, patch.coordinates) {
            let full_address = address.full_address();
            match self.geo.geocode(&full_address).await? {
                Some(coordinates) => patch.coordinates = Some(coordinates),
                None => warn!(property_id = %id, "New address could not be geocoded, keeping coordinates"),
            }
        }

        if !property.apply(&patch) {
            return Err(AppError::Validation(
                "No changes were made to the property".to_string(),
            ));
        }

        let replaced = self
            .store
            .replace(Collection::Properties, &id.to_string(), property.to_document()?)
            .await?;
        if !replaced {
            return Err(AppError::NotFound("Property not found".to_string()));
        }

        info!(property_id = %id, actor_id = %actor.id, "Property updated");
        Ok(property)
    }

    pub async fn delete(&self, id: &Uuid, actor: &Actor) -> Result<()> {
        let property = self.get(id).await?;
        policy::ensure_can_modify_listing(actor, &property)?;

        if !self.store.delete(Collection::Properties, &id.to_string()).await? {
            return Err(AppError::NotFound("Property not found".to_string()));
        }

        info!(property_id = %id, actor_id = %actor.id, "Property deleted");
        Ok(())
    }

    /// Every listing assigned to `agent_id`
    pub async fn list_by_agent(&self, agent_id: &str) -> Result<Vec<Property>> {
        let predicate = Predicate::all().with_eq(fields::AGENT_ID, agent_id);
        let docs = self
            .store
            .find(
                Collection::Properties,
                &predicate,
                Some(self.search.config().max_results),
            )
            .await?;

        Ok(decode_all(docs, "property"))
    }

    pub async fn search(&self, filters: &SearchFilters) -> Result<Vec<Property>> {
        self.search.search(filters).await
    }

    pub async fn nearby(&self, center: Coordinates, radius_miles: f64, limit: usize) -> Result<Vec<Property>> {
        self.search.find_nearby(center, radius_miles, limit).await
    }

    pub async fn near_property(&self, id: &Uuid, radius_miles: f64, limit: usize) -> Result<Vec<Property>> {
        self.search.find_near_property(id, radius_miles, limit).await
    }
}
