use crate::api::handlers::MessageResponse;
use crate::api::AppState;
use crate::error::{AppError, Result};
use crate::models::{Actor, Coordinates, MapBounds, NewProperty, Property, PropertyPatch, PropertyStatus};
use crate::policy;
use crate::search::{NumericRange, SearchFilters};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::str::FromStr;
use uuid::Uuid;

/// Query string of the listing search endpoints.
///
/// List parameters are comma separated, e.g. `property_types=house,condo`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub ne_lat: Option<f64>,
    pub ne_lng: Option<f64>,
    pub sw_lat: Option<f64>,
    pub sw_lng: Option<f64>,
    pub property_types: Option<String>,
    pub status: Option<String>,
    pub min_price: Option<u64>,
    pub max_price: Option<u64>,
    pub min_bedrooms: Option<u32>,
    pub max_bedrooms: Option<u32>,
    pub min_bathrooms: Option<f64>,
    pub max_bathrooms: Option<f64>,
    pub min_square_feet: Option<u32>,
    pub max_square_feet: Option<u32>,
}

fn parse_list<T: FromStr>(raw: &str, name: &str) -> Result<Vec<T>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse()
                .map_err(|_| AppError::Validation(format!("Invalid {} '{}'", name, s)))
        })
        .collect()
}

impl SearchParams {
    /// Convert to filters. Map bounds apply only when all four corners are
    /// given; status defaults to `available`.
    pub fn into_filters(self) -> Result<SearchFilters> {
        let bounds = match (self.sw_lat, self.sw_lng, self.ne_lat, self.ne_lng) {
            (Some(sw_lat), Some(sw_lng), Some(ne_lat), Some(ne_lng)) => Some(MapBounds::new(
                Coordinates::new(sw_lat, sw_lng),
                Coordinates::new(ne_lat, ne_lng),
            )),
            _ => None,
        };

        let property_types = self
            .property_types
            .as_deref()
            .map(|raw| parse_list(raw, "property type"))
            .transpose()?;

        let statuses = match self.status.as_deref() {
            Some(raw) => parse_list(raw, "status")?,
            None => vec![PropertyStatus::Available],
        };

        Ok(SearchFilters {
            bounds,
            property_types,
            statuses: Some(statuses),
            price: NumericRange::new(self.min_price, self.max_price),
            bedrooms: NumericRange::new(self.min_bedrooms, self.max_bedrooms),
            bathrooms: NumericRange::new(self.min_bathrooms, self.max_bathrooms),
            square_feet: NumericRange::new(self.min_square_feet, self.max_square_feet),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct NearbyParams {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_miles: Option<f64>,
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PropertyNearbyParams {
    pub radius_miles: Option<f64>,
    pub limit: Option<usize>,
}

/// Filtered listing search; serves both `/api/properties` and `/search`
pub async fn search_properties(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Property>>> {
    let filters = params.into_filters()?;
    Ok(Json(state.properties.search(&filters).await?))
}

pub async fn nearby_properties(
    State(state): State<AppState>,
    Query(params): Query<NearbyParams>,
) -> Result<Json<Vec<Property>>> {
    let config = state.properties.search_config();
    let radius = params.radius_miles.unwrap_or(config.default_radius_miles);
    let limit = params.limit.unwrap_or(config.default_nearby_limit);

    let center = Coordinates::new(params.latitude, params.longitude);
    Ok(Json(state.properties.nearby(center, radius, limit).await?))
}

pub async fn properties_near_property(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<PropertyNearbyParams>,
) -> Result<Json<Vec<Property>>> {
    let config = state.properties.search_config();
    let radius = params.radius_miles.unwrap_or(config.default_radius_miles);
    let limit = params.limit.unwrap_or(config.default_property_nearby_limit);

    Ok(Json(state.properties.near_property(&id, radius, limit).await?))
}

pub async fn create_property(
    State(state): State<AppState>,
    actor: Actor,
    Json(request): Json<NewProperty>,
) -> Result<(StatusCode, Json<Property>)> {
    let property = state.properties.create(request, &actor).await?;
    Ok((StatusCode::CREATED, Json(property)))
}

pub async fn get_property(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Property>> {
    Ok(Json(state.properties.get(&id).await?))
}

pub async fn update_property(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    actor: Actor,
    Json(patch): Json<PropertyPatch>,
) -> Result<Json<Property>> {
    Ok(Json(state.properties.update(&id, patch, &actor).await?))
}

pub async fn delete_property(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    actor: Actor,
) -> Result<Json<MessageResponse>> {
    state.properties.delete(&id, &actor).await?;
    Ok(Json(MessageResponse::new("Property deleted successfully")))
}

pub async fn agent_properties(
    State(state): State<AppState>,
    Path(agent_id): Path<String>,
) -> Result<Json<Vec<Property>>> {
    Ok(Json(state.properties.list_by_agent(&agent_id).await?))
}

/// Listings of the calling agent
pub async fn my_properties(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<Vec<Property>>> {
    policy::ensure_agent(&actor)?;
    Ok(Json(state.properties.list_by_agent(&actor.id).await?))
}
