use crate::api::AppState;
use crate::error::{AppError, Result};
use crate::geo::miles_to_km;
use crate::models::{Address, Coordinates, Directions, Place, PlaceDetails, TravelMode};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::warn;
use validator::Validate;

/// Address geocoded to check the provider in the status endpoint
const STATUS_CHECK_ADDRESS: &str = "New York, NY";

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Deserialize, Validate)]
pub struct GeocodeRequest {
    #[validate(length(min = 1, max = 500))]
    pub address: String,
}

#[derive(Debug, Serialize)]
pub struct GeocodeResponse {
    pub success: bool,
    pub address: String,
    pub coordinates: Coordinates,
}

pub async fn geocode(
    State(state): State<AppState>,
    Json(request): Json<GeocodeRequest>,
) -> Result<Json<GeocodeResponse>> {
    request.validate()?;

    let coordinates = state.geo.geocode(&request.address).await?.ok_or_else(|| {
        AppError::NotFound("Address not found or could not be geocoded".to_string())
    })?;

    Ok(Json(GeocodeResponse {
        success: true,
        address: request.address,
        coordinates,
    }))
}

#[derive(Debug, Serialize)]
pub struct ReverseGeocodeResponse {
    pub success: bool,
    pub coordinates: Coordinates,
    pub address: Address,
}

pub async fn reverse_geocode(
    State(state): State<AppState>,
    Json(coordinates): Json<Coordinates>,
) -> Result<Json<ReverseGeocodeResponse>> {
    coordinates.validate()?;

    let address = state.geo.reverse_geocode(coordinates).await?.ok_or_else(|| {
        AppError::NotFound("Address not found for the given coordinates".to_string())
    })?;

    Ok(Json(ReverseGeocodeResponse {
        success: true,
        coordinates,
        address,
    }))
}

#[derive(Debug, Deserialize)]
pub struct DistanceParams {
    pub origin_lat: f64,
    pub origin_lng: f64,
    pub dest_lat: f64,
    pub dest_lng: f64,
}

#[derive(Debug, Serialize)]
pub struct DistanceResponse {
    pub success: bool,
    pub origin: Coordinates,
    pub destination: Coordinates,
    pub distance_miles: f64,
    pub distance_km: f64,
}

pub async fn distance(
    State(state): State<AppState>,
    Query(params): Query<DistanceParams>,
) -> Result<Json<DistanceResponse>> {
    let origin = Coordinates::new(params.origin_lat, params.origin_lng);
    let destination = Coordinates::new(params.dest_lat, params.dest_lng);

    let miles = state.geo.distance(origin, destination).await?;

    Ok(Json(DistanceResponse {
        success: true,
        origin,
        destination,
        distance_miles: round2(miles),
        distance_km: round2(miles_to_km(miles)),
    }))
}

#[derive(Debug, Deserialize)]
pub struct NearbyPlacesParams {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "default_place_type")]
    pub place_type: String,
    /// Metres
    #[serde(default = "default_places_radius")]
    pub radius: u32,
}

fn default_place_type() -> String {
    "school".to_string()
}

fn default_places_radius() -> u32 {
    5000
}

pub async fn nearby_places(
    State(state): State<AppState>,
    Query(params): Query<NearbyPlacesParams>,
) -> Result<Json<Vec<Place>>> {
    if !(100..=50_000).contains(&params.radius) {
        return Err(AppError::Validation(
            "radius must be between 100 and 50000 meters".to_string(),
        ));
    }

    let center = Coordinates::new(params.latitude, params.longitude);
    center.validate()?;

    Ok(Json(
        state
            .geo
            .nearby_places(center, &params.place_type, params.radius)
            .await?,
    ))
}

#[derive(Debug, Serialize)]
pub struct PlaceDetailsResponse {
    pub success: bool,
    pub place_details: PlaceDetails,
}

pub async fn place_details(
    State(state): State<AppState>,
    Path(place_id): Path<String>,
) -> Result<Json<PlaceDetailsResponse>> {
    let place_details = state
        .geo
        .place_details(&place_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Place not found".to_string()))?;

    Ok(Json(PlaceDetailsResponse {
        success: true,
        place_details,
    }))
}

#[derive(Debug, Deserialize)]
pub struct DirectionsParams {
    pub origin_lat: f64,
    pub origin_lng: f64,
    pub dest_lat: f64,
    pub dest_lng: f64,
    #[serde(default)]
    pub mode: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DirectionsResponse {
    pub success: bool,
    pub origin: Coordinates,
    pub destination: Coordinates,
    pub mode: TravelMode,
    pub directions: Directions,
}

pub async fn directions(
    State(state): State<AppState>,
    Query(params): Query<DirectionsParams>,
) -> Result<Json<DirectionsResponse>> {
    let mode = match params.mode.as_deref() {
        None => TravelMode::default(),
        Some(mode) => mode.parse().map_err(|_| {
            AppError::Validation(
                "mode must be one of: driving, walking, transit, bicycling".to_string(),
            )
        })?,
    };

    let origin = Coordinates::new(params.origin_lat, params.origin_lng);
    let destination = Coordinates::new(params.dest_lat, params.dest_lng);

    let directions = state
        .geo
        .directions(origin, destination, mode)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("Directions not found for the given coordinates".to_string())
        })?;

    Ok(Json(DirectionsResponse {
        success: true,
        origin,
        destination,
        mode,
        directions,
    }))
}

#[derive(Debug, Deserialize)]
pub struct StaticMapParams {
    pub center_lat: f64,
    pub center_lng: f64,
    #[serde(default = "default_zoom")]
    pub zoom: u8,
    #[serde(default = "default_size")]
    pub size: String,
    pub marker_lat: Option<f64>,
    pub marker_lng: Option<f64>,
}

fn default_zoom() -> u8 {
    15
}

fn default_size() -> String {
    "400x400".to_string()
}

/// `WIDTHxHEIGHT` with both parts decimal digits
fn is_valid_size(size: &str) -> bool {
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    size.split_once('x')
        .is_some_and(|(w, h)| digits(w) && digits(h))
}

#[derive(Debug, Serialize)]
pub struct StaticMapResponse {
    pub success: bool,
    pub map_url: String,
    pub center: Coordinates,
    pub zoom: u8,
    pub size: String,
    pub markers: Vec<Coordinates>,
}

pub async fn static_map_url(
    State(state): State<AppState>,
    Query(params): Query<StaticMapParams>,
) -> Result<Json<StaticMapResponse>> {
    if !(1..=20).contains(&params.zoom) {
        return Err(AppError::Validation("zoom must be between 1 and 20".to_string()));
    }
    if !is_valid_size(&params.size) {
        return Err(AppError::Validation(
            "size must look like WIDTHxHEIGHT".to_string(),
        ));
    }

    let center = Coordinates::new(params.center_lat, params.center_lng);
    let markers = match (params.marker_lat, params.marker_lng) {
        (Some(lat), Some(lng)) => vec![Coordinates::new(lat, lng)],
        _ => Vec::new(),
    };

    let map_url = state
        .geo
        .static_map_url(center, params.zoom, &params.size, &markers)
        .ok_or_else(|| {
            AppError::Configuration("Google Maps service is not configured".to_string())
        })?;

    Ok(Json(StaticMapResponse {
        success: true,
        map_url,
        center,
        zoom: params.zoom,
        size: params.size,
        markers,
    }))
}

#[derive(Debug, Serialize)]
pub struct ServiceStatusResponse {
    pub configured: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_geocoding: Option<bool>,
}

/// Provider configuration, plus a live geocoding check when configured
pub async fn service_status(State(state): State<AppState>) -> Json<ServiceStatusResponse> {
    if !state.geo.is_configured() {
        return Json(ServiceStatusResponse {
            configured: false,
            message: "Google Maps service is not configured".to_string(),
            test_geocoding: None,
        });
    }

    let (test_geocoding, message) = match state.geo.geocode(STATUS_CHECK_ADDRESS).await {
        Ok(result) => (result.is_some(), "Google Maps service is available"),
        Err(e) => {
            warn!(error = %e, "Maps status check failed");
            (false, "Google Maps service configured but API calls are failing")
        }
    };

    Json(ServiceStatusResponse {
        configured: true,
        message: message.to_string(),
        test_geocoding: Some(test_geocoding),
    })
}
