use crate::models::Coordinates;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Largest radius accepted by the places search (metres)
pub const MAX_PLACES_RADIUS_METERS: u32 = 50_000;

/// Point of interest near a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub place_id: String,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: Option<u32>,
    #[serde(default)]
    pub vicinity: String,
    pub coordinates: Coordinates,
}

/// Full record for a single place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceDetails {
    pub name: String,
    pub place_id: String,
    #[serde(default)]
    pub formatted_address: String,
    #[serde(default)]
    pub formatted_phone_number: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub user_ratings_total: Option<u32>,
    #[serde(default)]
    pub types: Vec<String>,
    /// One human-readable line per weekday
    #[serde(default)]
    pub opening_hours: Vec<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TravelMode {
    #[default]
    Driving,
    Walking,
    Transit,
    Bicycling,
}

/// First leg of the first route between two points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Directions {
    /// Provider-formatted, e.g. "5.2 mi"
    pub distance: String,
    pub duration: String,
    pub start_address: String,
    pub end_address: String,
    pub steps: Vec<DirectionStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionStep {
    /// HTML-formatted instruction
    pub instruction: String,
    pub distance: String,
    pub duration: String,
}
