use crate::config::MapsConfig;
use crate::error::{AppError, Result};
use crate::geo::{haversine_miles, GeoProvider};
use crate::models::{
    Address, Coordinates, DirectionStep, Directions, Place, PlaceDetails, TravelMode,
    MAX_PLACES_RADIUS_METERS,
};
use async_trait::async_trait;
use dashmap::DashMap;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

const GEOCODE_PATH: &str = "/maps/api/geocode/json";
const PLACES_NEARBY_PATH: &str = "/maps/api/place/nearbysearch/json";
const PLACE_DETAILS_PATH: &str = "/maps/api/place/details/json";
const DIRECTIONS_PATH: &str = "/maps/api/directions/json";
const STATIC_MAP_PATH: &str = "/maps/api/staticmap";

/// Google Maps web services client (Geocoding, Places, Directions, Static Maps).
///
/// Without an API key every lookup resolves to nothing and a warning is
/// logged. Distances never hit the network.
pub struct GoogleMapsProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    cache: Option<DashMap<String, Coordinates>>,
}

/// Envelope fields shared by every JSON web service response
#[derive(Debug, Deserialize)]
struct ApiStatus {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
}

impl ApiStatus {
    /// `Ok(true)` with results, `Ok(false)` for an empty answer
    fn check(&self, api: &str) -> Result<bool> {
        match self.status.as_str() {
            "OK" => Ok(true),
            "ZERO_RESULTS" | "NOT_FOUND" => Ok(false),
            other => Err(AppError::Geocoding(format!(
                "{} API status {}: {}",
                api,
                other,
                self.error_message.as_deref().unwrap_or_default()
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(flatten)]
    api: ApiStatus,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct PlacesResponse {
    #[serde(flatten)]
    api: ApiStatus,
    #[serde(default)]
    results: Vec<PlaceResult>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    #[serde(default)]
    name: String,
    #[serde(default)]
    place_id: String,
    #[serde(default)]
    types: Vec<String>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    user_ratings_total: Option<u32>,
    #[serde(default)]
    vicinity: String,
    geometry: Geometry,
}

impl From<PlaceResult> for Place {
    fn from(place: PlaceResult) -> Self {
        Place {
            coordinates: place.geometry.coordinates(),
            name: place.name,
            place_id: place.place_id,
            types: place.types,
            rating: place.rating,
            user_ratings_total: place.user_ratings_total,
            vicinity: place.vicinity,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PlaceDetailsResponse {
    #[serde(flatten)]
    api: ApiStatus,
    #[serde(default)]
    result: Option<PlaceDetailsResult>,
}

#[derive(Debug, Deserialize)]
struct PlaceDetailsResult {
    #[serde(default)]
    name: String,
    #[serde(default)]
    place_id: String,
    #[serde(default)]
    formatted_address: String,
    #[serde(default)]
    formatted_phone_number: Option<String>,
    #[serde(default)]
    website: Option<String>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    user_ratings_total: Option<u32>,
    #[serde(default)]
    types: Vec<String>,
    #[serde(default)]
    opening_hours: Option<OpeningHours>,
    #[serde(default)]
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
struct OpeningHours {
    #[serde(default)]
    weekday_text: Vec<String>,
}

impl From<PlaceDetailsResult> for PlaceDetails {
    fn from(result: PlaceDetailsResult) -> Self {
        PlaceDetails {
            name: result.name,
            place_id: result.place_id,
            formatted_address: result.formatted_address,
            formatted_phone_number: result.formatted_phone_number,
            website: result.website,
            rating: result.rating,
            user_ratings_total: result.user_ratings_total,
            types: result.types,
            opening_hours: result
                .opening_hours
                .map(|hours| hours.weekday_text)
                .unwrap_or_default(),
            coordinates: result.geometry.map(|g| g.coordinates()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(flatten)]
    api: ApiStatus,
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    #[serde(default)]
    legs: Vec<Leg>,
}

#[derive(Debug, Deserialize)]
struct Leg {
    distance: TextValue,
    duration: TextValue,
    #[serde(default)]
    start_address: String,
    #[serde(default)]
    end_address: String,
    #[serde(default)]
    steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
struct Step {
    #[serde(default)]
    html_instructions: String,
    distance: TextValue,
    duration: TextValue,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    text: String,
}

impl From<Leg> for Directions {
    fn from(leg: Leg) -> Self {
        Directions {
            distance: leg.distance.text,
            duration: leg.duration.text,
            start_address: leg.start_address,
            end_address: leg.end_address,
            steps: leg
                .steps
                .into_iter()
                .map(|step| DirectionStep {
                    instruction: step.html_instructions,
                    distance: step.distance.text,
                    duration: step.duration.text,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    #[serde(default)]
    formatted_address: String,
    geometry: Geometry,
    #[serde(default)]
    address_components: Vec<AddressComponent>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

impl Geometry {
    fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.location.lat, self.location.lng)
    }
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

fn latlng(point: Coordinates) -> String {
    format!("{},{}", point.latitude, point.longitude)
}

#[derive(Debug, Deserialize)]
struct AddressComponent {
    long_name: String,
    short_name: String,
    #[serde(default)]
    types: Vec<String>,
}

impl AddressComponent {
    fn is(&self, kind: &str) -> bool {
        self.types.iter().any(|t| t == kind)
    }
}

impl GeocodeResult {
    fn coordinates(&self) -> Coordinates {
        self.geometry.coordinates()
    }

    fn into_address(self) -> Address {
        let mut street_number = None;
        let mut route = None;
        let mut city = String::new();
        let mut state = String::new();
        let mut zip_code = String::new();
        let mut country = String::new();

        for component in self.address_components {
            if component.is("street_number") {
                street_number = Some(component.long_name);
            } else if component.is("route") {
                route = Some(component.long_name);
            } else if component.is("locality") {
                city = component.long_name;
            } else if component.is("administrative_area_level_1") {
                state = component.short_name;
            } else if component.is("postal_code") {
                zip_code = component.long_name;
            } else if component.is("country") {
                country = component.long_name;
            }
        }

        let street = [street_number, route]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");

        Address {
            street,
            city,
            state,
            zip_code,
            country,
            full_address: Some(self.formatted_address),
        }
    }
}

impl GoogleMapsProvider {
    /// Create a provider using the key named by `config.api_key_env`
    pub fn new(config: &MapsConfig) -> Result<Self> {
        Self::with_api_key(config, config.api_key())
    }

    pub fn with_api_key(config: &MapsConfig, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        if api_key.is_none() {
            warn!(
                env = %config.api_key_env,
                "Google Maps API key not configured, geocoding is disabled"
            );
        }

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key,
            cache: config.cache_geocoding.then(DashMap::new),
        })
    }

    /// GET a JSON web service endpoint with the API key appended
    async fn get_json<T: DeserializeOwned>(
        &self,
        key: &str,
        path: &str,
        params: &[(&str, &str)],
        api: &str,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", key)])
            .send()
            .await
            .map_err(|e| AppError::Network(format!("{} request failed: {}", api, e)))?;

        if !response.status().is_success() {
            return Err(AppError::Geocoding(format!(
                "{} API returned HTTP {}",
                api,
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Geocoding(format!("Invalid {} response: {}", api, e)))
    }

    async fn lookup(&self, key: &str, param: (&str, &str)) -> Result<Vec<GeocodeResult>> {
        let body: GeocodeResponse = self
            .get_json(key, GEOCODE_PATH, &[param], "Geocoding")
            .await?;

        if body.api.check("Geocoding")? {
            Ok(body.results)
        } else {
            Ok(Vec::new())
        }
    }
}

#[async_trait]
impl GeoProvider for GoogleMapsProvider {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>> {
        let Some(key) = &self.api_key else {
            warn!(address, "Google Maps API not configured, cannot geocode address");
            return Ok(None);
        };

        if let Some(hit) = self.cache.as_ref().and_then(|c| c.get(address)) {
            debug!(address, "Using cached geocoding result");
            return Ok(Some(*hit));
        }

        let results = self.lookup(key, ("address", address)).await?;
        let Some(coordinates) = results.first().map(GeocodeResult::coordinates) else {
            warn!(address, "No geocoding results for address");
            return Ok(None);
        };

        if let Some(cache) = &self.cache {
            cache.insert(address.to_string(), coordinates);
        }
        info!(address, "Geocoded address");
        Ok(Some(coordinates))
    }

    async fn reverse_geocode(&self, coordinates: Coordinates) -> Result<Option<Address>> {
        let Some(key) = &self.api_key else {
            warn!("Google Maps API not configured, cannot reverse geocode");
            return Ok(None);
        };

        let point = latlng(coordinates);
        let results = self.lookup(key, ("latlng", point.as_str())).await?;

        Ok(results.into_iter().next().map(GeocodeResult::into_address))
    }

    async fn nearby_places(
        &self,
        center: Coordinates,
        place_type: &str,
        radius_meters: u32,
    ) -> Result<Vec<Place>> {
        let Some(key) = &self.api_key else {
            warn!("Google Maps API not configured, cannot search for nearby places");
            return Ok(Vec::new());
        };

        let location = latlng(center);
        let radius = radius_meters.min(MAX_PLACES_RADIUS_METERS).to_string();
        let body: PlacesResponse = self
            .get_json(
                key,
                PLACES_NEARBY_PATH,
                &[
                    ("location", location.as_str()),
                    ("radius", radius.as_str()),
                    ("type", place_type),
                ],
                "Places",
            )
            .await?;

        if !body.api.check("Places")? {
            return Ok(Vec::new());
        }

        let places: Vec<Place> = body.results.into_iter().map(Place::from).collect();
        info!(count = places.len(), place_type, "Found nearby places");
        Ok(places)
    }

    async fn place_details(&self, place_id: &str) -> Result<Option<PlaceDetails>> {
        let Some(key) = &self.api_key else {
            warn!("Google Maps API not configured, cannot get place details");
            return Ok(None);
        };

        let body: PlaceDetailsResponse = self
            .get_json(key, PLACE_DETAILS_PATH, &[("place_id", place_id)], "Place Details")
            .await?;

        if !body.api.check("Place Details")? {
            warn!(place_id, "No details found for place");
            return Ok(None);
        }

        let details = body.result.map(PlaceDetails::from);
        if let Some(details) = &details {
            info!(place_id, name = %details.name, "Retrieved place details");
        }
        Ok(details)
    }

    async fn directions(
        &self,
        origin: Coordinates,
        destination: Coordinates,
        mode: TravelMode,
    ) -> Result<Option<Directions>> {
        let Some(key) = &self.api_key else {
            warn!("Google Maps API not configured, cannot get directions");
            return Ok(None);
        };

        let from = latlng(origin);
        let to = latlng(destination);
        let body: DirectionsResponse = self
            .get_json(
                key,
                DIRECTIONS_PATH,
                &[
                    ("origin", from.as_str()),
                    ("destination", to.as_str()),
                    ("mode", mode.as_ref()),
                ],
                "Directions",
            )
            .await?;

        if !body.api.check("Directions")? {
            warn!("No directions found for the given coordinates");
            return Ok(None);
        }

        let directions = body
            .routes
            .into_iter()
            .next()
            .and_then(|route| route.legs.into_iter().next())
            .map(Directions::from);

        if let Some(directions) = &directions {
            info!(
                distance = %directions.distance,
                duration = %directions.duration,
                "Retrieved directions"
            );
        }
        Ok(directions)
    }

    async fn distance(&self, from: Coordinates, to: Coordinates) -> Result<f64> {
        Ok(haversine_miles(from, to))
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn static_map_url(
        &self,
        center: Coordinates,
        zoom: u8,
        size: &str,
        markers: &[Coordinates],
    ) -> Option<String> {
        let key = self.api_key.as_deref()?;

        let mut params = vec![
            ("center".to_string(), latlng(center)),
            ("zoom".to_string(), zoom.to_string()),
            ("size".to_string(), size.to_string()),
            ("maptype".to_string(), "roadmap".to_string()),
            ("format".to_string(), "png".to_string()),
        ];
        for (i, marker) in markers.iter().enumerate() {
            params.push((
                "markers".to_string(),
                format!("color:red|label:{}|{},{}", i + 1, marker.latitude, marker.longitude),
            ));
        }
        params.push(("key".to_string(), key.to_string()));

        match Url::parse_with_params(&format!("{}{}", self.base_url, STATIC_MAP_PATH), &params) {
            Ok(url) => Some(url.to_string()),
            Err(e) => {
                warn!(error = %e, "Failed to build static map URL");
                None
            }
        }
    }
}
