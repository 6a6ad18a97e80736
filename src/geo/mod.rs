//! Geocoding and distance capability

mod google;

pub use google::GoogleMapsProvider;

use crate::error::Result;
use crate::models::{Address, Coordinates, Directions, Place, PlaceDetails, TravelMode};
use async_trait::async_trait;

/// Mean Earth radius in statute miles
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Kilometres per statute mile
pub const KM_PER_MILE: f64 = 1.60934;

/// Address ↔ coordinates resolution plus point-to-point distance.
///
/// Distances are in miles, the unit of every radius in the search layer.
#[async_trait]
pub trait GeoProvider: Send + Sync {
    /// Resolve an address; `None` when the provider finds nothing
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>>;

    async fn reverse_geocode(&self, coordinates: Coordinates) -> Result<Option<Address>>;

    /// Distance in miles
    async fn distance(&self, from: Coordinates, to: Coordinates) -> Result<f64>;

    /// Whether address lookups can reach a real backend
    fn is_configured(&self) -> bool;

    /// Points of interest of `place_type` within `radius_meters`; empty when
    /// the provider has no places backend
    async fn nearby_places(
        &self,
        _center: Coordinates,
        _place_type: &str,
        _radius_meters: u32,
    ) -> Result<Vec<Place>> {
        Ok(Vec::new())
    }

    async fn place_details(&self, _place_id: &str) -> Result<Option<PlaceDetails>> {
        Ok(None)
    }

    /// Route between two points; `None` when no route is known
    async fn directions(
        &self,
        _origin: Coordinates,
        _destination: Coordinates,
        _mode: TravelMode,
    ) -> Result<Option<Directions>> {
        Ok(None)
    }

    /// URL of a rendered map image, if the provider supports one
    fn static_map_url(
        &self,
        _center: Coordinates,
        _zoom: u8,
        _size: &str,
        _markers: &[Coordinates],
    ) -> Option<String> {
        None
    }
}

/// Great-circle distance on a spherical Earth
pub fn haversine_miles(from: Coordinates, to: Coordinates) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let dlat = lat2 - lat1;
    let dlng = (to.longitude - from.longitude).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_MILES * a.sqrt().min(1.0).asin()
}

pub fn miles_to_km(miles: f64) -> f64 {
    miles * KM_PER_MILE
}

/// Offline provider: haversine distances, no address lookups
#[derive(Debug, Clone, Default)]
pub struct HaversineProvider;

#[async_trait]
impl GeoProvider for HaversineProvider {
    async fn geocode(&self, address: &str) -> Result<Option<Coordinates>> {
        tracing::warn!(address, "Geocoding not configured, address not resolved");
        Ok(None)
    }

    async fn reverse_geocode(&self, _coordinates: Coordinates) -> Result<Option<Address>> {
        Ok(None)
    }

    async fn distance(&self, from: Coordinates, to: Coordinates) -> Result<f64> {
        Ok(haversine_miles(from, to))
    }

    fn is_configured(&self) -> bool {
        false
    }
}
