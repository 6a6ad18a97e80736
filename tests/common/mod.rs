//! Shared fixtures for integration tests: listing builders, a store that
//! counts its queries, scripted geo providers and log capture.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use property_listings::{
    config::SearchConfig,
    error::{AppError, Result},
    geo::{haversine_miles, GeoProvider},
    models::{Address, Coordinates, Property, PropertyStatus, PropertyType},
    search::{Predicate, PropertySearch},
    state::{Collection, DocumentStore, InMemoryStore},
};
use serde_json::Value;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;
use uuid::Uuid;

pub fn address() -> Address {
    Address {
        street: "100 Main St".to_string(),
        city: "Jersey City".to_string(),
        state: "NJ".to_string(),
        zip_code: "07302".to_string(),
        country: "United States".to_string(),
        full_address: None,
    }
}

/// Listing with a fixed id so store order is predictable
pub fn property_with_id(id: u128, lat: f64, lng: f64) -> Property {
    let now = Utc::now();
    Property {
        id: Uuid::from_u128(id),
        title: format!("Listing {}", id),
        property_type: PropertyType::House,
        status: PropertyStatus::Available,
        price: 300_000,
        bedrooms: Some(3),
        bathrooms: Some(2.0),
        square_feet: Some(1600),
        description: None,
        features: vec![],
        images: vec![],
        address: address(),
        coordinates: Coordinates::new(lat, lng),
        agent_id: None,
        created_at: now,
        updated_at: now,
    }
}

pub async fn seed(store: &dyn DocumentStore, properties: &[Property]) {
    for property in properties {
        store
            .insert(
                Collection::Properties,
                &property.id.to_string(),
                property.to_document().unwrap(),
            )
            .await
            .unwrap();
    }
}

/// In-memory store that counts reads
#[derive(Default)]
pub struct CountingStore {
    inner: InMemoryStore,
    finds: AtomicUsize,
    gets: AtomicUsize,
}

impl CountingStore {
    pub fn finds(&self) -> usize {
        self.finds.load(Ordering::SeqCst)
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for CountingStore {
    async fn insert(&self, collection: Collection, id: &str, doc: Value) -> Result<()> {
        self.inner.insert(collection, id, doc).await
    }

    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(collection, id).await
    }

    async fn replace(&self, collection: Collection, id: &str, doc: Value) -> Result<bool> {
        self.inner.replace(collection, id, doc).await
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<bool> {
        self.inner.delete(collection, id).await
    }

    async fn find(
        &self,
        collection: Collection,
        predicate: &Predicate,
        limit: Option<usize>,
    ) -> Result<Vec<Value>> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        self.inner.find(collection, predicate, limit).await
    }
}

enum DistanceMode {
    Haversine,
    Fixed(f64),
    Failing,
}

/// Scripted geo provider that counts distance calls
pub struct StubGeo {
    geocoded: Option<Coordinates>,
    mode: DistanceMode,
    distance_calls: AtomicUsize,
}

impl StubGeo {
    fn with_mode(mode: DistanceMode) -> Self {
        Self {
            geocoded: None,
            mode,
            distance_calls: AtomicUsize::new(0),
        }
    }

    pub fn haversine() -> Self {
        Self::with_mode(DistanceMode::Haversine)
    }

    /// Every pair is `miles` apart
    pub fn fixed(miles: f64) -> Self {
        Self::with_mode(DistanceMode::Fixed(miles))
    }

    /// Every distance call fails
    pub fn failing() -> Self {
        Self::with_mode(DistanceMode::Failing)
    }

    /// Geocodes every address to `coordinates`
    pub fn geocoding_to(mut self, coordinates: Coordinates) -> Self {
        self.geocoded = Some(coordinates);
        self
    }

    pub fn distance_calls(&self) -> usize {
        self.distance_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeoProvider for StubGeo {
    async fn geocode(&self, _address: &str) -> Result<Option<Coordinates>> {
        Ok(self.geocoded)
    }

    async fn reverse_geocode(&self, _coordinates: Coordinates) -> Result<Option<Address>> {
        Ok(self.geocoded.map(|_| address()))
    }

    async fn distance(&self, from: Coordinates, to: Coordinates) -> Result<f64> {
        self.distance_calls.fetch_add(1, Ordering::SeqCst);
        match self.mode {
            DistanceMode::Haversine => Ok(haversine_miles(from, to)),
            DistanceMode::Fixed(miles) => Ok(miles),
            DistanceMode::Failing => Err(AppError::Geocoding("distance service down".to_string())),
        }
    }

    fn is_configured(&self) -> bool {
        self.geocoded.is_some()
    }
}

pub fn search_over(store: Arc<CountingStore>, geo: Arc<StubGeo>) -> PropertySearch {
    PropertySearch::new(store, geo, SearchConfig::default())
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Records WARN and above emitted on the current thread until dropped
pub struct LogCapture {
    buffer: LogBuffer,
    _guard: tracing::subscriber::DefaultGuard,
}

impl LogCapture {
    pub fn install() -> Self {
        let buffer = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buffer.clone())
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .finish();

        Self {
            buffer,
            _guard: tracing::subscriber::set_default(subscriber),
        }
    }

    pub fn lines_containing(&self, needle: &str) -> Vec<String> {
        let bytes = self.buffer.0.lock().unwrap().clone();
        String::from_utf8_lossy(&bytes)
            .lines()
            .filter(|line| line.contains(needle))
            .map(str::to_string)
            .collect()
    }
}
