//! HTTP-level tests driving the router with `tower::ServiceExt::oneshot`

mod common;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use common::{property_with_id, seed, StubGeo};
use property_listings::{
    api::{build_router, AppState},
    config::{NotificationConfig, SearchConfig, ServerConfig},
    error::INTERNAL_ERROR_MESSAGE,
    geo::GeoProvider,
    models::{Coordinates, PropertyStatus},
    notifications::NotificationService,
    search::PropertySearch,
    services::{ContactService, PropertyService},
    state::{DocumentStore, InMemoryStore},
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

async fn app_with(store: Arc<InMemoryStore>) -> Router {
    let geo = StubGeo::haversine().geocoding_to(Coordinates::new(40.7178, -74.0431));
    app_with_geo(store, Arc::new(geo)).await
}

async fn app_with_geo(store: Arc<InMemoryStore>, geo: Arc<dyn GeoProvider>) -> Router {
    let store: Arc<dyn DocumentStore> = store;

    let search = PropertySearch::new(store.clone(), geo.clone(), SearchConfig::default());
    let properties = PropertyService::new(store.clone(), geo.clone(), search);
    let contacts = ContactService::new(
        store,
        NotificationService::disabled(NotificationConfig::default()),
    );

    build_router(
        AppState::new(properties, contacts, geo),
        &ServerConfig::default(),
    )
}

async fn app() -> Router {
    app_with(Arc::new(InMemoryStore::new())).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value, identity: Option<(&str, &str)>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some((id, role)) = identity {
        builder = builder.header("x-user-id", id).header("x-user-role", role);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn listing_body() -> Value {
    json!({
        "title": "Waterfront condo",
        "property_type": "condo",
        "status": "available",
        "price": 650000,
        "bedrooms": 2,
        "bathrooms": 2.0,
        "address": {
            "street": "1 Harborside Pl",
            "city": "Jersey City",
            "state": "NJ",
            "zip_code": "07311"
        }
    })
}

#[tokio::test]
async fn test_health_check() {
    let (status, body) = send(app().await, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_create_property_as_agent() {
    let request = post_json("/api/properties", listing_body(), Some(("agent-7", "agent")));
    let (status, body) = send(app().await, request).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["agent_id"], "agent-7");
    assert_eq!(body["coordinates"]["latitude"], 40.7178);
    assert_eq!(
        body["address"]["full_address"],
        "1 Harborside Pl, Jersey City, NJ 07311"
    );
}

#[tokio::test]
async fn test_create_property_requires_identity() {
    let request = post_json("/api/properties", listing_body(), None);
    let (status, body) = send(app().await, request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "AUTHENTICATION_ERROR");
}

#[tokio::test]
async fn test_create_property_as_user_is_forbidden() {
    let request = post_json("/api/properties", listing_body(), Some(("u1", "user")));
    let (status, _) = send(app().await, request).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_search_defaults_to_available() {
    let store = Arc::new(InMemoryStore::new());
    let mut sold = property_with_id(1, 40.0, -74.0);
    sold.status = PropertyStatus::Sold;
    let available = property_with_id(2, 40.0, -74.0);
    seed(store.as_ref(), &[sold, available.clone()]).await;
    let app = app_with(store).await;

    let (status, body) = send(app.clone(), get("/api/properties/search")).await;
    assert_eq!(status, StatusCode::OK);
    let results = body.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["id"], available.id.to_string());

    let (_, body) = send(app, get("/api/properties/search?status=sold,available")).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_search_rejects_unknown_property_type() {
    let (status, body) = send(
        app().await,
        get("/api/properties/search?property_types=house,castle"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_nearby_search() {
    let store = Arc::new(InMemoryStore::new());
    let close = property_with_id(1, 40.01, -74.0);
    let far = property_with_id(2, 40.5, -74.0);
    seed(store.as_ref(), &[close.clone(), far]).await;

    let (status, body) = send(
        app_with(store).await,
        get("/api/properties/nearby?latitude=40.0&longitude=-74.0&radius_miles=5"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let results = body.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["id"], close.id.to_string());
}

#[tokio::test]
async fn test_nearby_rejects_oversized_radius() {
    let (status, body) = send(
        app().await,
        get("/api/properties/nearby?latitude=40.0&longitude=-74.0&radius_miles=500"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_nearby_unknown_property_is_not_found() {
    let uri = format!("/api/properties/{}/nearby", uuid::Uuid::new_v4());
    let (status, body) = send(app().await, get(&uri)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_contact_submission_flow() {
    let store = Arc::new(InMemoryStore::new());
    let app = app_with(store).await;

    let form = json!({
        "name": "Dana",
        "email": "dana@example.com",
        "message": "Is the condo still available?"
    });
    let (status, body) = send(app.clone(), post_json("/api/contact/submit", form, None)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].is_string());

    let request = Request::builder()
        .uri("/api/contact/submissions")
        .header("x-user-id", "u1")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(app.clone(), request).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let request = Request::builder()
        .uri("/api/contact/submissions")
        .header("x-user-id", "admin-1")
        .header("x-user-role", "admin")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["status"], "new");
}

#[tokio::test]
async fn test_contact_submission_rejects_bad_email() {
    let form = json!({ "name": "Dana", "email": "not-an-email", "message": "hi" });
    let (status, _) = send(app().await, post_json("/api/contact/submit", form, None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_distance_is_rounded() {
    let (status, body) = send(
        app().await,
        get("/api/maps/distance?origin_lat=40.0&origin_lng=-74.0&dest_lat=40.1&dest_lng=-74.0"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    // 0.1° of latitude on a 3958.8 mile sphere
    assert_eq!(body["distance_miles"], 6.91);
    assert_eq!(body["distance_km"], 11.12);
}

#[tokio::test]
async fn test_provider_failure_is_opaque_internal_error() {
    let app = app_with_geo(Arc::new(InMemoryStore::new()), Arc::new(StubGeo::failing())).await;
    let (status, body) = send(
        app,
        get("/api/maps/distance?origin_lat=40.0&origin_lng=-74.0&dest_lat=40.1&dest_lng=-74.0"),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["message"], INTERNAL_ERROR_MESSAGE);
    assert!(!body.to_string().contains("distance service down"));
}

#[tokio::test]
async fn test_directions_rejects_unknown_mode() {
    let (status, body) = send(
        app().await,
        get("/api/maps/directions?origin_lat=40&origin_lng=-74&dest_lat=40.1&dest_lng=-74&mode=flying"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_directions_without_route_is_not_found() {
    let (status, body) = send(
        app().await,
        get("/api/maps/directions?origin_lat=40&origin_lng=-74&dest_lat=40.1&dest_lng=-74&mode=walking"),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_nearby_places_radius_bounds() {
    let (status, _) = send(
        app().await,
        get("/api/maps/nearby-places?latitude=40&longitude=-74&radius=50"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        app().await,
        get("/api/maps/nearby-places?latitude=40&longitude=-74&place_type=hospital"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_place_details_is_not_found() {
    let (status, _) = send(app().await, get("/api/maps/place-details/ChIJnothing")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
