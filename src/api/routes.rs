use crate::api::{handlers, AppState};
use crate::config::ServerConfig;
use axum::{
    routing::{get, post, put},
    Router,
};
use std::time::Duration;
use tower_http::{
    cors::CorsLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

/// Build the main API router
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let cors = if config.cors_permissive {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
    };

    Router::new()
        // Health
        .route("/health", get(handlers::health_check))
        // Listings
        .route(
            "/api/properties",
            get(handlers::search_properties).post(handlers::create_property),
        )
        .route("/api/properties/search", get(handlers::search_properties))
        .route("/api/properties/nearby", get(handlers::nearby_properties))
        .route("/api/properties/my/properties", get(handlers::my_properties))
        .route("/api/properties/agent/:agent_id", get(handlers::agent_properties))
        .route(
            "/api/properties/:id",
            get(handlers::get_property)
                .put(handlers::update_property)
                .delete(handlers::delete_property),
        )
        .route("/api/properties/:id/nearby", get(handlers::properties_near_property))
        // Contact and inquiries
        .route("/api/contact/submit", post(handlers::submit_contact))
        .route("/api/contact/submissions", get(handlers::list_submissions))
        .route(
            "/api/contact/submissions/:id/status",
            put(handlers::update_submission_status),
        )
        .route(
            "/api/contact/inquiries",
            post(handlers::create_inquiry).get(handlers::list_inquiries),
        )
        .route("/api/contact/inquiries/my", get(handlers::my_inquiries))
        .route("/api/contact/inquiries/:id", get(handlers::get_inquiry))
        .route(
            "/api/contact/inquiries/:id/status",
            put(handlers::update_inquiry_status),
        )
        // Maps
        .route("/api/maps/geocode", post(handlers::geocode))
        .route("/api/maps/reverse-geocode", post(handlers::reverse_geocode))
        .route("/api/maps/distance", get(handlers::distance))
        .route("/api/maps/nearby-places", get(handlers::nearby_places))
        .route("/api/maps/place-details/:place_id", get(handlers::place_details))
        .route("/api/maps/directions", get(handlers::directions))
        .route("/api/maps/static-map-url", get(handlers::static_map_url))
        .route("/api/maps/service-status", get(handlers::service_status))
        // Add state
        .with_state(state)
        // Add middleware
        .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_response(DefaultOnResponse::new().include_headers(true)),
        )
        .layer(cors)
}
