use property_listings::{
    api::{build_router, AppState},
    config::Config,
    geo::{GeoProvider, GoogleMapsProvider, HaversineProvider},
    notifications::NotificationService,
    search::PropertySearch,
    services::{ContactService, PropertyService},
    state::create_store,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration before logging so the log format can follow it
    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    init_tracing(&config);

    if let Some(e) = config_error {
        tracing::warn!(error = %e, "Failed to load configuration, using defaults");
    }

    tracing::info!(
        service = %config.observability.service_name,
        "Starting property listings service v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Initialize storage backend
    tracing::info!("Storage backend: {:?}", config.state.backend);
    let store = create_store(&config.state).await?;

    // Initialize geocoding provider
    let geo: Arc<dyn GeoProvider> = match GoogleMapsProvider::new(&config.maps) {
        Ok(provider) => Arc::new(provider),
        Err(e) => {
            tracing::warn!(error = %e, "Maps provider unavailable, distances only");
            Arc::new(HaversineProvider)
        }
    };

    // Initialize notification service
    let notifications = NotificationService::new(config.notifications.clone()).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Notification service initialization failed, continuing without email");
        NotificationService::disabled(config.notifications.clone())
    });

    let search = PropertySearch::new(store.clone(), geo.clone(), config.search.clone());
    let properties = PropertyService::new(store.clone(), geo.clone(), search);
    let contacts = ContactService::new(store, notifications);

    let state = AppState::new(properties, contacts, geo);
    let app = build_router(state, &config.server);

    let addr = format!("{}:{}", config.server.host, config.server.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "property_listings={level},tower_http={level}",
            level = config.observability.log_level
        )
        .into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.observability.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
