use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Document store configuration
    #[serde(default)]
    pub state: StateConfig,

    /// Search and radius resolution limits
    #[serde(default)]
    pub search: SearchConfig,

    /// Geocoding provider configuration
    #[serde(default)]
    pub maps: MapsConfig,

    /// Notification configuration
    #[serde(default)]
    pub notifications: NotificationConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from the embedded defaults, an optional file and the environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/local.toml".to_string());

        config::Config::builder()
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            .add_source(config::File::with_name(&config_path).required(false))
            // Environment overrides, e.g. LISTINGS__SERVER__HTTP_PORT=9090
            .add_source(
                config::Environment::with_prefix("LISTINGS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// Request timeout (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Allow any origin
    #[serde(default = "default_true")]
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
            request_timeout_secs: default_request_timeout(),
            cors_permissive: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    /// Store backend type
    #[serde(default)]
    pub backend: StateBackend,

    /// Path for the embedded database
    pub path: Option<PathBuf>,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            backend: StateBackend::Memory,
            path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum StateBackend {
    #[default]
    Sled,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum documents fetched by a single filter query
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Radius used when a nearby request omits it (miles)
    #[serde(default = "default_radius_miles")]
    pub default_radius_miles: f64,

    /// Largest accepted radius (miles)
    #[serde(default = "default_max_radius_miles")]
    pub max_radius_miles: f64,

    /// Result limit used when a nearby request omits it
    #[serde(default = "default_nearby_limit")]
    pub default_nearby_limit: usize,

    /// Largest accepted nearby result limit
    #[serde(default = "default_max_nearby_limit")]
    pub max_nearby_limit: usize,

    /// Result limit for "near this listing" requests
    #[serde(default = "default_property_nearby_limit")]
    pub default_property_nearby_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            default_radius_miles: default_radius_miles(),
            max_radius_miles: default_max_radius_miles(),
            default_nearby_limit: default_nearby_limit(),
            max_nearby_limit: default_max_nearby_limit(),
            default_property_nearby_limit: default_property_nearby_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapsConfig {
    /// Environment variable holding the Google Maps API key
    #[serde(default = "default_maps_key_env")]
    pub api_key_env: String,

    /// Base URL of the Maps web services
    #[serde(default = "default_maps_base_url")]
    pub api_base_url: String,

    /// HTTP timeout (seconds)
    #[serde(default = "default_maps_timeout")]
    pub timeout_secs: u64,

    /// Cache successful geocoding results per address
    #[serde(default = "default_true")]
    pub cache_geocoding: bool,
}

impl Default for MapsConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_maps_key_env(),
            api_base_url: default_maps_base_url(),
            timeout_secs: default_maps_timeout(),
            cache_geocoding: true,
        }
    }
}

impl MapsConfig {
    /// Resolve the API key from the configured environment variable
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Enable email notifications
    #[serde(default)]
    pub email_enabled: bool,

    /// SMTP server
    pub smtp_server: Option<String>,

    /// SMTP port
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// Use STARTTLS for SMTP
    #[serde(default = "default_true")]
    pub smtp_use_tls: bool,

    /// SMTP username (from env var)
    pub smtp_username_env: Option<String>,

    /// SMTP password (from env var)
    pub smtp_password_env: Option<String>,

    /// From email address
    pub email_from: Option<String>,

    /// From email name
    pub email_from_name: Option<String>,

    /// Recipient of contact form and inquiry alerts
    pub admin_email: Option<String>,

    /// Notification queue size
    #[serde(default = "default_queue_size")]
    pub queue_size: usize,

    /// Max retry attempts
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Retry backoff (seconds)
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff_secs: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            email_enabled: false,
            smtp_server: None,
            smtp_port: default_smtp_port(),
            smtp_use_tls: true,
            smtp_username_env: None,
            smtp_password_env: None,
            email_from: None,
            email_from_name: None,
            admin_email: None,
            queue_size: default_queue_size(),
            max_retries: default_max_retries(),
            retry_backoff_secs: default_retry_backoff(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logs: bool,

    /// Service name
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
            service_name: default_service_name(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

fn default_max_results() -> usize {
    1000
}

fn default_radius_miles() -> f64 {
    5.0
}

fn default_max_radius_miles() -> f64 {
    50.0
}

fn default_nearby_limit() -> usize {
    50
}

fn default_max_nearby_limit() -> usize {
    100
}

fn default_property_nearby_limit() -> usize {
    20
}

fn default_maps_key_env() -> String {
    "GOOGLE_MAPS_API_KEY".to_string()
}

fn default_maps_base_url() -> String {
    "https://maps.googleapis.com".to_string()
}

fn default_maps_timeout() -> u64 {
    10
}

fn default_smtp_port() -> u16 {
    587
}

fn default_queue_size() -> usize {
    1000
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_backoff() -> u64 {
    5
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_service_name() -> String {
    "property-listings".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        assert_eq!(default_http_port(), 8080);
        assert_eq!(default_max_results(), 1000);
        assert_eq!(default_radius_miles(), 5.0);
        assert_eq!(default_nearby_limit(), 50);
        assert_eq!(default_max_nearby_limit(), 100);
        assert_eq!(default_log_level(), "info");
        assert!(default_true());
    }

    #[test]
    fn test_embedded_defaults_parse() {
        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.state.backend, StateBackend::Sled);
        assert_eq!(config.search.max_results, 1000);
        assert_eq!(config.search.default_property_nearby_limit, 20);
        assert_eq!(config.maps.api_key_env, "GOOGLE_MAPS_API_KEY");
        assert!(!config.notifications.email_enabled);
    }

    #[test]
    fn test_default_state_backend_is_memory_without_file() {
        assert_eq!(Config::default().state.backend, StateBackend::Memory);
        assert_eq!(StateBackend::default(), StateBackend::Sled);
    }
}
