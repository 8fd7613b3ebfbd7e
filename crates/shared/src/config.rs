//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream feed and cache configuration.
    #[serde(default)]
    pub currency: CurrencyConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Currency feed configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrencyConfig {
    /// URL of the upstream XML rate sheet.
    #[serde(default = "default_feed_url")]
    pub feed_url: String,
    /// Key the fetched rate set is cached under.
    #[serde(default = "default_cache_key")]
    pub cache_key: String,
    /// How long a fetched rate set stays fresh, in minutes.
    #[serde(default = "default_cache_duration_minutes")]
    pub cache_duration_minutes: u64,
    /// Upper bound for a single upstream request, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Code of the local currency every rate is quoted against.
    #[serde(default = "default_base_code")]
    pub base_code: String,
    /// Display name of the local currency.
    #[serde(default = "default_base_name")]
    pub base_name: String,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            feed_url: default_feed_url(),
            cache_key: default_cache_key(),
            cache_duration_minutes: default_cache_duration_minutes(),
            request_timeout_secs: default_request_timeout_secs(),
            base_code: default_base_code(),
            base_name: default_base_name(),
        }
    }
}

fn default_feed_url() -> String {
    "https://www.tcmb.gov.tr/kurlar/today.xml".to_string()
}

fn default_cache_key() -> String {
    "currency_rates".to_string()
}

fn default_cache_duration_minutes() -> u64 {
    60
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_base_code() -> String {
    "TRY".to_string()
}

fn default_base_name() -> String {
    "TÜRK LİRASI".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones overriding earlier ones:
    /// `config/default`, `config/{RUN_MODE}`, then `KUR__*` variables
    /// (e.g. `KUR__CURRENCY__CACHE_DURATION_MINUTES=30`).
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("KUR").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
