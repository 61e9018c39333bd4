//! Configuration for the Skycast weather service
//!
//! Provider base URLs default to the public Open-Meteo and Nominatim
//! endpoints and can be overridden through `SKYCAST_*` environment
//! variables, which is also how tests point the pipeline at a mock server.

use std::env;

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkycastConfig {
    /// External provider endpoints
    #[serde(default)]
    pub providers: ProviderConfig,
    /// Outbound HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Base URLs of the external providers the pipeline talks to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Forward geocoding search endpoint (also used for the reverse fallback)
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,
    /// Primary reverse geocoding endpoint
    #[serde(default = "default_reverse_geocoding_url")]
    pub reverse_geocoding_url: String,
    /// Weather forecast endpoint
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,
}

/// Outbound HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// User-Agent sent to providers (Nominatim requires one)
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port the HTTP server binds to
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com/v1/search".to_string()
}

fn default_reverse_geocoding_url() -> String {
    "https://nominatim.openstreetmap.org/reverse".to_string()
}

fn default_forecast_url() -> String {
    "https://api.open-meteo.com/v1/forecast".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("Skycast/{}", env!("CARGO_PKG_VERSION"))
}

fn default_port() -> u16 {
    3000
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            geocoding_url: default_geocoding_url(),
            reverse_geocoding_url: default_reverse_geocoding_url(),
            forecast_url: default_forecast_url(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl Default for SkycastConfig {
    fn default() -> Self {
        Self {
            providers: ProviderConfig::default(),
            http: HttpConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl SkycastConfig {
    /// Load configuration from defaults overridden by environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = env::var("SKYCAST_GEOCODING_URL") {
            config.providers.geocoding_url = url;
        }
        if let Ok(url) = env::var("SKYCAST_REVERSE_GEOCODING_URL") {
            config.providers.reverse_geocoding_url = url;
        }
        if let Ok(url) = env::var("SKYCAST_FORECAST_URL") {
            config.providers.forecast_url = url;
        }
        if let Ok(port) = env::var("SKYCAST_PORT")
            && let Ok(port) = port.parse()
        {
            config.server.port = port;
        }
        if let Ok(timeout) = env::var("SKYCAST_HTTP_TIMEOUT")
            && let Ok(timeout) = timeout.parse()
        {
            config.http.timeout_seconds = timeout;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SkycastConfig::default();
        assert!(config.providers.geocoding_url.contains("open-meteo.com"));
        assert!(config.providers.reverse_geocoding_url.contains("nominatim"));
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.http.timeout_seconds, 10);
    }

    #[test]
    fn test_user_agent_carries_version() {
        let config = SkycastConfig::default();
        assert!(config.http.user_agent.starts_with("Skycast/"));
    }
}
