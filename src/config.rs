//! Configuration management for the Sahayta application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::SahaytaError;
use crate::models::CameraFraming;
use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the Sahayta application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SahaytaConfig {
    /// Geocoding service settings
    pub geocoding: GeocodingConfig,
    /// Weather service settings
    pub weather: WeatherConfig,
    /// Map scene settings
    pub map: MapConfig,
    /// Lookup cache settings
    pub cache: CacheConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// HTTP API settings
    pub server: ServerConfig,
}

/// Geocoding (Nominatim) configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodingConfig {
    /// Base URL of the place search service
    pub base_url: String,
    /// Client identifier sent with every request, required by the service's usage policy
    pub user_agent: String,
    /// Request timeout in seconds; unset keeps the HTTP client default
    pub timeout_seconds: Option<u32>,
}

/// Weather (OpenWeatherMap) configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Weather API key, required for weather lookups
    pub api_key: Option<String>,
    /// Base URL for weather API
    pub base_url: String,
    /// Unit system passed to the service
    pub units: String,
    /// Request timeout in seconds; unset keeps the HTTP client default
    pub timeout_seconds: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Camera framing for route scenes
    pub framing: CameraFraming,
}

/// Cache configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache geocoding results (weather is never cached)
    pub enabled: bool,
    /// Entry lifetime in seconds
    pub ttl_seconds: u64,
    /// Maximum number of cached places
    pub max_entries: usize,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// Default value functions
fn default_geocoding_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_user_agent() -> String {
    "SahaytaApp/1.0".to_string()
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_units() -> String {
    "metric".to_string()
}

fn default_cache_ttl() -> u64 {
    30 * 60
}

fn default_cache_max_entries() -> usize {
    256
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_base_url(),
            user_agent: default_user_agent(),
            timeout_seconds: None,
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
            units: default_units(),
            timeout_seconds: None,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            ttl_seconds: default_cache_ttl(),
            max_entries: default_cache_max_entries(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl SahaytaConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. SAHAYTA_WEATHER__API_KEY
        builder = builder.add_source(
            Environment::with_prefix("SAHAYTA")
                .prefix_separator("_")
                .separator("__"),
        );

        let settings = builder.build().map_err(|e| {
            SahaytaError::config(format!("Failed to build configuration: {e}"))
        })?;

        let mut config: SahaytaConfig = settings.try_deserialize().map_err(|e| {
            SahaytaError::config(format!("Failed to deserialize configuration: {e}"))
        })?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sahayta").join("config.toml"))
    }

    /// Apply default values to fields left empty
    pub fn apply_defaults(&mut self) {
        if self.geocoding.base_url.is_empty() {
            self.geocoding.base_url = default_geocoding_base_url();
        }
        if self.geocoding.user_agent.is_empty() {
            self.geocoding.user_agent = default_user_agent();
        }
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.units.is_empty() {
            self.weather.units = default_units();
        }
        if self.cache.ttl_seconds == 0 {
            self.cache.ttl_seconds = default_cache_ttl();
        }
        if self.cache.max_entries == 0 {
            self.cache.max_entries = default_cache_max_entries();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        // Trailing slashes would double up when joining endpoint paths
        trim_trailing_slash(&mut self.geocoding.base_url);
        trim_trailing_slash(&mut self.weather.base_url);
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        // Weather lookups need a key, but route planning does not, so absence is fine here
        if let Some(api_key) = &self.weather.api_key {
            if api_key.is_empty() {
                return Err(SahaytaError::config(
                    "Weather API key cannot be empty if provided. Either remove it or provide a valid key.",
                )
                .into());
            }

            if api_key.len() < 8 {
                return Err(SahaytaError::config(
                    "Weather API key appears to be invalid (too short). Please check your API key.",
                )
                .into());
            }

            if api_key.len() > 100 {
                return Err(SahaytaError::config(
                    "Weather API key appears to be invalid (too long). Please check your API key.",
                )
                .into());
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        for (name, timeout) in [
            ("Geocoding", self.geocoding.timeout_seconds),
            ("Weather", self.weather.timeout_seconds),
        ] {
            if let Some(seconds) = timeout {
                if seconds == 0 || seconds > 300 {
                    return Err(SahaytaError::config(format!(
                        "{name} API timeout must be between 1 and 300 seconds"
                    ))
                    .into());
                }
            }
        }

        if self.cache.ttl_seconds > 7 * 24 * 60 * 60 {
            return Err(SahaytaError::config("Cache TTL cannot exceed 1 week").into());
        }

        if self.cache.max_entries > 100_000 {
            return Err(SahaytaError::config("Cache max entries cannot exceed 100000").into());
        }

        if self.server.port == 0 {
            return Err(SahaytaError::config("Server port cannot be 0").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(SahaytaError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(SahaytaError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if self.weather.units != "metric" {
            return Err(SahaytaError::config(
                "Weather units must be 'metric'; temperatures are reported in °C",
            )
            .into());
        }

        for (name, url) in [
            ("Geocoding", &self.geocoding.base_url),
            ("Weather", &self.weather.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(SahaytaError::config(format!(
                    "{name} API base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        if self.geocoding.user_agent.trim().is_empty() {
            return Err(SahaytaError::config("Geocoding user agent cannot be blank").into());
        }

        Ok(())
    }
}

fn trim_trailing_slash(url: &mut String) {
    while url.ends_with('/') {
        url.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = SahaytaConfig::default();
        assert_eq!(config.geocoding.base_url, "https://nominatim.openstreetmap.org");
        assert_eq!(config.geocoding.user_agent, "SahaytaApp/1.0");
        assert_eq!(config.weather.base_url, "https://api.openweathermap.org/data/2.5");
        assert_eq!(config.weather.units, "metric");
        assert!(config.weather.api_key.is_none());
        assert!(config.weather.timeout_seconds.is_none());
        assert_eq!(config.map.framing, CameraFraming::Start);
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.ttl_seconds, 1800);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.server.port, 8080);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_valid_api_key() {
        let mut config = SahaytaConfig::default();
        config.weather.api_key = Some("0123456789abcdef0123456789abcdef".to_string());
        assert!(config.validate_api_keys().is_ok());
    }

    #[test]
    fn test_config_validation_short_api_key() {
        let mut config = SahaytaConfig::default();
        config.weather.api_key = Some("abc".to_string());
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("too short"));
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = SahaytaConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_timeout_range() {
        let mut config = SahaytaConfig::default();
        config.weather.timeout_seconds = Some(500);
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Weather API timeout"));
    }

    #[test]
    fn test_config_validation_rejects_imperial_units() {
        let mut config = SahaytaConfig::default();
        config.weather.units = "imperial".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_base_url_scheme() {
        let mut config = SahaytaConfig::default();
        config.geocoding.base_url = "nominatim.openstreetmap.org".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Geocoding API base URL"));
    }

    #[test]
    fn test_apply_defaults_fills_blanks() {
        let mut config = SahaytaConfig::default();
        config.geocoding.user_agent.clear();
        config.weather.base_url = "http://localhost:9000/".to_string();
        config.cache.max_entries = 0;
        config.apply_defaults();
        assert_eq!(config.geocoding.user_agent, "SahaytaApp/1.0");
        assert_eq!(config.weather.base_url, "http://localhost:9000");
        assert_eq!(config.cache.max_entries, 256);
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[weather]
api_key = "0123456789abcdef"

[map]
framing = "fit_route"

[cache]
enabled = true
ttl_seconds = 60
"#
        )
        .unwrap();

        let config = SahaytaConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.weather.api_key.as_deref(), Some("0123456789abcdef"));
        assert_eq!(config.map.framing, CameraFraming::FitRoute);
        assert!(config.cache.enabled);
        assert_eq!(config.cache.ttl_seconds, 60);
        // Untouched sections keep their defaults
        assert_eq!(config.geocoding.user_agent, "SahaytaApp/1.0");
        assert_eq!(config.cache.max_entries, 256);
    }

    #[test]
    fn test_load_rejects_invalid_file_values() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[logging]\nformat = \"xml\"").unwrap();

        let result = SahaytaConfig::load_from_path(Some(file.path().to_path_buf()));
        assert!(result.unwrap_err().to_string().contains("Invalid log format"));
    }

    #[test]
    fn test_load_wrong_type_is_config_error() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[server]\nport = \"not-a-port\"").unwrap();

        let err = SahaytaConfig::load_from_path(Some(file.path().to_path_buf())).unwrap_err();
        let config_err = err.downcast_ref::<SahaytaError>().unwrap();
        assert!(matches!(config_err, SahaytaError::Config { .. }));
        assert_eq!(config_err.exit_code(), 2);
        assert!(err.to_string().contains("Failed to deserialize configuration"));
    }

    #[test]
    fn test_load_malformed_toml_is_config_error() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[weather\napi_key = ").unwrap();

        let err = SahaytaConfig::load_from_path(Some(file.path().to_path_buf())).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SahaytaError>(),
            Some(SahaytaError::Config { .. })
        ));
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = SahaytaConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("sahayta"));
            assert!(path.to_string_lossy().ends_with("config.toml"));
        }
    }
}
