//! Sahayta - emergency relief planning
//!
//! This library resolves place names to coordinates, fetches current weather,
//! and composes route map scenes for a start and destination.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod geocoding;
pub mod models;
pub mod planner;
pub mod telemetry;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use cache::LookupCache;
pub use config::SahaytaConfig;
pub use error::SahaytaError;
pub use geocoding::{NominatimGeocoder, PlaceLocator};
pub use models::{CameraFraming, Coordinate, Lookup, PlaceQuery, RouteScene, WeatherSnapshot};
pub use planner::{ActionOutcome, RoutePlan, RoutePlanner, WeatherMonitor, WeatherReport};
pub use weather::{OpenWeatherClient, WeatherSource};

use std::sync::Arc;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, SahaytaError>;

/// Build the geocoder described by `config`, wrapped in the lookup cache when enabled
pub fn build_locator(config: &SahaytaConfig) -> Result<Arc<dyn PlaceLocator>> {
    let geocoder = NominatimGeocoder::new(&config.geocoding)?;
    if config.cache.enabled {
        Ok(Arc::new(LookupCache::from_config(geocoder, &config.cache)))
    } else {
        Ok(Arc::new(geocoder))
    }
}

/// Build the weather monitor, failing when no API key is configured
pub fn build_weather_monitor(config: &SahaytaConfig) -> Result<WeatherMonitor> {
    let client = OpenWeatherClient::from_config(&config.weather)?;
    Ok(WeatherMonitor::new(Arc::new(client)))
}

pub fn build_route_planner(config: &SahaytaConfig) -> Result<RoutePlanner> {
    Ok(RoutePlanner::new(build_locator(config)?, config.map.framing))
}
