//! Current weather lookups against the OpenWeatherMap API
//!
//! The API key is handed to [`OpenWeatherClient::new`] by the caller; nothing
//! in here reads configuration or the environment on its own.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use crate::SahaytaError;
use crate::config::WeatherConfig;
use crate::models::{Lookup, PlaceQuery, WeatherSnapshot};

/// Provides current conditions for a place name
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Fetch current conditions for `query`.
    ///
    /// Empty queries return [`Lookup::Skipped`]; any failure is reported as
    /// [`Lookup::NotFound`] with no partial data.
    async fn current(&self, query: &PlaceQuery) -> Lookup<WeatherSnapshot>;
}

/// `OpenWeatherMap` response structures
mod openweathermap {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct CurrentResponse {
        pub main: MainData,
        #[serde(default)]
        pub weather: Vec<Condition>,
    }

    #[derive(Debug, Deserialize)]
    pub struct MainData {
        pub temp: f64,
        pub humidity: u8,
    }

    #[derive(Debug, Deserialize)]
    pub struct Condition {
        pub description: String,
    }
}

/// Weather API client for OpenWeatherMap
#[derive(Clone)]
pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
    units: String,
}

impl OpenWeatherClient {
    /// Create a new weather client with an explicitly supplied API key
    pub fn new(config: &WeatherConfig, api_key: impl Into<String>) -> crate::Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(SahaytaError::config("Weather API key cannot be empty"));
        }

        let mut builder = Client::builder();
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds.into()));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            units: config.units.clone(),
        })
    }

    /// Create a client from configuration, failing if no key is configured
    pub fn from_config(config: &WeatherConfig) -> crate::Result<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            SahaytaError::config("weather.api_key is not set (use SAHAYTA_WEATHER__API_KEY)")
        })?;
        Self::new(config, api_key)
    }

    fn current_url(&self, query: &PlaceQuery) -> String {
        format!(
            "{}/weather?q={}&appid={}&units={}",
            self.base_url,
            urlencoding::encode(query.as_str()),
            urlencoding::encode(&self.api_key),
            self.units
        )
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    #[instrument(skip(self, query), fields(place = %query))]
    async fn current(&self, query: &PlaceQuery) -> Lookup<WeatherSnapshot> {
        if query.is_empty() {
            debug!("Empty city name, skipping weather lookup");
            return Lookup::Skipped;
        }

        let start_time = Instant::now();
        // The URL carries the API key, so only the place is logged
        debug!("Requesting current weather for '{}'", query);

        let response = match self.client.get(self.current_url(query)).send().await {
            Ok(r) => r,
            Err(e) => {
                // reqwest errors include the URL; strip it to keep the key out of logs
                debug!("Weather request failed: {}", e.without_url());
                return Lookup::NotFound;
            }
        };

        if !response.status().is_success() {
            warn!("Weather API returned status {}", response.status());
            return Lookup::NotFound;
        }

        let body: openweathermap::CurrentResponse = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                debug!("Weather response parse error: {}", e.without_url());
                return Lookup::NotFound;
            }
        };

        match into_snapshot(body) {
            Some(snapshot) => {
                info!(
                    "Retrieved weather for '{}' in {:.3}s: {}, {}",
                    query,
                    start_time.elapsed().as_secs_f64(),
                    snapshot.format_temperature(),
                    snapshot.description
                );
                Lookup::Found(snapshot)
            }
            None => {
                debug!("Weather response had no condition entries");
                Lookup::NotFound
            }
        }
    }
}

fn into_snapshot(body: openweathermap::CurrentResponse) -> Option<WeatherSnapshot> {
    let condition = body.weather.into_iter().next()?;
    Some(WeatherSnapshot {
        temperature: body.main.temp,
        humidity: body.main.humidity,
        description: condition.description,
        fetched_at: Utc::now(),
    })
}
