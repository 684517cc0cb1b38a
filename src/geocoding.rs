//! Forward geocoding: free-text place name to a coordinate pair.
//! Uses Nominatim (OpenStreetMap) search, which needs no API key but does
//! require a client identifier in the `User-Agent` header.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::config::GeocodingConfig;
use crate::models::{Coordinate, Lookup, PlaceQuery};

/// Resolves place names to coordinates
#[async_trait]
pub trait PlaceLocator: Send + Sync {
    /// Resolve `query` to the first matching coordinate.
    ///
    /// Empty queries return [`Lookup::Skipped`] without any I/O. Every kind of
    /// failure is reported as [`Lookup::NotFound`].
    async fn locate(&self, query: &PlaceQuery) -> Lookup<Coordinate>;
}

/// One search candidate; Nominatim returns coordinates as strings
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: Option<String>,
}

/// Nominatim search client
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

impl NominatimGeocoder {
    /// Create a new geocoder from configuration
    pub fn new(config: &GeocodingConfig) -> crate::Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds.into()));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn search_url(&self, query: &PlaceQuery) -> String {
        format!(
            "{}/search?q={}&format=json&limit=1",
            self.base_url,
            urlencoding::encode(query.as_str())
        )
    }
}

#[async_trait]
impl PlaceLocator for NominatimGeocoder {
    #[instrument(skip(self, query), fields(place = %query))]
    async fn locate(&self, query: &PlaceQuery) -> Lookup<Coordinate> {
        if query.is_empty() {
            debug!("Empty place name, skipping geocoding");
            return Lookup::Skipped;
        }

        let url = self.search_url(query);
        debug!("Nominatim request URL: {}", url);

        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                debug!("Geocoding request failed: {}", e);
                return Lookup::NotFound;
            }
        };

        if !response.status().is_success() {
            warn!("Geocoding returned status {}", response.status());
            return Lookup::NotFound;
        }

        let places: Vec<NominatimPlace> = match response.json().await {
            Ok(p) => p,
            Err(e) => {
                debug!("Geocoding parse error: {}", e);
                return Lookup::NotFound;
            }
        };

        let Some(place) = places.into_iter().next() else {
            info!("No geocoding results for '{}'", query);
            return Lookup::NotFound;
        };

        match parse_coordinate(&place) {
            Some(coordinate) => {
                info!(
                    "Geocoded '{}' to {} ({})",
                    query,
                    coordinate.format_coordinates(),
                    place.display_name.as_deref().unwrap_or("unnamed")
                );
                Lookup::Found(coordinate)
            }
            None => {
                debug!(
                    "Unusable coordinates in geocoding result: lat={:?} lon={:?}",
                    place.lat, place.lon
                );
                Lookup::NotFound
            }
        }
    }
}

fn parse_coordinate(place: &NominatimPlace) -> Option<Coordinate> {
    let lat = place.lat.trim().parse::<f64>().ok()?;
    let lon = place.lon.trim().parse::<f64>().ok()?;
    Coordinate::new(lat, lon).ok()
}
