//! User-triggered actions: weather lookup and emergency route planning
//!
//! Each call is one stateless request/response cycle ending in one of three
//! outcomes: success, a user-visible failure message, or skipped because a
//! required input was empty.

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::geocoding::PlaceLocator;
use crate::models::{CameraFraming, DeckDocument, Lookup, PlaceQuery, RouteScene, WeatherSnapshot};
use crate::weather::WeatherSource;

pub const WEATHER_UNAVAILABLE: &str = "Unable to fetch weather data. Please check the city name.";
pub const ROUTE_NOT_FOUND: &str = "Could not locate one or both locations. Please check the names.";

/// Terminal outcome of one action
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ActionOutcome<T> {
    Success(T),
    Failed { message: String },
    Skipped,
}

impl<T> ActionOutcome<T> {
    fn failed(message: &str) -> Self {
        Self::Failed {
            message: message.to_string(),
        }
    }
}

/// Weather lookup result ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub city: String,
    pub heading: String,
    pub snapshot: WeatherSnapshot,
    /// Condition description with the first letter capitalized
    pub conditions: String,
    pub lines: Vec<String>,
}

impl WeatherReport {
    fn new(city: &PlaceQuery, snapshot: WeatherSnapshot) -> Self {
        let conditions = snapshot.format_description();
        let lines = vec![
            format!("Temperature: {}", snapshot.format_temperature()),
            format!("Humidity: {}", snapshot.format_humidity()),
            format!("Conditions: {conditions}"),
        ];
        Self {
            city: city.to_string(),
            heading: format!("Current Weather in {city}"),
            snapshot,
            conditions,
            lines,
        }
    }
}

/// A planned route: both endpoints resolved and a scene composed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePlan {
    pub start: String,
    pub destination: String,
    pub heading: String,
    pub scene: RouteScene,
    pub deck: DeckDocument,
}

pub struct WeatherMonitor {
    source: Arc<dyn WeatherSource>,
}

impl WeatherMonitor {
    pub fn new(source: Arc<dyn WeatherSource>) -> Self {
        Self { source }
    }

    /// Look up current weather for a city
    pub async fn lookup(&self, city: &str) -> ActionOutcome<WeatherReport> {
        let city = PlaceQuery::new(city);
        if city.is_empty() {
            debug!("No city given, weather lookup skipped");
            return ActionOutcome::Skipped;
        }

        match self.source.current(&city).await {
            Lookup::Found(snapshot) => ActionOutcome::Success(WeatherReport::new(&city, snapshot)),
            Lookup::NotFound => {
                info!("Weather unavailable for '{}'", city);
                ActionOutcome::failed(WEATHER_UNAVAILABLE)
            }
            Lookup::Skipped => ActionOutcome::Skipped,
        }
    }
}

pub struct RoutePlanner {
    locator: Arc<dyn PlaceLocator>,
    framing: CameraFraming,
}

impl RoutePlanner {
    pub fn new(locator: Arc<dyn PlaceLocator>, framing: CameraFraming) -> Self {
        Self { locator, framing }
    }

    /// Resolve both places and compose the route scene
    ///
    /// Both places are geocoded one after the other; nothing is requested
    /// unless both names are given.
    pub async fn plan(&self, start: &str, destination: &str) -> ActionOutcome<RoutePlan> {
        let start = PlaceQuery::new(start);
        let destination = PlaceQuery::new(destination);
        if start.is_empty() || destination.is_empty() {
            debug!("Start or destination missing, route planning skipped");
            return ActionOutcome::Skipped;
        }

        let start_lookup = self.locator.locate(&start).await;
        let destination_lookup = self.locator.locate(&destination).await;

        match (start_lookup, destination_lookup) {
            (Lookup::Found(from), Lookup::Found(to)) => {
                let scene = RouteScene::compose_with(from, Some(to), self.framing);
                info!(
                    "Planned route {} ({}) -> {} ({})",
                    start,
                    from.format_coordinates(),
                    destination,
                    to.format_coordinates()
                );
                ActionOutcome::Success(RoutePlan {
                    heading: format!("Emergency Route: {start} → {destination}"),
                    start: start.to_string(),
                    destination: destination.to_string(),
                    deck: scene.to_deck(),
                    scene,
                })
            }
            _ => {
                info!("Could not locate '{}' or '{}'", start, destination);
                ActionOutcome::failed(ROUTE_NOT_FOUND)
            }
        }
    }
}
