//! JSON HTTP API over the weather and route actions

use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::planner::{ActionOutcome, RoutePlanner, WeatherMonitor};

const WEATHER_NOT_CONFIGURED: &str = "Weather service is not configured";

#[derive(Clone)]
pub struct AppState {
    /// Absent when no weather API key is configured
    pub weather: Option<Arc<WeatherMonitor>>,
    pub routes: Arc<RoutePlanner>,
}

#[derive(Debug, Deserialize)]
pub struct WeatherParams {
    #[serde(default)]
    pub city: String,
}

#[derive(Debug, Deserialize)]
pub struct RouteParams {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub destination: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/weather", get(get_weather))
        .route("/route", get(get_route))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "version": crate::VERSION }))
}

async fn get_weather(State(state): State<AppState>, Query(params): Query<WeatherParams>) -> Response {
    let Some(monitor) = &state.weather else {
        let body = json!({ "outcome": "failed", "message": WEATHER_NOT_CONFIGURED });
        return (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response();
    };
    outcome_response(monitor.lookup(&params.city).await)
}

async fn get_route(State(state): State<AppState>, Query(params): Query<RouteParams>) -> Response {
    outcome_response(state.routes.plan(&params.start, &params.destination).await)
}

fn outcome_response<T: Serialize>(outcome: ActionOutcome<T>) -> Response {
    let status = match outcome {
        ActionOutcome::Failed { .. } => StatusCode::NOT_FOUND,
        ActionOutcome::Success(_) | ActionOutcome::Skipped => StatusCode::OK,
    };
    (status, Json(outcome)).into_response()
}
