//! HTTP API for the weather pipeline
//!
//! A thin axum layer over the resolver and normalizer: one route,
//! `GET /api/weather?location=<string>`, answering with a
//! [`WeatherSnapshot`] or an `{"error": ...}` body carrying the status code
//! of the failed stage.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::config::SkycastConfig;
use crate::error::SkycastError;
use crate::location_resolver::LocationResolver;
use crate::weather::{self, WeatherSnapshot};

/// Shared request context: one HTTP client and the loaded configuration.
/// Requests themselves are stateless; nothing here is mutated per call.
#[derive(Clone)]
pub struct AppState {
    client: reqwest::Client,
    config: Arc<SkycastConfig>,
}

impl AppState {
    pub fn new(config: SkycastConfig) -> Result<Self, SkycastError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http.timeout_seconds))
            .user_agent(&config.http.user_agent)
            .build()?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/weather", get(get_weather))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct WeatherParams {
    location: Option<String>,
}

async fn get_weather(
    State(state): State<AppState>,
    Query(params): Query<WeatherParams>,
) -> Result<Json<WeatherSnapshot>, SkycastError> {
    let location = params
        .location
        .filter(|l| !l.is_empty())
        .ok_or(SkycastError::MissingParameter)?;

    let snapshot = handle_weather_request(&state, &location).await?;
    Ok(Json(snapshot))
}

/// Run the full pipeline for one raw location parameter.
///
/// Resolver and normalizer errors propagate unchanged; network-layer faults
/// are already collapsed into `Internal` by the error conversions below
/// them, so nothing escapes unstructured.
pub async fn handle_weather_request(
    state: &AppState,
    raw_location: &str,
) -> Result<WeatherSnapshot, SkycastError> {
    let providers = &state.config.providers;

    let resolved = LocationResolver::resolve(&state.client, providers, raw_location).await?;
    info!(
        "Fetching weather for {} ({}, {})",
        resolved.name, resolved.latitude, resolved.longitude
    );

    let snapshot = weather::fetch_normalized(&state.client, providers, resolved).await?;
    if let Some(code) = snapshot.current.weathercode {
        debug!(
            "Current conditions: {}",
            weather::weather_code_description(code)
        );
    }

    Ok(snapshot)
}

impl IntoResponse for SkycastError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
