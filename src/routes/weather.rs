// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weather lookup for the dashboard.

use crate::error::{AppError, Result};
use crate::models::WeatherReport;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// Longest city name we forward to the provider.
const MAX_CITY_LEN: usize = 100;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/weather", get(get_weather))
}

#[derive(Deserialize)]
struct WeatherParams {
    city: Option<String>,
}

/// Current weather and 5-day forecast for a city.
async fn get_weather(
    State(state): State<Arc<AppState>>,
    Query(params): Query<WeatherParams>,
) -> Result<Json<WeatherReport>> {
    let city = params.city.as_deref().map(str::trim).unwrap_or_default();
    if city.is_empty() {
        return Err(AppError::BadRequest("City parameter is required".to_string()));
    }
    if city.chars().count() > MAX_CITY_LEN {
        return Err(AppError::BadRequest("City name is too long".to_string()));
    }

    let report = state.weather_service.report(city).await?;

    tracing::debug!(
        city = %report.current.city,
        days = report.forecast.len(),
        "Weather report served"
    );
    Ok(Json(report))
}
