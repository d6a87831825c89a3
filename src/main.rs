// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! WeatherSphere API Server
//!
//! Stores chat locations in Supabase, serves OpenWeatherMap data to the
//! dashboard, and runs the weather alert sweep.

use std::sync::Arc;
use weathersphere::{config::Config, logging::init_logging, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting WeatherSphere API");

    // Build shared state
    let state = Arc::new(AppState::from_config(config.clone())?);
    tracing::info!(
        store_configured = state.db.is_configured(),
        weather_configured = config.openweather_api_key.is_some(),
        "Services initialized"
    );

    // Build router
    let app = weathersphere::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
