// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! WeatherSphere: location-based weather alerts over Telegram
//!
//! This crate provides the backend API (location registration, weather
//! lookup, alert sweep) and the Telegram bot that feeds it.

pub mod bot;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::SupabaseDb;
use error::AppError;
use services::{AlertService, LocationService, WeatherService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: SupabaseDb,
    pub weather_service: WeatherService,
    pub location_service: LocationService,
    pub alert_service: AlertService,
}

impl AppState {
    /// Build every service from configuration.
    pub fn from_config(config: Config) -> Result<Self, AppError> {
        let db = SupabaseDb::from_config(&config)?;
        let weather_service = WeatherService::from_config(&config)?;

        Ok(Self {
            location_service: LocationService::new(db.clone()),
            alert_service: AlertService::new(db.clone(), weather_service.clone()),
            config,
            db,
            weather_service,
        })
    }
}
