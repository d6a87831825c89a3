// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Alert sweep: check current weather for every registered user against a
//! fixed set of thresholds.
//!
//! Alerts are logged, not delivered to chats.

use crate::db::SupabaseDb;
use crate::error::{AppError, Result};
use crate::models::{CurrentWeather, User};
use crate::services::weather::{WeatherQuery, WeatherService};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Below this temperature (°C) it is freezing.
pub const FREEZING_BELOW_C: f64 = 0.0;
/// Above this temperature (°C) it is extreme heat.
pub const HEAT_ABOVE_C: f64 = 35.0;
/// Relative humidity (%) considered oppressive.
pub const HUMIDITY_ABOVE_PCT: f64 = 85.0;
/// Wind speed (provider units, m/s) considered strong.
pub const WIND_ABOVE: f64 = 10.0;
/// Description fragments that indicate severe conditions.
pub const SEVERE_KEYWORDS: [&str; 5] = ["rain", "storm", "snow", "thunder", "hail"];

/// Why a user should be alerted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlertReason {
    Freezing,
    ExtremeHeat,
    HighHumidity,
    StrongWind,
    Severe(&'static str),
}

impl fmt::Display for AlertReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertReason::Freezing => f.write_str("freezing"),
            AlertReason::ExtremeHeat => f.write_str("extreme heat"),
            AlertReason::HighHumidity => f.write_str("high humidity"),
            AlertReason::StrongWind => f.write_str("strong wind"),
            AlertReason::Severe(keyword) => write!(f, "{}", keyword),
        }
    }
}

/// Every threshold the current conditions cross.
pub fn alert_reasons(current: &CurrentWeather) -> Vec<AlertReason> {
    let mut reasons = Vec::new();

    if current.temperature < FREEZING_BELOW_C {
        reasons.push(AlertReason::Freezing);
    }
    if current.temperature > HEAT_ABOVE_C {
        reasons.push(AlertReason::ExtremeHeat);
    }
    if current.humidity > HUMIDITY_ABOVE_PCT {
        reasons.push(AlertReason::HighHumidity);
    }
    if current.wind_speed > WIND_ABOVE {
        reasons.push(AlertReason::StrongWind);
    }

    let description = current.description.to_lowercase();
    reasons.extend(
        SEVERE_KEYWORDS
            .iter()
            .copied()
            .filter(|k| description.contains(k))
            .map(AlertReason::Severe),
    );

    reasons
}

/// Whether the conditions warrant an alert.
pub fn should_alert(current: &CurrentWeather) -> bool {
    !alert_reasons(current).is_empty()
}

/// Body of `POST /send_alerts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertResponse {
    pub message: String,
    pub users_processed: usize,
    pub alerts_sent: usize,
    pub users_failed: usize,
}

/// Runs the sweep over the users table.
#[derive(Clone)]
pub struct AlertService {
    db: SupabaseDb,
    weather: WeatherService,
}

impl AlertService {
    pub fn new(db: SupabaseDb, weather: WeatherService) -> Self {
        Self { db, weather }
    }

    /// Check every user in turn. A failure for one user is logged and
    /// skipped; only a failure to list users fails the sweep.
    pub async fn sweep(&self) -> Result<AlertResponse> {
        let users = self.db.list_users().await?;

        if users.is_empty() {
            return Ok(AlertResponse {
                message: "No users found in database".to_string(),
                users_processed: 0,
                alerts_sent: 0,
                users_failed: 0,
            });
        }

        let mut alerts_sent = 0;
        let mut users_failed = 0;

        for user in &users {
            match self.check_user(user).await {
                Ok(true) => alerts_sent += 1,
                Ok(false) => {}
                Err(e) => {
                    users_failed += 1;
                    tracing::warn!(user_id = user.id, error = %e, "Failed to process alerts for user");
                }
            }
        }

        tracing::info!(
            users = users.len(),
            alerts_sent,
            users_failed,
            "Alert sweep finished"
        );

        Ok(AlertResponse {
            message: format!("Weather alerts processed for {} users", users.len()),
            users_processed: users.len(),
            alerts_sent,
            users_failed,
        })
    }

    /// Returns whether an alert was raised for this user.
    async fn check_user(&self, user: &User) -> Result<bool> {
        let query = match (&user.city, user.coordinates()) {
            (Some(city), _) if !city.trim().is_empty() => WeatherQuery::City(city),
            (_, Some((latitude, longitude))) => WeatherQuery::Coordinates {
                latitude,
                longitude,
            },
            _ => {
                return Err(AppError::BadRequest(format!(
                    "User {} has no stored location",
                    user.id
                )))
            }
        };

        let current = self.weather.current(query).await?;
        let reasons = alert_reasons(&current);
        if reasons.is_empty() {
            return Ok(false);
        }

        let reasons: Vec<String> = reasons.iter().map(ToString::to_string).collect();
        tracing::warn!(
            user_id = user.id,
            chat_id = user.chat_id,
            location = %query,
            conditions = %current.description,
            temperature = current.temperature,
            reasons = ?reasons,
            "Weather alert"
        );
        Ok(true)
    }
}
