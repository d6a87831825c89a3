// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Processed weather returned by the API.

use serde::{Deserialize, Serialize};

/// Current conditions, flattened from the provider payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub city: String,
    pub country: String,
    /// Degrees Celsius
    pub temperature: f64,
    pub feels_like: f64,
    /// Percent
    pub humidity: f64,
    /// hPa
    pub pressure: f64,
    pub description: String,
    pub icon: String,
    /// Metres per second
    pub wind_speed: f64,
    /// Degrees
    pub wind_direction: f64,
    /// Kilometres
    pub visibility: f64,
    /// Unix timestamp of the observation
    pub timestamp: i64,
}

/// One calendar day of the forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    /// `YYYY-MM-DD`
    pub date: String,
    pub temp_min: f64,
    pub temp_max: f64,
    pub description: String,
    pub icon: String,
    pub humidity: f64,
    pub wind_speed: f64,
    pub times: Vec<ForecastTime>,
}

/// A single 3-hour reading within a forecast day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastTime {
    /// `HH:MM:SS`
    pub time: String,
    pub temperature: f64,
    pub description: String,
    pub icon: String,
}

/// Response body of `GET /weather`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReport {
    pub current: CurrentWeather,
    pub forecast: Vec<ForecastDay>,
}
