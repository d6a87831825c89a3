// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OpenWeatherMap client for current conditions and the 5-day / 3-hour
//! forecast.
//!
//! Handles:
//! - Lookup by city name or by coordinates (metric units)
//! - Mapping provider 404s to not-found, everything else to a generic error
//! - Reshaping provider payloads into [`CurrentWeather`] and [`ForecastDay`]

use crate::config::Config;
use crate::error::AppError;
use crate::models::{CurrentWeather, ForecastDay, ForecastTime, WeatherReport};
use chrono::NaiveDateTime;
use reqwest::StatusCode;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Forecast days kept after grouping.
pub const MAX_FORECAST_DAYS: usize = 5;

/// Format of `dt_txt` in forecast entries.
const FORECAST_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const CONNECT_FAILED: &str = "Failed to connect to weather service";

/// What to look up.
#[derive(Debug, Clone, Copy)]
pub enum WeatherQuery<'a> {
    City(&'a str),
    Coordinates { latitude: f64, longitude: f64 },
}

impl WeatherQuery<'_> {
    fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            WeatherQuery::City(city) => vec![("q", city.to_string())],
            WeatherQuery::Coordinates {
                latitude,
                longitude,
            } => vec![("lat", latitude.to_string()), ("lon", longitude.to_string())],
        }
    }

    fn not_found(&self) -> AppError {
        match self {
            WeatherQuery::City(city) => AppError::NotFound(format!("City '{}' not found", city)),
            WeatherQuery::Coordinates { .. } => {
                AppError::NotFound(format!("No weather data for {}", self))
            }
        }
    }
}

impl fmt::Display for WeatherQuery<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeatherQuery::City(city) => f.write_str(city),
            WeatherQuery::Coordinates {
                latitude,
                longitude,
            } => write!(f, "{}, {}", latitude, longitude),
        }
    }
}

/// OpenWeatherMap API client.
#[derive(Clone)]
pub struct WeatherService {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl WeatherService {
    /// Create a client. Without an API key every lookup fails as not configured.
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        if config.openweather_api_key.is_none() {
            tracing::warn!("OPENWEATHER_API_KEY not set, weather lookups will fail");
        }
        Self::new(
            &config.openweather_base_url,
            config.openweather_api_key.clone(),
            Duration::from_secs(config.http_timeout_secs),
        )
    }

    /// Current conditions plus the grouped forecast for a city.
    pub async fn report(&self, city: &str) -> Result<WeatherReport, AppError> {
        let query = WeatherQuery::City(city);
        let current = self.current(query).await?;
        let forecast = self.forecast(query).await?;
        Ok(WeatherReport { current, forecast })
    }

    /// Current conditions.
    pub async fn current(&self, query: WeatherQuery<'_>) -> Result<CurrentWeather, AppError> {
        let response = self.get("weather", query).await?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::NOT_FOUND => return Err(query.not_found()),
            status => {
                tracing::warn!(%status, %query, "Current weather request failed");
                return Err(AppError::WeatherApi(
                    "Failed to fetch current weather data".to_string(),
                ));
            }
        }

        let raw: OwmCurrent = response.json().await.map_err(|e| {
            tracing::warn!(error = %e.without_url(), "Unparseable current weather");
            AppError::WeatherApi("Invalid current weather data".to_string())
        })?;

        Ok(raw.into())
    }

    /// 5-day forecast grouped by calendar date.
    pub async fn forecast(&self, query: WeatherQuery<'_>) -> Result<Vec<ForecastDay>, AppError> {
        let response = self.get("forecast", query).await?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), %query, "Forecast request failed");
            return Err(AppError::WeatherApi("Failed to fetch forecast data".to_string()));
        }

        let raw: OwmForecast = response.json().await.map_err(|e| {
            tracing::warn!(error = %e.without_url(), "Unparseable forecast");
            AppError::WeatherApi("Invalid forecast data".to_string())
        })?;

        Ok(group_forecast(raw.list))
    }

    /// Issue a GET. The URL carries the API key, so it is stripped from errors.
    async fn get(
        &self,
        endpoint: &str,
        query: WeatherQuery<'_>,
    ) -> Result<reqwest::Response, AppError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AppError::NotConfigured("OpenWeather API key"))?;

        let mut params = query.params();
        params.push(("appid", api_key.to_string()));
        params.push(("units", "metric".to_string()));

        self.http
            .get(format!("{}/{}", self.base_url, endpoint))
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(endpoint, error = %e.without_url(), "Weather request failed");
                AppError::WeatherApi(CONNECT_FAILED.to_string())
            })
    }
}

/// Group 3-hour entries by calendar date in first-seen order.
///
/// Each day tracks the running min of `temp_min` and max of `temp_max`;
/// the first entry of a day supplies its description, icon, humidity and
/// wind. Only the first [`MAX_FORECAST_DAYS`] dates are kept.
pub fn group_forecast(entries: Vec<OwmForecastEntry>) -> Vec<ForecastDay> {
    let mut days: Vec<ForecastDay> = Vec::new();

    for entry in entries {
        let Ok(at) = NaiveDateTime::parse_from_str(&entry.dt_txt, FORECAST_TIME_FORMAT) else {
            tracing::warn!(dt_txt = %entry.dt_txt, "Skipping forecast entry with bad timestamp");
            continue;
        };
        let date = at.format("%Y-%m-%d").to_string();
        let (description, icon) = condition(&entry.weather);

        let index = match days.iter().position(|d| d.date == date) {
            Some(i) => {
                let day = &mut days[i];
                day.temp_min = day.temp_min.min(entry.main.temp_min);
                day.temp_max = day.temp_max.max(entry.main.temp_max);
                i
            }
            None if days.len() >= MAX_FORECAST_DAYS => continue,
            None => {
                days.push(ForecastDay {
                    date,
                    temp_min: entry.main.temp_min,
                    temp_max: entry.main.temp_max,
                    description: description.clone(),
                    icon: icon.clone(),
                    humidity: entry.main.humidity,
                    wind_speed: entry.wind.speed,
                    times: Vec::new(),
                });
                days.len() - 1
            }
        };

        days[index].times.push(ForecastTime {
            time: at.format("%H:%M:%S").to_string(),
            temperature: entry.main.temp,
            description,
            icon,
        });
    }

    days
}

/// First listed condition, or empty strings when the provider sent none.
fn condition(weather: &[OwmCondition]) -> (String, String) {
    weather
        .first()
        .map(|c| (c.description.clone(), c.icon.clone()))
        .unwrap_or_default()
}

impl From<OwmCurrent> for CurrentWeather {
    fn from(raw: OwmCurrent) -> Self {
        let (description, icon) = condition(&raw.weather);
        Self {
            city: raw.name,
            country: raw.sys.country.unwrap_or_default(),
            temperature: raw.main.temp,
            feels_like: raw.main.feels_like,
            humidity: raw.main.humidity,
            pressure: raw.main.pressure,
            description,
            icon,
            wind_speed: raw.wind.speed,
            wind_direction: raw.wind.deg.unwrap_or(0.0),
            visibility: raw.visibility.unwrap_or(0.0) / 1000.0,
            timestamp: raw.dt,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Provider payloads
// ─────────────────────────────────────────────────────────────────────────────

/// `GET /weather` response.
#[derive(Debug, Clone, Deserialize)]
pub struct OwmCurrent {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sys: OwmSys,
    pub main: OwmMain,
    #[serde(default)]
    pub weather: Vec<OwmCondition>,
    #[serde(default)]
    pub wind: OwmWind,
    /// Metres
    pub visibility: Option<f64>,
    pub dt: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OwmSys {
    pub country: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwmMain {
    pub temp: f64,
    #[serde(default)]
    pub feels_like: f64,
    pub humidity: f64,
    #[serde(default)]
    pub pressure: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwmCondition {
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OwmWind {
    pub speed: f64,
    pub deg: Option<f64>,
}

/// `GET /forecast` response.
#[derive(Debug, Clone, Deserialize)]
pub struct OwmForecast {
    pub list: Vec<OwmForecastEntry>,
}

/// One 3-hour forecast entry.
#[derive(Debug, Clone, Deserialize)]
pub struct OwmForecastEntry {
    /// `YYYY-MM-DD HH:MM:SS`, UTC
    pub dt_txt: String,
    pub main: OwmForecastMain,
    #[serde(default)]
    pub weather: Vec<OwmCondition>,
    #[serde(default)]
    pub wind: OwmWind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwmForecastMain {
    pub temp: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: f64,
}
