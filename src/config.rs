// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Configuration for the API server and the Telegram bot, loaded from
//! environment variables (and a `.env` file when present).

use std::env;

/// Default OpenWeatherMap API root (2.5 endpoints, metric units).
pub const OPENWEATHER_DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Prefix used by the sample `.env` for values that were never filled in.
const PLACEHOLDER_PREFIX: &str = "your_";

/// API server configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// OpenWeatherMap API key (None leaves `/weather` and alerts unavailable)
    pub openweather_api_key: Option<String>,
    /// OpenWeatherMap base URL, overridable for tests
    pub openweather_base_url: String,
    /// Supabase project URL
    pub supabase_url: Option<String>,
    /// Supabase service key
    pub supabase_key: Option<String>,
    /// Origins allowed by CORS in addition to localhost
    pub allowed_origins: Vec<String>,
    /// Timeout for every outbound request
    pub http_timeout_secs: u64,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            port: 8000,
            openweather_api_key: Some("test_openweather_key".to_string()),
            openweather_base_url: OPENWEATHER_DEFAULT_BASE_URL.to_string(),
            supabase_url: None,
            supabase_key: None,
            allowed_origins: vec!["http://localhost:5173".to_string()],
            http_timeout_secs: 5,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Provider and store credentials are optional: when absent the server
    /// still starts and the affected endpoints answer 500.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            port: parse_env("PORT", 8000)?,
            openweather_api_key: optional_env("OPENWEATHER_API_KEY"),
            openweather_base_url: env::var("OPENWEATHER_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| OPENWEATHER_DEFAULT_BASE_URL.to_string()),
            supabase_url: optional_env("SUPABASE_URL").map(|v| v.trim_end_matches('/').to_string()),
            supabase_key: optional_env("SUPABASE_KEY"),
            allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .map(|v| split_list(&v))
                .unwrap_or_else(|_| vec!["http://localhost:5173".to_string()]),
            http_timeout_secs: parse_env("HTTP_TIMEOUT_SECS", 10)?,
        })
    }
}

/// Telegram bot configuration.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Bot token from BotFather
    pub telegram_bot_token: String,
    /// Base URL of the WeatherSphere API
    pub api_base_url: String,
    /// Dashboard linked from the registration reply
    pub dashboard_url: Option<String>,
    /// Port for the bot's health endpoints
    pub port: u16,
    /// Timeout for calls to the API
    pub http_timeout_secs: u64,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let telegram_bot_token =
            optional_env("TELEGRAM_BOT_TOKEN").ok_or(ConfigError::Missing("TELEGRAM_BOT_TOKEN"))?;

        Ok(Self {
            telegram_bot_token,
            api_base_url: env::var("API_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            dashboard_url: optional_env("DASHBOARD_URL")
                .map(|v| v.trim_end_matches('/').to_string()),
            port: parse_env("PORT", 10000)?,
            http_timeout_secs: parse_env("HTTP_TIMEOUT_SECS", 30)?,
        })
    }
}

/// Read a variable, treating blank and placeholder values as unset.
fn optional_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && !v.starts_with(PLACEHOLDER_PREFIX))
}

fn parse_env<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(default),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment is process-global, so every env-touching check lives in
    // this one test.
    #[test]
    fn test_config_from_env() {
        env::set_var("OPENWEATHER_API_KEY", "your_openweather_api_key");
        env::set_var("SUPABASE_URL", "https://example.supabase.co/");
        env::set_var("SUPABASE_KEY", "service-key");
        env::set_var("CORS_ALLOWED_ORIGINS", "https://a.example, https://b.example/");
        env::remove_var("PORT");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.openweather_api_key, None);
        assert_eq!(
            config.supabase_url.as_deref(),
            Some("https://example.supabase.co")
        );
        assert_eq!(config.supabase_key.as_deref(), Some("service-key"));
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.port, 8000);

        env::set_var("TELEGRAM_BOT_TOKEN", "your_telegram_bot_token_here");
        assert!(matches!(
            BotConfig::from_env(),
            Err(ConfigError::Missing("TELEGRAM_BOT_TOKEN"))
        ));

        env::set_var("TELEGRAM_BOT_TOKEN", "123:abc");
        env::set_var("HTTP_TIMEOUT_SECS", "soon");
        assert!(matches!(
            BotConfig::from_env(),
            Err(ConfigError::Invalid("HTTP_TIMEOUT_SECS", _))
        ));

        env::remove_var("HTTP_TIMEOUT_SECS");
        let bot = BotConfig::from_env().expect("Bot config should load");
        assert_eq!(bot.telegram_bot_token, "123:abc");
        assert_eq!(bot.port, 10000);
        assert_eq!(bot.http_timeout_secs, 30);
    }

    #[test]
    fn test_split_list_drops_blanks() {
        assert_eq!(split_list("a,, b ,"), vec!["a", "b"]);
    }
}
