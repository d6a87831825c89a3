// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Supabase (PostgREST) client wrapper with typed operations on the
//! `users` table.
//!
//! Every call is a single request/response round trip; there is no
//! caching and no retry. The store is the source of truth.

use crate::config::Config;
use crate::db::tables;
use crate::error::AppError;
use crate::models::{NewUser, User, UserLocation};
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Supabase database client.
#[derive(Clone)]
pub struct SupabaseDb {
    conn: Option<Connection>,
}

#[derive(Clone)]
struct Connection {
    http: reqwest::Client,
    rest_url: String,
    key: String,
}

impl SupabaseDb {
    /// Create a client for the project at `url` authenticated with `key`.
    pub fn new(url: &str, key: &str, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Database(format!("Failed to build HTTP client: {}", e)))?;

        tracing::info!(url, "Supabase client initialized");

        Ok(Self {
            conn: Some(Connection {
                http,
                rest_url: format!("{}/rest/v1", url.trim_end_matches('/')),
                key: key.to_string(),
            }),
        })
    }

    /// Create a client from configuration, falling back to offline mode
    /// when the project URL or key is missing.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        match (&config.supabase_url, &config.supabase_key) {
            (Some(url), Some(key)) => {
                Self::new(url, key, Duration::from_secs(config.http_timeout_secs))
            }
            _ => {
                tracing::warn!("SUPABASE_URL or SUPABASE_KEY not set, store is offline");
                Ok(Self::new_offline())
            }
        }
    }

    /// Create an unconfigured client.
    ///
    /// All database operations will return an error if called.
    pub fn new_offline() -> Self {
        Self { conn: None }
    }

    /// Whether credentials were supplied.
    pub fn is_configured(&self) -> bool {
        self.conn.is_some()
    }

    /// Helper to get the connection or return an error if offline.
    fn conn(&self) -> Result<&Connection, AppError> {
        self.conn.as_ref().ok_or(AppError::NotConfigured("Supabase"))
    }

    /// Start a request against a table with the auth headers attached.
    fn request(&self, method: Method, table: &str) -> Result<reqwest::RequestBuilder, AppError> {
        let conn = self.conn()?;
        Ok(conn
            .http
            .request(method, format!("{}/{}", conn.rest_url, table))
            .header("apikey", &conn.key)
            .bearer_auth(&conn.key)
            .header("Prefer", "return=representation"))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Fetch every row of the users table.
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let response = self
            .request(Method::GET, tables::USERS)?
            .send()
            .await
            .map_err(request_failed)?;

        check_response_json(response).await
    }

    /// Look up a user by chat ID using the unique `chat_id` column.
    pub async fn find_user_by_chat_id(&self, chat_id: i64) -> Result<Option<User>, AppError> {
        let response = self
            .request(Method::GET, tables::USERS)?
            .query(&[("chat_id", format!("eq.{}", chat_id)), ("limit", "1".to_string())])
            .send()
            .await
            .map_err(request_failed)?;

        let rows: Vec<User> = check_response_json(response).await?;
        Ok(rows.into_iter().next())
    }

    /// Insert a new user and return the stored row.
    pub async fn insert_user(&self, user: &NewUser) -> Result<User, AppError> {
        let response = self
            .request(Method::POST, tables::USERS)?
            .json(user)
            .send()
            .await
            .map_err(request_failed)?;

        let rows: Vec<User> = check_response_json(response).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| AppError::Database("Insert returned no row".to_string()))
    }

    /// Update the location fields of a user by store ID.
    ///
    /// Returns the updated row when the store sends one back.
    pub async fn update_user(
        &self,
        id: i64,
        location: &UserLocation,
    ) -> Result<Option<User>, AppError> {
        let response = self
            .request(Method::PATCH, tables::USERS)?
            .query(&[("id", format!("eq.{}", id))])
            .json(location)
            .send()
            .await
            .map_err(request_failed)?;

        let body = check_response_text(response).await?;
        if body.trim().is_empty() {
            return Ok(None);
        }

        match serde_json::from_str::<Vec<User>>(&body) {
            Ok(rows) => Ok(rows.into_iter().next()),
            Err(e) => {
                tracing::warn!(id, error = %e, "Unparseable update response, ignoring");
                Ok(None)
            }
        }
    }

    /// Delete a user by store ID.
    pub async fn delete_user(&self, id: i64) -> Result<(), AppError> {
        let response = self
            .request(Method::DELETE, tables::USERS)?
            .query(&[("id", format!("eq.{}", id))])
            .send()
            .await
            .map_err(request_failed)?;

        check_response_text(response).await?;
        tracing::info!(id, "User deleted");
        Ok(())
    }
}

fn request_failed(e: reqwest::Error) -> AppError {
    AppError::Database(format!("Store request failed: {}", e))
}

/// Check response status and return the body text if successful.
async fn check_response_text(response: reqwest::Response) -> Result<String, AppError> {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    if !status.is_success() {
        return Err(AppError::Database(format!("HTTP {}: {}", status, body)));
    }

    Ok(body)
}

/// Check response and parse JSON body.
async fn check_response_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, AppError> {
    let body = check_response_text(response).await?;
    serde_json::from_str(&body).map_err(|e| AppError::Database(format!("JSON parse error: {}", e)))
}
