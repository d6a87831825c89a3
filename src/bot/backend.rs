// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client for the WeatherSphere API, used by the bot.

use crate::bot::conversation::LocationInput;
use crate::services::locations::{DeletionResponse, RegistrationResponse};
use crate::services::RegisterLocationRequest;
use reqwest::StatusCode;
use std::time::Duration;
use teloxide::types::ChatId;

/// Errors talking to the API.
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error("Request to backend failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Backend returned HTTP {status}: {body}")]
    Backend { status: u16, body: String },
}

/// Result of asking the API to forget a chat.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    Deleted { user_id: i64 },
    /// Nothing was stored for the chat
    NotRegistered,
}

/// WeatherSphere API client.
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BotError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Register (or update) the chat's location.
    pub async fn register_location(
        &self,
        chat_id: ChatId,
        input: &LocationInput,
    ) -> Result<RegistrationResponse, BotError> {
        let mut body = RegisterLocationRequest {
            chat_id: Some(chat_id.0),
            ..Default::default()
        };
        match input {
            LocationInput::City(city) => body.city = Some(city.clone()),
            LocationInput::Coordinates {
                latitude,
                longitude,
            } => {
                body.latitude = Some(*latitude);
                body.longitude = Some(*longitude);
            }
        }

        let response = self
            .http
            .post(format!("{}/register_location", self.base_url))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(backend_error(response).await);
        }

        Ok(response.json().await?)
    }

    /// Delete the chat's stored location. A 404 is not an error.
    pub async fn delete_location(&self, chat_id: ChatId) -> Result<DeleteOutcome, BotError> {
        let response = self
            .http
            .delete(format!("{}/delete_location/{}", self.base_url, chat_id.0))
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(DeleteOutcome::NotRegistered),
            status if status.is_success() => {
                let deleted: DeletionResponse = response.json().await?;
                Ok(DeleteOutcome::Deleted {
                    user_id: deleted.deleted_user_id,
                })
            }
            _ => Err(backend_error(response).await),
        }
    }
}

async fn backend_error(response: reqwest::Response) -> BotError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    BotError::Backend { status, body }
}
