// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Location registration routes, called by the Telegram bot.

use crate::error::{AppError, Result};
use crate::services::locations::{DeletionResponse, RegistrationResponse};
use crate::services::RegisterLocationRequest;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{delete, post},
    Json, Router,
};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register_location", post(register_location))
        .route("/delete_location/{chat_id}", delete(delete_location))
}

/// Create or update the location stored for a chat.
///
/// Validation happens before the store is touched.
async fn register_location(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<RegisterLocationRequest>, JsonRejection>,
) -> Result<Json<RegistrationResponse>> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let (chat_id, location) = request.into_location()?;

    let response = state.location_service.register(chat_id, location).await?;
    Ok(Json(response))
}

/// Remove the location stored for a chat.
async fn delete_location(
    State(state): State<Arc<AppState>>,
    Path(chat_id): Path<i64>,
) -> Result<Json<DeletionResponse>> {
    let response = state.location_service.delete(chat_id).await?;
    Ok(Json(response))
}
