// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Alert sweep trigger.

use crate::error::Result;
use crate::services::AlertResponse;
use crate::AppState;
use axum::{extract::State, routing::post, Json, Router};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/send_alerts", post(send_alerts))
}

/// Run the alert sweep over every registered user.
async fn send_alerts(State(state): State<Arc<AppState>>) -> Result<Json<AlertResponse>> {
    tracing::info!("Alert sweep requested");
    let response = state.alert_service.sweep().await?;
    Ok(Json(response))
}
