// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use weathersphere::error::AppError;

mod common;

#[test]
fn test_client_errors_map_to_4xx() {
    let err = AppError::NotFound("City 'Atlantis' not found".to_string());
    assert!(err.is_not_found());
    assert_eq!(err.status(), StatusCode::NOT_FOUND);

    let err = AppError::BadRequest("City parameter is required".to_string());
    assert!(!err.is_not_found());
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn test_upstream_errors_map_to_500() {
    for err in [
        AppError::WeatherApi("Failed to fetch forecast data".to_string()),
        AppError::Database("HTTP 503".to_string()),
        AppError::NotConfigured("Supabase"),
        AppError::Internal(anyhow::anyhow!("boom")),
    ] {
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

#[tokio::test]
async fn test_response_body_carries_detail() {
    let response = AppError::WeatherApi("Failed to fetch current weather data".to_string())
        .into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = common::body_json(response).await;
    assert_eq!(body["error"], "weather_error");
    assert_eq!(body["detail"], "Failed to fetch current weather data");
}

#[tokio::test]
async fn test_store_errors_hide_detail() {
    let response =
        AppError::Database("HTTP 401: invalid service key".to_string()).into_response();

    let body = common::body_json(response).await;
    assert_eq!(body["error"], "database_error");
    assert!(body.get("detail").is_none());
}
