// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{Request, Response};
use std::sync::Arc;
use weathersphere::config::Config;
use weathersphere::routes::create_router;
use weathersphere::AppState;
use wiremock::MockServer;

#[allow(dead_code)]
pub const SUPABASE_KEY: &str = "test-service-key";
#[allow(dead_code)]
pub const OPENWEATHER_KEY: &str = "test_openweather_key";

/// Create a test app with the store offline and the provider unreachable.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_offline_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config {
        openweather_base_url: "http://127.0.0.1:9".to_string(),
        ..Config::default()
    };
    build(config)
}

/// Create a test app whose store and provider are both `server`.
#[allow(dead_code)]
pub fn create_test_app(server: &MockServer) -> (axum::Router, Arc<AppState>) {
    let config = Config {
        openweather_base_url: format!("{}/data/2.5", server.uri()),
        openweather_api_key: Some(OPENWEATHER_KEY.to_string()),
        supabase_url: Some(server.uri()),
        supabase_key: Some(SUPABASE_KEY.to_string()),
        ..Config::default()
    };
    build(config)
}

fn build(config: Config) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::from_config(config).expect("state should build"));
    (create_router(state.clone()), state)
}

/// Build a request with an optional JSON body.
#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, body: Option<serde_json::Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// A stored `users` row as PostgREST returns it.
#[allow(dead_code)]
pub fn user_row(
    id: i64,
    chat_id: i64,
    city: Option<&str>,
    coordinates: Option<(f64, f64)>,
) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "chat_id": chat_id,
        "city": city,
        "latitude": coordinates.map(|c| c.0),
        "longitude": coordinates.map(|c| c.1),
        "created_at": "2025-10-04T09:30:00+00:00"
    })
}

/// An OpenWeatherMap `/weather` payload.
#[allow(dead_code)]
pub fn current_weather(
    city: &str,
    temp: f64,
    humidity: f64,
    wind: f64,
    description: &str,
) -> serde_json::Value {
    serde_json::json!({
        "coord": {"lon": -0.13, "lat": 51.51},
        "weather": [{"id": 500, "main": "Rain", "description": description, "icon": "10d"}],
        "main": {
            "temp": temp,
            "feels_like": temp - 1.0,
            "temp_min": temp - 2.0,
            "temp_max": temp + 2.0,
            "pressure": 1012,
            "humidity": humidity
        },
        "visibility": 10000,
        "wind": {"speed": wind, "deg": 240},
        "dt": 1759579200,
        "sys": {"country": "GB"},
        "name": city,
        "cod": 200
    })
}
