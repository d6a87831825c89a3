// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! `POST /send_alerts` sweep against mocked Supabase and OpenWeatherMap.

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

async fn mount_current(server: &MockServer, param: (&str, &str), body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param(param.0, param.1))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_sweep_counts_alerts_and_failures() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            common::user_row(1, 101, Some("London"), None),
            common::user_row(2, 102, Some("Paris"), None),
            common::user_row(3, 103, None, Some((60.1, 24.9))),
            common::user_row(4, 104, Some("Atlantis"), None),
            common::user_row(5, 105, None, None),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    mount_current(
        &server,
        ("q", "London"),
        common::current_weather("London", 12.0, 60.0, 3.0, "light rain"),
    )
    .await;
    mount_current(
        &server,
        ("q", "Paris"),
        common::current_weather("Paris", 21.0, 40.0, 2.0, "clear sky"),
    )
    .await;
    mount_current(
        &server,
        ("lat", "60.1"),
        common::current_weather("Helsinki", -6.0, 70.0, 4.0, "few clouds"),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "Atlantis"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let (app, _) = common::create_test_app(&server);

    let response = app
        .oneshot(common::json_request("POST", "/send_alerts", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["message"], "Weather alerts processed for 5 users");
    assert_eq!(body["users_processed"], 5);
    assert_eq!(body["alerts_sent"], 2);
    assert_eq!(body["users_failed"], 2);
}

#[tokio::test]
async fn test_sweep_with_no_users() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (app, _) = common::create_test_app(&server);

    let response = app
        .oneshot(common::json_request("POST", "/send_alerts", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["message"], "No users found in database");
    assert_eq!(body["users_processed"], 0);
    assert_eq!(body["alerts_sent"], 0);
}

#[tokio::test]
async fn test_sweep_fails_when_users_cannot_be_listed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(500).set_body_string("connection refused"))
        .mount(&server)
        .await;

    let (app, _) = common::create_test_app(&server);

    let response = app
        .oneshot(common::json_request("POST", "/send_alerts", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = common::body_json(response).await;
    assert_eq!(body["error"], "database_error");
}

#[tokio::test]
async fn test_sweep_requires_store() {
    let (app, _) = common::create_offline_test_app();

    let response = app
        .oneshot(common::json_request("POST", "/send_alerts", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
