// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! WeatherSphere Telegram Bot
//!
//! Collects each chat's location and registers it with the WeatherSphere
//! API. Also serves health endpoints for the hosting platform.

use std::time::Duration;
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use weathersphere::bot::{self, BackendClient, BotContext, Command};
use weathersphere::{config::BotConfig, logging::init_logging};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = BotConfig::from_env()?;
    tracing::info!(
        api = %config.api_base_url,
        port = config.port,
        "Starting WeatherSphere Telegram Bot"
    );

    let backend = BackendClient::new(
        &config.api_base_url,
        Duration::from_secs(config.http_timeout_secs),
    )?;
    let ctx = BotContext::new(backend, config.dashboard_url.clone());

    // Health endpoints run alongside the dispatcher
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Health server listening");
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, bot::health_router()).await {
            tracing::error!(error = %e, "Health server stopped");
        }
    });

    let telegram = Bot::new(&config.telegram_bot_token);
    if let Err(e) = telegram.set_my_commands(Command::bot_commands()).await {
        tracing::warn!(error = %e, "Failed to publish command list");
    }

    Dispatcher::builder(telegram, bot::schema())
        .dependencies(dptree::deps![ctx])
        .error_handler(LoggingErrorHandler::with_custom_text(
            "An error has occurred in the dispatcher",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
