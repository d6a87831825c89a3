// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Telegram front-end: collects a location per chat and hands it to the API.

pub mod backend;
pub mod conversation;
pub mod handlers;
pub mod replies;

pub use backend::{BackendClient, BotError, DeleteOutcome};
pub use conversation::{ConversationState, ConversationStore};
pub use handlers::{BotContext, HandlerError};

use axum::{routing::get, Json, Router};
use serde::Serialize;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "WeatherSphere commands:")]
pub enum Command {
    #[command(description = "begin registration for weather alerts")]
    Start,
    #[command(description = "update your location for weather alerts")]
    ChangeLocation,
    #[command(description = "show this help message")]
    Help,
}

/// Update routing: commands, shared locations, button presses, then text.
pub fn schema() -> UpdateHandler<HandlerError> {
    dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(handlers::command_handler),
        )
        .branch(
            Update::filter_message()
                .filter(|msg: Message| msg.location().is_some())
                .endpoint(handlers::location_handler),
        )
        .branch(Update::filter_callback_query().endpoint(handlers::callback_handler))
        .branch(Update::filter_message().endpoint(handlers::text_handler))
}

#[derive(Serialize)]
pub struct BotStatus {
    pub status: String,
    pub service: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct BotHealth {
    pub status: String,
    pub bot_running: bool,
}

async fn bot_status() -> Json<BotStatus> {
    Json(BotStatus {
        status: "healthy".to_string(),
        service: "telegram-bot".to_string(),
        message: "Bot is running".to_string(),
    })
}

async fn bot_health() -> Json<BotHealth> {
    Json(BotHealth {
        status: "ok".to_string(),
        bot_running: true,
    })
}

/// Health endpoints served next to the bot so the host can probe it.
pub fn health_router() -> Router {
    Router::new()
        .route("/", get(bot_status))
        .route("/health", get(bot_health))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_parse_lowercase() {
        assert_eq!(
            Command::parse("/changelocation", "weathersphere_bot").unwrap(),
            Command::ChangeLocation
        );
        assert_eq!(
            Command::parse("/start@weathersphere_bot", "weathersphere_bot").unwrap(),
            Command::Start
        );
        assert!(Command::parse("/weather", "weathersphere_bot").is_err());
    }
}
