// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Telegram update handlers.
//!
//! Each handler turns the update into an [`Incoming`] event, runs it
//! through the conversation store, and performs the resulting actions.

use crate::bot::backend::{BackendClient, BotError, DeleteOutcome};
use crate::bot::conversation::{Action, ConversationStore, Incoming, LocationInput, Reply};
use crate::bot::replies;
use crate::bot::Command;
use crate::services::locations::RegistrationResponse;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardMarkup, KeyboardRemove, MessageId, ParseMode};

pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;
pub type HandlerResult = Result<(), HandlerError>;

/// Dependencies injected into every handler.
#[derive(Clone)]
pub struct BotContext {
    pub conversations: ConversationStore,
    pub backend: BackendClient,
    pub dashboard_url: Option<String>,
}

impl BotContext {
    pub fn new(backend: BackendClient, dashboard_url: Option<String>) -> Self {
        Self {
            conversations: ConversationStore::new(),
            backend,
            dashboard_url,
        }
    }
}

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    ctx: BotContext,
) -> HandlerResult {
    let incoming = match cmd {
        Command::Start => Incoming::Start,
        Command::ChangeLocation => Incoming::ChangeLocation,
        Command::Help => Incoming::Help,
    };
    tracing::debug!(chat_id = %msg.chat.id, command = ?cmd, "Command received");

    let actions = ctx.conversations.handle(msg.chat.id, incoming);
    perform(&bot, &ctx, msg.chat.id, None, actions).await
}

pub async fn callback_handler(bot: Bot, q: CallbackQuery, ctx: BotContext) -> HandlerResult {
    bot.answer_callback_query(q.id.clone()).await?;

    let Some(message) = q.message.as_ref() else {
        return Ok(());
    };
    let chat_id = message.chat().id;

    let incoming = match q.data.as_deref() {
        Some(replies::SHARE_LOCATION) => Incoming::ShareLocationChosen,
        Some(replies::ENTER_CITY) => Incoming::EnterCityChosen,
        other => {
            tracing::debug!(%chat_id, data = ?other, "Ignoring unknown callback");
            return Ok(());
        }
    };

    let actions = ctx.conversations.handle(chat_id, incoming);
    perform(&bot, &ctx, chat_id, Some(message.id()), actions).await
}

pub async fn location_handler(bot: Bot, msg: Message, ctx: BotContext) -> HandlerResult {
    let Some(location) = msg.location() else {
        return Ok(());
    };

    let incoming = Incoming::LocationShared {
        latitude: location.latitude,
        longitude: location.longitude,
    };
    let actions = ctx.conversations.handle(msg.chat.id, incoming);
    perform(&bot, &ctx, msg.chat.id, None, actions).await
}

pub async fn text_handler(bot: Bot, msg: Message, ctx: BotContext) -> HandlerResult {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let actions = ctx
        .conversations
        .handle(msg.chat.id, Incoming::Text(text.to_string()));
    perform(&bot, &ctx, msg.chat.id, None, actions).await
}

/// Carry out actions in order. `origin` is the message whose button was
/// pressed, edited in place where the flow calls for it.
async fn perform(
    bot: &Bot,
    ctx: &BotContext,
    chat_id: ChatId,
    origin: Option<MessageId>,
    actions: Vec<Action>,
) -> HandlerResult {
    for action in actions {
        match action {
            Action::DeleteLocation => delete_stored_location(ctx, chat_id).await,
            Action::Send(reply) => send_reply(bot, chat_id, origin, reply).await?,
            Action::Register(input) => register(bot, ctx, chat_id, &input).await?,
        }
    }
    Ok(())
}

/// Forget the chat's stored location. Failures are logged and the flow
/// carries on.
async fn delete_stored_location(ctx: &BotContext, chat_id: ChatId) {
    match ctx.backend.delete_location(chat_id).await {
        Ok(DeleteOutcome::Deleted { user_id }) => {
            tracing::info!(%chat_id, user_id, "Deleted existing location");
        }
        Ok(DeleteOutcome::NotRegistered) => {
            tracing::info!(%chat_id, "No existing location found");
        }
        Err(e) => {
            tracing::error!(%chat_id, error = %e, "Error deleting location");
        }
    }
}

async fn register(
    bot: &Bot,
    ctx: &BotContext,
    chat_id: ChatId,
    input: &LocationInput,
) -> HandlerResult {
    let result = ctx.backend.register_location(chat_id, input).await;
    match &result {
        Ok(registered) => tracing::info!(
            %chat_id,
            user_id = registered.user_id,
            city = ?registered.city,
            "Registered location"
        ),
        Err(e) => tracing::error!(%chat_id, error = %e, "Failed to register location"),
    }

    let (text, keyboard) = registration_reply(&result, ctx.dashboard_url.as_deref(), chat_id);
    match keyboard {
        Some(markup) => {
            if let Err(e) = bot.send_message(chat_id, text).reply_markup(markup).await {
                // Telegram refuses some URLs (e.g. localhost) on buttons
                tracing::warn!(%chat_id, error = %e, "Dashboard button rejected, replying without it");
                let (plain, _) = registration_reply(&result, None, chat_id);
                bot.send_message(chat_id, plain).await?;
            }
        }
        None => {
            bot.send_message(chat_id, text).await?;
        }
    }
    Ok(())
}

/// Reply to a registration attempt. Success links the dashboard when a
/// usable URL is configured; failures get a generic text.
pub fn registration_reply(
    result: &Result<RegistrationResponse, BotError>,
    dashboard_url: Option<&str>,
    chat_id: ChatId,
) -> (&'static str, Option<InlineKeyboardMarkup>) {
    match result {
        Ok(_) => match dashboard_url.and_then(|base| replies::dashboard_url(base, chat_id)) {
            Some(url) => (
                replies::REGISTERED_WITH_DASHBOARD,
                Some(replies::dashboard_keyboard(url)),
            ),
            None => (replies::REGISTERED, None),
        },
        Err(BotError::Backend { .. }) => (replies::REGISTRATION_REJECTED, None),
        Err(BotError::Request(_)) => (replies::REGISTRATION_ERROR, None),
    }
}

async fn send_reply(
    bot: &Bot,
    chat_id: ChatId,
    origin: Option<MessageId>,
    reply: Reply,
) -> HandlerResult {
    match reply {
        Reply::Welcome => {
            bot.send_message(chat_id, replies::WELCOME)
                .reply_markup(replies::location_choice_keyboard())
                .await?;
        }
        Reply::ChangeLocation => {
            bot.send_message(chat_id, replies::CHANGE_LOCATION)
                .reply_markup(replies::location_choice_keyboard())
                .await?;
        }
        Reply::Help => {
            bot.send_message(chat_id, replies::HELP)
                .parse_mode(ParseMode::Html)
                .await?;
        }
        Reply::RequestLocationShare => {
            show(bot, chat_id, origin, replies::REQUEST_LOCATION_SHARE).await?;
            bot.send_message(chat_id, replies::TAP_TO_SHARE)
                .reply_markup(replies::location_request_keyboard())
                .await?;
        }
        Reply::AskCity => show(bot, chat_id, origin, replies::ASK_CITY).await?,
        Reply::LocationReceived => {
            bot.send_message(chat_id, replies::LOCATION_RECEIVED)
                .reply_markup(KeyboardRemove::new())
                .await?;
        }
        Reply::Fallback => {
            bot.send_message(chat_id, replies::FALLBACK).await?;
        }
    }
    Ok(())
}

/// Edit the pressed message if there is one, otherwise send a new one.
async fn show(bot: &Bot, chat_id: ChatId, origin: Option<MessageId>, text: &str) -> HandlerResult {
    match origin {
        Some(message_id) => {
            bot.edit_message_text(chat_id, message_id, text).await?;
        }
        None => {
            bot.send_message(chat_id, text).await?;
        }
    }
    Ok(())
}
