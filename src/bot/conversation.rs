// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-chat conversation flow.
//!
//! [`transition`] is pure: it maps the current state and an incoming event
//! to the next state and the actions the handlers must perform.
//! [`ConversationStore`] applies it under the chat's map entry lock, so
//! two updates for one chat never interleave their read-modify-write.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use teloxide::types::ChatId;

/// Where a chat is in the registration flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversationState {
    #[default]
    Idle,
    /// Offered the share/type choice
    AwaitingLocation,
    /// Shown the "share my location" keyboard
    AwaitingLocationShare,
    /// Asked to type a city
    AwaitingCity,
}

/// Something the user did.
#[derive(Debug, Clone, PartialEq)]
pub enum Incoming {
    Start,
    ChangeLocation,
    Help,
    /// `share_location` button
    ShareLocationChosen,
    /// `enter_city` button
    EnterCityChosen,
    LocationShared { latitude: f64, longitude: f64 },
    Text(String),
}

/// Location collected from the user.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationInput {
    City(String),
    Coordinates { latitude: f64, longitude: f64 },
}

/// Canned replies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Welcome,
    ChangeLocation,
    Help,
    RequestLocationShare,
    AskCity,
    LocationReceived,
    Fallback,
}

/// Work for the handlers, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Remove any stored location for the chat
    DeleteLocation,
    Send(Reply),
    Register(LocationInput),
}

/// Compute the next state and the actions for one event.
pub fn transition(state: ConversationState, incoming: Incoming) -> (ConversationState, Vec<Action>) {
    use ConversationState::*;

    match incoming {
        Incoming::Start => (
            AwaitingLocation,
            vec![Action::DeleteLocation, Action::Send(Reply::Welcome)],
        ),
        Incoming::ChangeLocation => (AwaitingLocation, vec![Action::Send(Reply::ChangeLocation)]),
        Incoming::Help => (state, vec![Action::Send(Reply::Help)]),
        Incoming::ShareLocationChosen => (
            AwaitingLocationShare,
            vec![Action::Send(Reply::RequestLocationShare)],
        ),
        Incoming::EnterCityChosen => (AwaitingCity, vec![Action::Send(Reply::AskCity)]),
        Incoming::LocationShared {
            latitude,
            longitude,
        } => (
            Idle,
            vec![
                Action::Send(Reply::LocationReceived),
                Action::Register(LocationInput::Coordinates {
                    latitude,
                    longitude,
                }),
            ],
        ),
        Incoming::Text(text) => {
            let text = text.trim();
            if text.starts_with('/') {
                // Unknown command
                (state, Vec::new())
            } else if state != AwaitingCity {
                (state, vec![Action::Send(Reply::Fallback)])
            } else if text.is_empty() {
                (AwaitingCity, vec![Action::Send(Reply::AskCity)])
            } else {
                (
                    Idle,
                    vec![Action::Register(LocationInput::City(text.to_string()))],
                )
            }
        }
    }
}

/// In-memory conversation state, keyed by chat. Lost on restart.
#[derive(Clone, Default)]
pub struct ConversationStore {
    states: Arc<DashMap<ChatId, ConversationState>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of a chat.
    pub fn get(&self, chat_id: ChatId) -> ConversationState {
        self.states
            .get(&chat_id)
            .map(|s| *s)
            .unwrap_or_default()
    }

    /// Apply an event to a chat and return the actions to perform.
    ///
    /// Idle chats are not kept in the map.
    pub fn handle(&self, chat_id: ChatId, incoming: Incoming) -> Vec<Action> {
        match self.states.entry(chat_id) {
            Entry::Occupied(mut entry) => {
                let (next, actions) = transition(*entry.get(), incoming);
                if next == ConversationState::Idle {
                    entry.remove();
                } else {
                    entry.insert(next);
                }
                actions
            }
            Entry::Vacant(entry) => {
                let (next, actions) = transition(ConversationState::Idle, incoming);
                if next != ConversationState::Idle {
                    entry.insert(next);
                }
                actions
            }
        }
    }

    /// Number of chats mid-flow.
    pub fn active_chats(&self) -> usize {
        self.states.len()
    }
}
