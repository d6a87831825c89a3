// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reply texts and keyboards.

use reqwest::Url;
use teloxide::types::{
    ButtonRequest, ChatId, InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton,
    KeyboardMarkup,
};

/// Callback data of the "share location" inline button.
pub const SHARE_LOCATION: &str = "share_location";
/// Callback data of the "enter manually" inline button.
pub const ENTER_CITY: &str = "enter_city";

pub const WELCOME: &str = "Hello! 🌍 I can alert you about daily weather and air quality.\n\
    Please share your location 📍 or type your city name.";

pub const CHANGE_LOCATION: &str = "📍 Let's update your location for weather alerts!\n\
    Please share your new location 📍 or type your new city name.";

pub const REQUEST_LOCATION_SHARE: &str = "Getting your location automatically... 📍\n\n\
    Please share your location using the button below:";

pub const TAP_TO_SHARE: &str = "Tap the button to automatically share your location:";

pub const ASK_CITY: &str = "Please type your city name:\n\n\
    Example: London, New York, Tokyo, etc.";

pub const LOCATION_RECEIVED: &str = "📍 Location received! Processing your registration...";

pub const FALLBACK: &str =
    "Please use /start to begin registration or type /help for available commands.";

pub const REGISTERED: &str = "✅ Successfully registered! You'll now receive daily weather and air quality updates.\n\
    Use /start to reset your location or /changelocation to update it.";

pub const REGISTERED_WITH_DASHBOARD: &str = "✅ Successfully registered! You'll now receive daily weather and air quality updates.\n\
    Tap 'Open Dashboard' below to view your data.\n\n\
    Use /start to reset your location or /changelocation to update it.";

pub const REGISTRATION_REJECTED: &str =
    "❌ Sorry, I couldn't register your location. Please try again later.";

pub const REGISTRATION_ERROR: &str = "❌ Sorry, I encountered an error. Please try again later.";

/// HTML parse mode.
pub const HELP: &str = "🌤️ <b>WeatherSphere Bot Commands:</b>\n\n\
    /start - Begin registration for weather alerts\n\
    /changelocation - Update your location for weather alerts\n\
    /help - Show this help message\n\n\
    <b>Features:</b>\n\
    • Daily weather notifications\n\
    • Air quality alerts\n\
    • Location-based updates\n\
    • Personal weather dashboard\n\n\
    To get started, use /start and share your location!\n\
    Already registered? Use /changelocation to update your location.";

/// Share-or-type choice shown by /start and /changelocation.
pub fn location_choice_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback("📍 Share Location", SHARE_LOCATION),
        InlineKeyboardButton::callback("✏️ Enter Manually", ENTER_CITY),
    ]])
}

/// One-time reply keyboard that asks the client for its location.
pub fn location_request_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![
        KeyboardButton::new("📍 Share My Location").request(ButtonRequest::Location)
    ]])
    .resize_keyboard()
    .one_time_keyboard()
}

/// Dashboard link for a chat, `None` if the configured URL is unusable.
pub fn dashboard_url(base: &str, chat_id: ChatId) -> Option<Url> {
    let mut url = Url::parse(&format!("{}/", base.trim_end_matches('/'))).ok()?;
    url.query_pairs_mut()
        .append_pair("chat_id", &chat_id.0.to_string());
    Some(url)
}

pub fn dashboard_keyboard(url: Url) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::url(
        "🌤️ Open Dashboard",
        url,
    )]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_url_carries_chat_id() {
        let url = dashboard_url("https://dash.example.com/", ChatId(-100123)).unwrap();
        assert_eq!(url.as_str(), "https://dash.example.com/?chat_id=-100123");
    }

    #[test]
    fn test_dashboard_url_rejects_garbage() {
        assert!(dashboard_url("not a url", ChatId(1)).is_none());
    }
}
