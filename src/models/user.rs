// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// Row of the `users` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned primary key
    pub id: i64,
    /// Telegram chat ID (unique)
    pub chat_id: i64,
    /// City name, if the user typed one
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl User {
    /// Stored coordinates, only when both halves are present.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    /// Overlay the fields present in `location`.
    ///
    /// Presence decides, not value: a latitude of 0.0 replaces the old one.
    pub fn apply(&mut self, location: &UserLocation) {
        if let Some(city) = &location.city {
            self.city = Some(city.clone());
        }
        if location.latitude.is_some() {
            self.latitude = location.latitude;
        }
        if location.longitude.is_some() {
            self.longitude = location.longitude;
        }
    }
}

/// Location fields written to the store; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserLocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

/// Insert payload for a user seen for the first time.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub chat_id: i64,
    #[serde(flatten)]
    pub location: UserLocation,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored_user() -> User {
        User {
            id: 7,
            chat_id: 42,
            city: Some("Oslo".to_string()),
            latitude: Some(59.9),
            longitude: Some(10.7),
        }
    }

    #[test]
    fn test_apply_keeps_zero_coordinates() {
        let mut user = stored_user();
        user.apply(&UserLocation {
            city: None,
            latitude: Some(0.0),
            longitude: Some(0.0),
        });

        assert_eq!(user.city.as_deref(), Some("Oslo"));
        assert_eq!(user.coordinates(), Some((0.0, 0.0)));
    }

    #[test]
    fn test_apply_city_only_keeps_coordinates() {
        let mut user = stored_user();
        user.apply(&UserLocation {
            city: Some("Bergen".to_string()),
            ..Default::default()
        });

        assert_eq!(user.city.as_deref(), Some("Bergen"));
        assert_eq!(user.coordinates(), Some((59.9, 10.7)));
    }

    #[test]
    fn test_new_user_omits_absent_fields() {
        let new_user = NewUser {
            chat_id: 42,
            location: UserLocation {
                city: Some("Oslo".to_string()),
                ..Default::default()
            },
        };

        let json = serde_json::to_value(&new_user).unwrap();
        assert_eq!(json, serde_json::json!({"chat_id": 42, "city": "Oslo"}));
    }

    #[test]
    fn test_user_row_tolerates_null_columns() {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": 1,
            "chat_id": 99,
            "city": null,
            "latitude": 51.5,
            "longitude": -0.12,
            "created_at": "2025-10-04T12:00:00Z"
        }))
        .unwrap();

        assert_eq!(user.city, None);
        assert_eq!(user.coordinates(), Some((51.5, -0.12)));
    }
}
