// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Location registration and deletion.
//!
//! Read-then-write against the store with no transaction: two concurrent
//! registrations for the same chat can race, and the last write wins.

use crate::db::SupabaseDb;
use crate::error::{AppError, Result};
use crate::models::{NewUser, User, UserLocation};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Body of `POST /register_location`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_location_present"))]
pub struct RegisterLocationRequest {
    #[serde(default)]
    pub chat_id: Option<i64>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: Option<f64>,
    #[serde(default)]
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: Option<f64>,
}

fn validate_location_present(
    req: &RegisterLocationRequest,
) -> std::result::Result<(), ValidationError> {
    let has_city = req.city.as_deref().is_some_and(|c| !c.trim().is_empty());

    match (req.latitude, req.longitude) {
        (Some(_), None) | (None, Some(_)) => Err(ValidationError::new("coordinates")
            .with_message("Latitude and longitude must be provided together".into())),
        (None, None) if !has_city => Err(ValidationError::new("location")
            .with_message("Either city name or coordinates are required".into())),
        _ => Ok(()),
    }
}

impl RegisterLocationRequest {
    /// Validate and normalize into `(chat_id, location)`.
    pub fn into_location(self) -> Result<(i64, UserLocation)> {
        let chat_id = self
            .chat_id
            .filter(|id| *id != 0)
            .ok_or_else(|| AppError::BadRequest("Chat ID is required".to_string()))?;

        self.validate()
            .map_err(|e| AppError::BadRequest(first_message(&e)))?;

        let location = UserLocation {
            city: self
                .city
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            latitude: self.latitude,
            longitude: self.longitude,
        };

        Ok((chat_id, location))
    }
}

/// Pull a single human-readable message out of a validation failure.
fn first_message(errors: &validator::ValidationErrors) -> String {
    errors
        .errors()
        .values()
        .find_map(|kind| match kind {
            validator::ValidationErrorsKind::Field(errs) => errs.first(),
            validator::ValidationErrorsKind::Struct(_) | validator::ValidationErrorsKind::List(_) => {
                None
            }
        })
        .and_then(|e| e.message.as_ref())
        .map(|m| m.to_string())
        .unwrap_or_else(|| "Invalid location".to_string())
}

/// Response of a successful registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationResponse {
    pub message: String,
    pub user_id: i64,
    pub chat_id: i64,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Response of a successful deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletionResponse {
    pub message: String,
    pub chat_id: i64,
    pub deleted_user_id: i64,
}

/// Registers and removes user locations.
#[derive(Clone)]
pub struct LocationService {
    db: SupabaseDb,
}

impl LocationService {
    pub fn new(db: SupabaseDb) -> Self {
        Self { db }
    }

    /// Update the user's row if the chat is known, otherwise insert one.
    pub async fn register(
        &self,
        chat_id: i64,
        location: UserLocation,
    ) -> Result<RegistrationResponse> {
        match self.db.find_user_by_chat_id(chat_id).await? {
            Some(existing) => {
                let updated = self.db.update_user(existing.id, &location).await?;

                // Fall back to the merge we expect when the store sends no row.
                let user = updated.unwrap_or_else(|| {
                    let mut merged = existing.clone();
                    merged.apply(&location);
                    merged
                });

                tracing::info!(chat_id, user_id = user.id, "Updated location");
                Ok(registration_response(
                    format!("Updated location for chat_id: {}", chat_id),
                    user,
                ))
            }
            None => {
                let user = self.db.insert_user(&NewUser { chat_id, location }).await?;

                tracing::info!(chat_id, user_id = user.id, "Registered location");
                Ok(registration_response(
                    format!("Successfully registered location for chat_id: {}", chat_id),
                    user,
                ))
            }
        }
    }

    /// Delete the user's row; an unknown chat is not found.
    pub async fn delete(&self, chat_id: i64) -> Result<DeletionResponse> {
        let existing = self
            .db
            .find_user_by_chat_id(chat_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with chat_id {} not found", chat_id)))?;

        self.db.delete_user(existing.id).await?;

        tracing::info!(chat_id, user_id = existing.id, "Deleted location");
        Ok(DeletionResponse {
            message: format!("Successfully deleted location for chat_id: {}", chat_id),
            chat_id,
            deleted_user_id: existing.id,
        })
    }
}

fn registration_response(message: String, user: User) -> RegistrationResponse {
    RegistrationResponse {
        message,
        user_id: user.id,
        chat_id: user.chat_id,
        city: user.city,
        latitude: user.latitude,
        longitude: user.longitude,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(chat_id: Option<i64>, city: Option<&str>, lat: Option<f64>, lon: Option<f64>) -> RegisterLocationRequest {
        RegisterLocationRequest {
            chat_id,
            city: city.map(str::to_string),
            latitude: lat,
            longitude: lon,
        }
    }

    fn bad_request_message(req: RegisterLocationRequest) -> String {
        match req.into_location() {
            Err(AppError::BadRequest(msg)) => msg,
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_city_is_trimmed() {
        let (chat_id, location) = request(Some(5), Some("  Lisbon "), None, None)
            .into_location()
            .unwrap();

        assert_eq!(chat_id, 5);
        assert_eq!(location.city.as_deref(), Some("Lisbon"));
        assert_eq!(location.latitude, None);
    }

    #[test]
    fn test_coordinates_only_accepted() {
        let (_, location) = request(Some(5), None, Some(0.0), Some(0.0))
            .into_location()
            .unwrap();

        assert_eq!(location.city, None);
        assert_eq!(location.latitude, Some(0.0));
        assert_eq!(location.longitude, Some(0.0));
    }

    #[test]
    fn test_missing_chat_id_rejected() {
        assert_eq!(
            bad_request_message(request(None, Some("Lisbon"), None, None)),
            "Chat ID is required"
        );
        assert_eq!(
            bad_request_message(request(Some(0), Some("Lisbon"), None, None)),
            "Chat ID is required"
        );
    }

    #[test]
    fn test_missing_location_rejected() {
        assert_eq!(
            bad_request_message(request(Some(5), None, None, None)),
            "Either city name or coordinates are required"
        );
        assert_eq!(
            bad_request_message(request(Some(5), Some("   "), None, None)),
            "Either city name or coordinates are required"
        );
    }

    #[test]
    fn test_half_coordinates_rejected() {
        assert_eq!(
            bad_request_message(request(Some(5), Some("Lisbon"), Some(38.7), None)),
            "Latitude and longitude must be provided together"
        );
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert_eq!(
            bad_request_message(request(Some(5), None, Some(91.0), Some(10.0))),
            "Latitude must be between -90 and 90"
        );
    }
}
