// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod alerts;
pub mod locations;
pub mod weather;

pub use alerts::{AlertResponse, AlertService};
pub use locations::{LocationService, RegisterLocationRequest};
pub use weather::{WeatherQuery, WeatherService};
