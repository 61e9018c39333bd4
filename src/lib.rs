//! Skycast - backend for a browser weather dashboard
//!
//! This library provides the location-resolution and weather-normalization
//! pipeline behind `GET /api/weather`: free-text or coordinate input is
//! resolved to coordinates and a display name through a chain of geocoding
//! providers, then the Open-Meteo forecast for those coordinates is
//! normalized into a stable response schema.

pub mod api;
pub mod config;
pub mod error;
pub mod geocode;
pub mod location_resolver;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use api::{AppState, handle_weather_request};
pub use config::SkycastConfig;
pub use error::SkycastError;
pub use location_resolver::{LocationQuery, LocationResolver, ResolvedLocation};
pub use weather::{WeatherSnapshot, weather_code_description};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, SkycastError>;
