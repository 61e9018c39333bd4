//! Error types for the Skycast weather service

use thiserror::Error;

/// Main error type for the weather pipeline.
///
/// Each variant carries the message text that ends up in the `{"error": ...}`
/// response body. Reverse-geocoding failures never appear here: they are
/// absorbed inside the resolver's fallback chain.
#[derive(Error, Debug)]
pub enum SkycastError {
    /// The `location` query parameter was missing or empty
    #[error("Location parameter is required")]
    MissingParameter,

    /// Forward geocoding returned an empty result set
    #[error("Location not found")]
    LocationNotFound,

    /// Forward geocoding provider answered with a non-success status
    #[error("Geocoding API error: {status}")]
    GeocodingProvider { status: u16 },

    /// Weather provider answered with a non-success status
    #[error("Weather API error: {status}")]
    WeatherProvider { status: u16 },

    /// Weather provider answered 2xx but the payload is missing the
    /// `current` or `daily` block
    #[error("Invalid weather data received from provider")]
    MalformedResponse,

    /// Catch-all for faults below the provider protocol (network errors,
    /// body decode failures, guarded coordinate parses)
    #[error("{message}")]
    Internal { message: String },
}

impl SkycastError {
    /// Create an internal error from any displayable cause
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// HTTP status code this error maps to on the API surface
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            SkycastError::MissingParameter => 400,
            SkycastError::LocationNotFound => 404,
            SkycastError::GeocodingProvider { .. }
            | SkycastError::WeatherProvider { .. }
            | SkycastError::MalformedResponse => 502,
            SkycastError::Internal { .. } => 500,
        }
    }
}

impl From<reqwest::Error> for SkycastError {
    fn from(source: reqwest::Error) -> Self {
        Self::Internal {
            message: source.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SkycastError::MissingParameter.to_string(),
            "Location parameter is required"
        );
        assert_eq!(
            SkycastError::LocationNotFound.to_string(),
            "Location not found"
        );
        assert_eq!(
            SkycastError::GeocodingProvider { status: 503 }.to_string(),
            "Geocoding API error: 503"
        );
        assert_eq!(
            SkycastError::WeatherProvider { status: 500 }.to_string(),
            "Weather API error: 500"
        );
        assert_eq!(
            SkycastError::MalformedResponse.to_string(),
            "Invalid weather data received from provider"
        );
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(SkycastError::MissingParameter.status_code(), 400);
        assert_eq!(SkycastError::LocationNotFound.status_code(), 404);
        assert_eq!(
            SkycastError::GeocodingProvider { status: 503 }.status_code(),
            502
        );
        assert_eq!(
            SkycastError::WeatherProvider { status: 500 }.status_code(),
            502
        );
        assert_eq!(SkycastError::MalformedResponse.status_code(), 502);
        assert_eq!(SkycastError::internal("boom").status_code(), 500);
    }

    #[test]
    fn test_internal_carries_message() {
        let err = SkycastError::internal("connection reset");
        assert_eq!(err.to_string(), "connection reset");
    }
}
