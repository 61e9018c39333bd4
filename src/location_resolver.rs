//! Location Resolution Module
//!
//! Turns a raw location string (free-text place name or a `lat,lon`
//! coordinate pair) into a [`ResolvedLocation`] with canonical coordinates
//! and a display name. Coordinate input is resolved through a fallback
//! chain of reverse lookups that always terminates with a formatted
//! coordinate string, so the coordinate path never fails past the numeric
//! parse. Name input goes through forward geocoding and its failures
//! propagate to the caller.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ProviderConfig;
use crate::error::SkycastError;
use crate::geocode;

/// Coordinate pairs are exactly `<float>,<float>` with no whitespace.
/// Anything else is treated as a place name.
static COORDINATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+(\.\d+)?,-?\d+(\.\d+)?$").unwrap());

/// A location query, classified by shape
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    /// Already-resolved coordinates, needing only a display name
    Coordinates(f64, f64),
    /// A place name needing forward geocoding
    Name(String),
}

impl LocationQuery {
    /// Classify a raw location string.
    ///
    /// The numeric parse after a regex match cannot fail for the pattern
    /// above, but it is guarded anyway rather than coerced to a default.
    pub fn parse(input: &str) -> Result<Self, SkycastError> {
        if !COORDINATE_RE.is_match(input) {
            return Ok(Self::Name(input.to_string()));
        }

        let (lat, lon) = input
            .split_once(',')
            .ok_or_else(|| SkycastError::internal(format!("Invalid coordinates: {input}")))?;
        let latitude = lat
            .parse::<f64>()
            .map_err(|_| SkycastError::internal(format!("Invalid latitude: {lat}")))?;
        let longitude = lon
            .parse::<f64>()
            .map_err(|_| SkycastError::internal(format!("Invalid longitude: {lon}")))?;

        Ok(Self::Coordinates(latitude, longitude))
    }
}

/// A fully resolved location: coordinates plus a non-empty display name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Service for resolving location inputs
pub struct LocationResolver;

impl LocationResolver {
    /// Resolve a raw location string into a [`ResolvedLocation`]
    pub async fn resolve(
        client: &Client,
        providers: &ProviderConfig,
        raw: &str,
    ) -> Result<ResolvedLocation, SkycastError> {
        debug!("Resolving location input: {:?}", raw);

        let location = match LocationQuery::parse(raw)? {
            LocationQuery::Coordinates(lat, lon) => {
                Self::resolve_coordinates(client, providers, lat, lon).await
            }
            LocationQuery::Name(name) => Self::resolve_name(client, providers, &name).await?,
        };

        debug!(
            "Resolved location: {} at ({}, {})",
            location.name, location.latitude, location.longitude
        );

        Ok(location)
    }

    /// Resolve coordinates to a display name via the reverse-lookup chain.
    ///
    /// Strategies in order: Nominatim reverse lookup, Open-Meteo search for
    /// `"lat,lon"`, formatted coordinates. The last one always succeeds, so
    /// this path is infallible.
    async fn resolve_coordinates(
        client: &Client,
        providers: &ProviderConfig,
        latitude: f64,
        longitude: f64,
    ) -> ResolvedLocation {
        let name = match geocode::reverse_lookup(client, providers, latitude, longitude).await {
            Some(name) => name,
            None => {
                debug!("Primary reverse lookup failed, trying fallback provider");
                match geocode::reverse_lookup_fallback(client, providers, latitude, longitude)
                    .await
                {
                    Some(name) => name,
                    None => {
                        debug!("All reverse lookups failed, using formatted coordinates");
                        format_coordinate_name(latitude, longitude)
                    }
                }
            }
        };

        ResolvedLocation {
            name,
            latitude,
            longitude,
        }
    }

    /// Resolve a place name to coordinates via forward geocoding
    async fn resolve_name(
        client: &Client,
        providers: &ProviderConfig,
        name: &str,
    ) -> Result<ResolvedLocation, SkycastError> {
        let results = geocode::forward_search(client, providers, name).await?;
        let first = results
            .into_iter()
            .next()
            .ok_or(SkycastError::LocationNotFound)?;

        // Country takes priority over the admin1 region for the suffix
        let display_name = if let Some(country) = first.country {
            format!("{}, {}", first.name, country)
        } else if let Some(admin1) = first.admin1 {
            format!("{}, {}", first.name, admin1)
        } else {
            first.name
        };

        Ok(ResolvedLocation {
            name: display_name,
            latitude: first.latitude,
            longitude: first.longitude,
        })
    }
}

/// Terminal fallback display name for the coordinate path
fn format_coordinate_name(latitude: f64, longitude: f64) -> String {
    format!("Location ({latitude:.2}, {longitude:.2})")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("48.8566,2.3522", LocationQuery::Coordinates(48.8566, 2.3522))]
    #[case("-33.87,151.21", LocationQuery::Coordinates(-33.87, 151.21))]
    #[case("51,-0", LocationQuery::Coordinates(51.0, 0.0))]
    #[case("-12.5,-68.9", LocationQuery::Coordinates(-12.5, -68.9))]
    fn test_parse_coordinate_pairs(#[case] input: &str, #[case] expected: LocationQuery) {
        assert_eq!(LocationQuery::parse(input).unwrap(), expected);
    }

    #[rstest]
    #[case("London")]
    #[case("New York")]
    #[case("48.8566, 2.3522")] // whitespace after comma is not a pair
    #[case("48.8566 ,2.3522")]
    #[case("1,2,3")]
    #[case("12.34")]
    #[case("lat,lon")]
    fn test_parse_name_queries(#[case] input: &str) {
        assert!(matches!(
            LocationQuery::parse(input).unwrap(),
            LocationQuery::Name(_)
        ));
    }

    #[test]
    fn test_format_coordinate_name_rounds_to_two_places() {
        assert_eq!(
            format_coordinate_name(48.8566, 2.3522),
            "Location (48.86, 2.35)"
        );
        assert_eq!(
            format_coordinate_name(-33.0, 151.2),
            "Location (-33.00, 151.20)"
        );
    }
}
