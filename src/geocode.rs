//! Geocoding provider clients
//!
//! Forward search goes through the Open-Meteo geocoding API (no API key
//! required). Reverse lookup goes through Nominatim (OpenStreetMap) first,
//! with the Open-Meteo search endpoint queried as `"lat,lon"` as a second
//! attempt. The reverse helpers return `Option<String>` and absorb every
//! failure internally; the resolver falls back to formatted coordinates
//! when both come back empty.

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::ProviderConfig;
use crate::error::SkycastError;

/// One match from the Open-Meteo geocoding search endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingResult {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: Option<String>,
    pub admin1: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    address: Option<NominatimAddress>,
}

/// Address block of a Nominatim reverse lookup. Every field is optional;
/// which ones appear depends on the kind of place the coordinates hit.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct NominatimAddress {
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub suburb: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

/// Forward geocode a place name, returning the provider's matches.
///
/// A non-success status is a hard failure of the name-query path and
/// propagates with the upstream status attached.
pub async fn forward_search(
    client: &Client,
    providers: &ProviderConfig,
    name: &str,
) -> Result<Vec<GeocodingResult>, SkycastError> {
    let url = format!(
        "{}?name={}&count=1",
        providers.geocoding_url,
        urlencoding::encode(name)
    );

    let response = client.get(&url).send().await?;
    if !response.status().is_success() {
        return Err(SkycastError::GeocodingProvider {
            status: response.status().as_u16(),
        });
    }

    let body: GeocodingResponse = response.json().await?;
    Ok(body.results.unwrap_or_default())
}

/// Reverse lookup coordinates via Nominatim.
///
/// Returns `None` on any failure: network error, non-2xx status, undecodable
/// body, or a body without an `address` block.
pub async fn reverse_lookup(
    client: &Client,
    providers: &ProviderConfig,
    latitude: f64,
    longitude: f64,
) -> Option<String> {
    let url = format!(
        "{}?format=json&lat={latitude}&lon={longitude}&zoom=10",
        providers.reverse_geocoding_url
    );

    let response = match client
        .get(&url)
        .header("Accept-Language", "en-US,en;q=0.9")
        .send()
        .await
    {
        Ok(r) => r,
        Err(e) => {
            debug!("Reverse geocode request failed: {}", e);
            return None;
        }
    };

    if !response.status().is_success() {
        debug!("Reverse geocode returned status {}", response.status());
        return None;
    }

    let body: NominatimResponse = match response.json().await {
        Ok(b) => b,
        Err(e) => {
            debug!("Reverse geocode parse error: {}", e);
            return None;
        }
    };

    let name = display_name_from_address(&body.address?);
    debug!("Reverse geocoded to: {}", name);
    Some(name)
}

/// Reverse lookup coordinates by searching `"lat,lon"` as a text query
/// against the forward geocoding endpoint. Same absorb-everything contract
/// as [`reverse_lookup`].
pub async fn reverse_lookup_fallback(
    client: &Client,
    providers: &ProviderConfig,
    latitude: f64,
    longitude: f64,
) -> Option<String> {
    let url = format!(
        "{}?name={latitude},{longitude}&count=1",
        providers.geocoding_url
    );

    let response = match client.get(&url).send().await {
        Ok(r) => r,
        Err(e) => {
            debug!("Fallback reverse geocode request failed: {}", e);
            return None;
        }
    };

    if !response.status().is_success() {
        debug!(
            "Fallback reverse geocode returned status {}",
            response.status()
        );
        return None;
    }

    let body: GeocodingResponse = match response.json().await {
        Ok(b) => b,
        Err(e) => {
            debug!("Fallback reverse geocode parse error: {}", e);
            return None;
        }
    };

    let first = body.results.unwrap_or_default().into_iter().next()?;
    let name = match first.country {
        Some(country) => format!("{}, {}", first.name, country),
        None => first.name,
    };
    debug!("Fallback reverse geocoded to: {}", name);
    Some(name)
}

/// Build a display name from a Nominatim address block.
///
/// Priority for the place part: city > town > village > suburb > county >
/// state, with `"Unknown Location"` when none is present. The country is
/// appended when available.
fn display_name_from_address(address: &NominatimAddress) -> String {
    let place = address
        .city
        .as_deref()
        .or(address.town.as_deref())
        .or(address.village.as_deref())
        .or(address.suburb.as_deref())
        .or(address.county.as_deref())
        .or(address.state.as_deref())
        .unwrap_or("Unknown Location");

    match address.country.as_deref() {
        Some(country) => format!("{place}, {country}"),
        None => place.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn address(
        city: Option<&str>,
        town: Option<&str>,
        state: Option<&str>,
        country: Option<&str>,
    ) -> NominatimAddress {
        NominatimAddress {
            city: city.map(String::from),
            town: town.map(String::from),
            state: state.map(String::from),
            country: country.map(String::from),
            ..NominatimAddress::default()
        }
    }

    #[test]
    fn test_city_and_country() {
        let addr = address(Some("Paris"), None, None, Some("France"));
        assert_eq!(display_name_from_address(&addr), "Paris, France");
    }

    #[test]
    fn test_city_wins_over_town() {
        let addr = address(Some("Lyon"), Some("Villeurbanne"), None, Some("France"));
        assert_eq!(display_name_from_address(&addr), "Lyon, France");
    }

    #[rstest]
    #[case(address(None, Some("Gornau"), None, Some("Germany")), "Gornau, Germany")]
    #[case(address(None, None, Some("Bavaria"), Some("Germany")), "Bavaria, Germany")]
    #[case(address(None, Some("Gornau"), None, None), "Gornau")]
    fn test_priority_chain(#[case] addr: NominatimAddress, #[case] expected: &str) {
        assert_eq!(display_name_from_address(&addr), expected);
    }

    #[test]
    fn test_empty_address_is_unknown() {
        let addr = NominatimAddress::default();
        assert_eq!(display_name_from_address(&addr), "Unknown Location");
    }

    #[test]
    fn test_unknown_place_keeps_country() {
        let addr = address(None, None, None, Some("France"));
        assert_eq!(display_name_from_address(&addr), "Unknown Location, France");
    }
}
