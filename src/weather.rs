//! Weather fetch and normalization
//!
//! Issues one request to the Open-Meteo forecast endpoint and reshapes the
//! payload into [`WeatherSnapshot`], the stable schema the API serves. The
//! provider payload is decoded through an explicit optional-field schema;
//! nothing untyped crosses this boundary. Normalization is renaming and
//! selection only: no unit conversion happens here, that belongs to the
//! presentation layer.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ProviderConfig;
use crate::error::SkycastError;
use crate::location_resolver::ResolvedLocation;

/// Fields requested from the `current` block of the forecast endpoint
const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,is_day,precipitation,weather_code,pressure_msl,surface_pressure,wind_speed_10m,wind_direction_10m,visibility";

/// Fields requested from the `daily` block of the forecast endpoint
const DAILY_FIELDS: &str =
    "weather_code,temperature_2m_max,temperature_2m_min,precipitation_sum,precipitation_probability_max";

/// Normalized weather for one location: current conditions, daily forecast
/// and the location that produced them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub current: CurrentConditions,
    pub daily: DailyForecast,
    pub location: ResolvedLocation,
}

/// Current conditions in the stable output schema.
///
/// Fields the provider did not send serialize as `null` rather than being
/// coerced to a default value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature: Option<f64>,
    pub weathercode: Option<u8>,
    pub windspeed: Option<f64>,
    pub winddirection: Option<f64>,
    pub time: Option<String>,
    pub humidity: Option<f64>,
    pub apparent_temperature: Option<f64>,
    pub precipitation: Option<f64>,
    /// Surface pressure when available, mean-sea-level pressure otherwise
    pub pressure: Option<f64>,
    pub visibility: Option<f64>,
    pub is_day: Option<u8>,
}

/// Daily forecast as parallel sequences, index `i` describing the same day
/// across all of them. Order and length are exactly as received from the
/// provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyForecast {
    pub time: Vec<chrono::NaiveDate>,
    pub weathercode: Option<Vec<Option<u8>>>,
    pub temperature_2m_max: Option<Vec<Option<f64>>>,
    pub temperature_2m_min: Option<Vec<Option<f64>>>,
    pub precipitation_sum: Option<Vec<Option<f64>>>,
    pub precipitation_probability_max: Option<Vec<Option<f64>>>,
}

/// Fetch the forecast for a resolved location and normalize it
pub async fn fetch_normalized(
    client: &Client,
    providers: &ProviderConfig,
    location: ResolvedLocation,
) -> Result<WeatherSnapshot, SkycastError> {
    let url = format!(
        "{}?latitude={}&longitude={}&current={CURRENT_FIELDS}&daily={DAILY_FIELDS}&timezone=auto",
        providers.forecast_url, location.latitude, location.longitude
    );
    debug!("Forecast request URL: {}", url);

    let response = client.get(&url).send().await?;
    if !response.status().is_success() {
        return Err(SkycastError::WeatherProvider {
            status: response.status().as_u16(),
        });
    }

    let body: open_meteo::ForecastResponse = response.json().await?;
    normalize(body, location)
}

/// Reshape a decoded provider response into the stable output schema.
///
/// Absence of either top-level block is fatal; there is no partial snapshot.
fn normalize(
    response: open_meteo::ForecastResponse,
    location: ResolvedLocation,
) -> Result<WeatherSnapshot, SkycastError> {
    let current = response.current.ok_or(SkycastError::MalformedResponse)?;
    let daily = response.daily.ok_or(SkycastError::MalformedResponse)?;

    Ok(WeatherSnapshot {
        current: CurrentConditions {
            temperature: current.temperature,
            weathercode: current.weather_code,
            windspeed: current.wind_speed,
            winddirection: current.wind_direction,
            time: current.time,
            humidity: current.humidity,
            apparent_temperature: current.apparent_temperature,
            precipitation: current.precipitation,
            pressure: current.surface_pressure.or(current.pressure_msl),
            visibility: current.visibility,
            is_day: current.is_day,
        },
        daily: DailyForecast {
            time: daily.time,
            weathercode: daily.weather_code,
            temperature_2m_max: daily.temperature_max,
            temperature_2m_min: daily.temperature_min,
            precipitation_sum: daily.precipitation_sum,
            precipitation_probability_max: daily.precipitation_probability_max,
        },
        location,
    })
}

/// Convert a WMO weather code to a human-readable description
#[must_use]
pub fn weather_code_description(code: u8) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}

/// Open-Meteo forecast response schema. Every field is optional at this
/// boundary; required-ness is enforced during normalization.
mod open_meteo {
    use chrono::NaiveDate;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        pub current: Option<CurrentData>,
        pub daily: Option<DailyData>,
    }

    #[derive(Debug, Deserialize)]
    pub struct CurrentData {
        pub time: Option<String>,
        #[serde(rename = "temperature_2m")]
        pub temperature: Option<f64>,
        #[serde(rename = "relative_humidity_2m")]
        pub humidity: Option<f64>,
        pub apparent_temperature: Option<f64>,
        pub is_day: Option<u8>,
        pub precipitation: Option<f64>,
        pub weather_code: Option<u8>,
        pub pressure_msl: Option<f64>,
        pub surface_pressure: Option<f64>,
        #[serde(rename = "wind_speed_10m")]
        pub wind_speed: Option<f64>,
        #[serde(rename = "wind_direction_10m")]
        pub wind_direction: Option<f64>,
        pub visibility: Option<f64>,
    }

    #[derive(Debug, Deserialize)]
    pub struct DailyData {
        pub time: Vec<NaiveDate>,
        pub weather_code: Option<Vec<Option<u8>>>,
        #[serde(rename = "temperature_2m_max")]
        pub temperature_max: Option<Vec<Option<f64>>>,
        #[serde(rename = "temperature_2m_min")]
        pub temperature_min: Option<Vec<Option<f64>>>,
        pub precipitation_sum: Option<Vec<Option<f64>>>,
        pub precipitation_probability_max: Option<Vec<Option<f64>>>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn test_location() -> ResolvedLocation {
        ResolvedLocation {
            name: "London, United Kingdom".to_string(),
            latitude: 51.5074,
            longitude: -0.1278,
        }
    }

    fn full_response() -> serde_json::Value {
        json!({
            "latitude": 51.5,
            "longitude": -0.12,
            "timezone": "Europe/London",
            "current": {
                "time": "2024-03-14T12:00",
                "temperature_2m": 11.3,
                "relative_humidity_2m": 76.0,
                "apparent_temperature": 9.8,
                "is_day": 1,
                "precipitation": 0.0,
                "weather_code": 3,
                "pressure_msl": 1013.2,
                "surface_pressure": 1010.4,
                "wind_speed_10m": 14.2,
                "wind_direction_10m": 230.0,
                "visibility": 24140.0
            },
            "daily": {
                "time": ["2024-03-14", "2024-03-15", "2024-03-16"],
                "weather_code": [3, 61, 80],
                "temperature_2m_max": [12.1, 10.4, 9.9],
                "temperature_2m_min": [6.0, 5.2, 4.1],
                "precipitation_sum": [0.0, 4.2, 1.1],
                "precipitation_probability_max": [10, 85, 60]
            }
        })
    }

    fn decode(value: serde_json::Value) -> open_meteo::ForecastResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_normalize_full_response() {
        let snapshot = normalize(decode(full_response()), test_location()).unwrap();

        assert_eq!(snapshot.current.temperature, Some(11.3));
        assert_eq!(snapshot.current.weathercode, Some(3));
        assert_eq!(snapshot.current.windspeed, Some(14.2));
        assert_eq!(snapshot.current.humidity, Some(76.0));
        assert_eq!(snapshot.current.is_day, Some(1));
        assert_eq!(snapshot.current.time.as_deref(), Some("2024-03-14T12:00"));
        assert_eq!(snapshot.location.name, "London, United Kingdom");
    }

    #[test]
    fn test_pressure_prefers_surface_pressure() {
        let snapshot = normalize(decode(full_response()), test_location()).unwrap();
        assert_eq!(snapshot.current.pressure, Some(1010.4));
    }

    #[test]
    fn test_pressure_falls_back_to_msl() {
        let mut value = full_response();
        value["current"]["surface_pressure"] = serde_json::Value::Null;
        value["current"]["pressure_msl"] = json!(1013.0);

        let snapshot = normalize(decode(value), test_location()).unwrap();
        assert_eq!(snapshot.current.pressure, Some(1013.0));
    }

    #[test]
    fn test_missing_daily_is_malformed() {
        let mut value = full_response();
        value.as_object_mut().unwrap().remove("daily");

        let err = normalize(decode(value), test_location()).unwrap_err();
        assert!(matches!(err, SkycastError::MalformedResponse));
    }

    #[test]
    fn test_missing_current_is_malformed() {
        let mut value = full_response();
        value.as_object_mut().unwrap().remove("current");

        let err = normalize(decode(value), test_location()).unwrap_err();
        assert!(matches!(err, SkycastError::MalformedResponse));
    }

    #[test]
    fn test_daily_sequences_keep_order_and_length() {
        let snapshot = normalize(decode(full_response()), test_location()).unwrap();
        let daily = &snapshot.daily;

        assert_eq!(daily.time.len(), 3);
        assert_eq!(daily.weathercode.as_ref().unwrap().len(), 3);
        assert_eq!(daily.temperature_2m_max.as_ref().unwrap().len(), 3);
        assert_eq!(
            daily.weathercode.as_ref().unwrap()[1..],
            [Some(61), Some(80)]
        );
        assert_eq!(daily.time[0].to_string(), "2024-03-14");
    }

    #[rstest]
    #[case(0, "Clear sky")]
    #[case(3, "Overcast")]
    #[case(55, "Dense drizzle")]
    #[case(82, "Violent rain showers")]
    #[case(99, "Thunderstorm with heavy hail")]
    #[case(42, "Unknown")]
    fn test_weather_code_description(#[case] code: u8, #[case] expected: &str) {
        assert_eq!(weather_code_description(code), expected);
    }
}
