//! Weather lookup via the Open-Meteo current-weather endpoint

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use vox_core::{Error, Result, TransportError};

use crate::cities;

const OPEN_METEO_URL: &str = "https://api.open-meteo.com/v1/forecast";
const TIMEOUT_MS: u64 = 5000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weather {
    pub city: String,
    pub country: String,
    pub temperature_c: f64,
    pub wind_speed_kmh: f64,
    pub description: String,
}

#[derive(Deserialize)]
struct ForecastResponse {
    current_weather: CurrentWeather,
}

#[derive(Deserialize)]
struct CurrentWeather {
    temperature: f64,
    windspeed: f64,
    weathercode: u32,
}

pub struct WeatherClient {
    client: Client,
    base_url: String,
}

impl WeatherClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(OPEN_METEO_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(TIMEOUT_MS))
            .build()
            .map_err(|e| Error::Construction(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Current weather for a known city.
    pub async fn weather(&self, city_name: &str) -> Result<Weather> {
        let city = cities::find(city_name)
            .ok_or_else(|| Error::NotFound(format!("unknown city '{city_name}'")))?;

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", city.latitude.to_string()),
                ("longitude", city.longitude.to_string()),
                ("current_weather", "true".to_string()),
            ])
            .send()
            .await
            .map_err(map_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Transport(TransportError::Status {
                status: status.as_u16(),
                body,
            }));
        }

        let forecast: ForecastResponse = response
            .json()
            .await
            .map_err(|e| Error::Internal(format!("malformed weather response: {e}")))?;

        Ok(Weather {
            city: city.name.to_string(),
            country: city.country.to_string(),
            temperature_c: forecast.current_weather.temperature,
            wind_speed_kmh: forecast.current_weather.windspeed,
            description: describe(forecast.current_weather.weathercode).to_string(),
        })
    }
}

/// WMO weather interpretation codes, coarse buckets.
fn describe(code: u32) -> &'static str {
    match code {
        0 => "clear sky",
        1..=3 => "partly cloudy",
        45 | 48 => "fog",
        51..=57 => "drizzle",
        61..=67 => "rain",
        71..=77 => "snow",
        80..=82 => "rain showers",
        85 | 86 => "snow showers",
        95..=99 => "thunderstorm",
        _ => "unknown",
    }
}

fn map_transport(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Transport(TransportError::Timeout(TIMEOUT_MS))
    } else {
        Error::Transport(TransportError::Connection(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_code_buckets() {
        assert_eq!(describe(0), "clear sky");
        assert_eq!(describe(2), "partly cloudy");
        assert_eq!(describe(63), "rain");
        assert_eq!(describe(96), "thunderstorm");
        assert_eq!(describe(42), "unknown");
    }

    #[tokio::test]
    async fn test_unknown_city_fails_before_network() {
        // Unroutable base URL: if the lookup tried the network this would
        // surface a transport error, not a not-found.
        let client = WeatherClient::with_base_url("http://127.0.0.1:1").unwrap();
        let err = client.weather("atlantis").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
