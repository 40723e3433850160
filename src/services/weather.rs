//! weatherapi.com forecast client.
//!
//! Fetches current conditions plus a multi-day/hourly forecast in a single
//! request. See: https://www.weatherapi.com/docs/

use chrono::NaiveDate;
use serde::Deserialize;
use std::fmt;

use crate::config::{AppConfig, MAX_FORECAST_DAYS};
use crate::errors::{AppError, ProviderErrorBody};
use crate::services::alerts::generate_alerts;
use crate::services::beaufort::{classify_wind, BeaufortCategory};
use crate::services::geocoding::Coordinate;

/// Client for the weatherapi.com forecast endpoint.
#[derive(Clone)]
pub struct WeatherClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl fmt::Debug for WeatherClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

// --- weatherapi.com JSON response types ---

/// One forecast response: current conditions plus per-day and per-hour data.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastSnapshot {
    #[serde(default)]
    pub location: Option<ForecastLocation>,
    pub current: CurrentConditions,
    pub forecast: Forecast,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastLocation {
    pub name: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub tz_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Condition {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurrentConditions {
    pub temp_c: f64,
    pub wind_kph: f64,
    pub condition: Condition,
    pub humidity: f64,
    pub precip_mm: f64,
    pub cloud: f64,
    pub uv: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Forecast {
    pub forecastday: Vec<ForecastDay>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub day: DaySummary,
    pub astro: Astro,
    pub hour: Vec<HourlyForecast>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DaySummary {
    pub maxtemp_c: f64,
    pub mintemp_c: f64,
    pub condition: Condition,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Astro {
    pub sunrise: String,
    pub sunset: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HourlyForecast {
    /// Local time, "YYYY-MM-DD HH:MM".
    pub time: String,
    pub temp_c: f64,
}

/// One point of an hourly temperature series.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyPoint {
    /// "HH:MM"
    pub label: String,
    pub temp_c: f64,
}

impl ForecastSnapshot {
    /// The first forecast day, normally today.
    pub fn today(&self) -> Option<&ForecastDay> {
        self.forecast.forecastday.first()
    }

    /// Hourly temperatures for one forecast day, labelled by time of day.
    /// Returns an empty series when the day is not in the forecast.
    pub fn hourly_temperatures(&self, day_index: usize) -> Vec<HourlyPoint> {
        let Some(day) = self.forecast.forecastday.get(day_index) else {
            return Vec::new();
        };

        day.hour
            .iter()
            .map(|h| HourlyPoint {
                label: h
                    .time
                    .split_once(' ')
                    .map(|(_, clock)| clock.to_string())
                    .unwrap_or_else(|| h.time.clone()),
                temp_c: h.temp_c,
            })
            .collect()
    }

    pub fn wind_description(&self) -> BeaufortCategory {
        classify_wind(self.current.wind_kph)
    }

    /// Threshold alerts for the current conditions.
    pub fn alerts(&self) -> Vec<String> {
        generate_alerts(self.current.temp_c, self.current.wind_kph)
    }
}

/// Keep `days` inside the range the provider accepts.
fn clamp_days(days: u8) -> u8 {
    let clamped = days.clamp(1, MAX_FORECAST_DAYS);
    if clamped != days {
        tracing::warn!(
            "Requested {} forecast days, clamping to {} (allowed 1-{})",
            days,
            clamped,
            MAX_FORECAST_DAYS
        );
    }
    clamped
}

impl WeatherClient {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.weather_api_base_url.trim_end_matches('/').to_string(),
            api_key: config.weather_api_key.clone(),
        })
    }

    /// Fetch the forecast for a coordinate.
    pub async fn fetch_forecast(
        &self,
        coordinate: Coordinate,
        days: u8,
    ) -> Result<ForecastSnapshot, AppError> {
        self.fetch(&coordinate.to_string(), days).await
    }

    /// Fetch the forecast for a free-text place name ("Paris", "Ottawa").
    pub async fn fetch_forecast_for(
        &self,
        place_name: &str,
        days: u8,
    ) -> Result<ForecastSnapshot, AppError> {
        self.fetch(place_name, days).await
    }

    async fn fetch(&self, query: &str, days: u8) -> Result<ForecastSnapshot, AppError> {
        let url = format!("{}/forecast.json", self.base_url);
        let days = clamp_days(days).to_string();

        tracing::debug!("Fetching forecast q='{}' days={}", query, days);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", query),
                ("days", days.as_str()),
                ("aqi", "no"),
                ("alerts", "no"),
            ])
            .send()
            .await
            .map_err(|e| AppError::from_reqwest("weatherapi.com", e))?;

        let status = response.status();
        if !status.is_success() {
            // Provider errors carry a JSON body with a message; fall back to
            // the bare status when it is missing or unreadable.
            let detail = response
                .json::<ProviderErrorBody>()
                .await
                .map(|body| format!(": {}", body.error.message))
                .unwrap_or_default();
            return Err(AppError::Provider(format!(
                "weatherapi.com returned HTTP {}{}",
                status, detail
            )));
        }

        let snapshot: ForecastSnapshot = response
            .json()
            .await
            .map_err(|e| AppError::from_reqwest("weatherapi.com", e))?;

        tracing::debug!(
            "Forecast for '{}': {}°C, {} km/h, {} days",
            query,
            snapshot.current.temp_c,
            snapshot.current.wind_kph,
            snapshot.forecast.forecastday.len()
        );

        Ok(snapshot)
    }
}

/// Sample payload shared by tests across modules.
#[cfg(test)]
pub(crate) fn sample_forecast_json(temp_c: f64, wind_kph: f64) -> serde_json::Value {
    serde_json::json!({
        "location": {
            "name": "Sao Paulo",
            "region": "Sao Paulo",
            "country": "Brazil",
            "lat": -23.53,
            "lon": -46.62,
            "tz_id": "America/Sao_Paulo"
        },
        "current": {
            "temp_c": temp_c,
            "wind_kph": wind_kph,
            "condition": { "text": "Partly cloudy" },
            "humidity": 62,
            "precip_mm": 0.1,
            "cloud": 50,
            "uv": 6.0
        },
        "forecast": {
            "forecastday": [
                {
                    "date": "2026-10-19",
                    "day": {
                        "maxtemp_c": 29.4,
                        "mintemp_c": 17.8,
                        "condition": { "text": "Patchy rain nearby" }
                    },
                    "astro": { "sunrise": "05:37 AM", "sunset": "06:12 PM" },
                    "hour": [
                        { "time": "2026-10-19 00:00", "temp_c": 18.9 },
                        { "time": "2026-10-19 01:00", "temp_c": 18.4 },
                        { "time": "2026-10-19 02:00", "temp_c": 18.1 }
                    ]
                },
                {
                    "date": "2026-10-20",
                    "day": {
                        "maxtemp_c": 31.2,
                        "mintemp_c": 19.0,
                        "condition": { "text": "Sunny" }
                    },
                    "astro": { "sunrise": "05:36 AM", "sunset": "06:13 PM" },
                    "hour": []
                }
            ]
        }
    })
}
