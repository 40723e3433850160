use crate::errors::AppError;

/// Largest `days` value the forecast provider accepts.
pub const MAX_FORECAST_DAYS: u8 = 8;

/// Application configuration, parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// weatherapi.com key. Never hard-coded; injected into `WeatherClient`.
    pub weather_api_key: String,
    pub weather_api_base_url: String,
    pub geocoding_base_url: String,
    /// Country filter sent with every place search.
    pub geocoding_country: String,
    pub user_agent: String,
    pub forecast_days: u8,
    /// Optional city/state searched once at startup.
    pub dashboard_city: Option<String>,
    pub dashboard_state: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. `from_env` passes the
    /// process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let weather_api_key = lookup("WEATHER_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AppError::Config("WEATHER_API_KEY must be set".to_string()))?;

        let forecast_days = match lookup("FORECAST_DAYS") {
            Some(raw) => raw.trim().parse::<u8>().map_err(|e| {
                AppError::Config(format!("FORECAST_DAYS must be an integer 1-8: {}", e))
            })?,
            None => MAX_FORECAST_DAYS,
        };

        Ok(Self {
            weather_api_key,
            weather_api_base_url: lookup("WEATHER_API_BASE_URL")
                .unwrap_or_else(|| "https://api.weatherapi.com/v1".to_string()),
            geocoding_base_url: lookup("GEOCODING_BASE_URL")
                .unwrap_or_else(|| "https://nominatim.openstreetmap.org".to_string()),
            geocoding_country: lookup("GEOCODING_COUNTRY").unwrap_or_else(|| "Brazil".to_string()),
            user_agent: lookup("HTTP_USER_AGENT")
                .unwrap_or_else(|| "WeatherDashboard/0.1".to_string()),
            forecast_days,
            dashboard_city: lookup("DASHBOARD_CITY").filter(|c| !c.trim().is_empty()),
            dashboard_state: lookup("DASHBOARD_STATE").filter(|s| !s.trim().is_empty()),
        })
    }

    /// Config pointing both providers at a local mock server.
    #[cfg(test)]
    pub(crate) fn for_tests(base_url: &str) -> Self {
        Self {
            weather_api_key: "test-key".to_string(),
            weather_api_base_url: base_url.to_string(),
            geocoding_base_url: base_url.to_string(),
            geocoding_country: "Brazil".to_string(),
            user_agent: "WeatherDashboardTests/0.1".to_string(),
            forecast_days: MAX_FORECAST_DAYS,
            dashboard_city: None,
            dashboard_state: None,
        }
    }
}
