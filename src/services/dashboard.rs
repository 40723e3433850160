//! City search flow: suggestion → forecast → alerts and wind description.

use crate::errors::AppError;
use crate::services::beaufort::BeaufortCategory;
use crate::services::geocoding::{
    normalize_suggestions, Coordinate, GeocodingClient, PlaceSuggestion,
};
use crate::services::weather::{ForecastSnapshot, WeatherClient};

/// Everything the home view shows after a successful search.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    /// Short place label from the chosen suggestion.
    pub label: String,
    /// Where the map should be centred.
    pub coordinate: Coordinate,
    pub snapshot: ForecastSnapshot,
    pub alerts: Vec<String>,
    pub wind_description: BeaufortCategory,
}

impl DashboardView {
    pub fn from_snapshot(suggestion: &PlaceSuggestion, snapshot: ForecastSnapshot) -> Self {
        Self {
            label: suggestion.label.clone(),
            coordinate: suggestion.coordinate,
            alerts: snapshot.alerts(),
            wind_description: snapshot.wind_description(),
            snapshot,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    geocoder: GeocodingClient,
    weather: WeatherClient,
    forecast_days: u8,
}

impl Dashboard {
    pub fn new(geocoder: GeocodingClient, weather: WeatherClient, forecast_days: u8) -> Self {
        Self {
            geocoder,
            weather,
            forecast_days,
        }
    }

    /// Suggestions for the search box.
    pub async fn suggestions(&self, query: &str) -> Result<Vec<PlaceSuggestion>, AppError> {
        self.geocoder.suggest(query).await
    }

    /// Fetch the forecast for a chosen suggestion and build the view.
    pub async fn search(&self, suggestion: &PlaceSuggestion) -> Result<DashboardView, AppError> {
        let snapshot = self
            .weather
            .fetch_forecast(suggestion.coordinate, self.forecast_days)
            .await?;
        Ok(DashboardView::from_snapshot(suggestion, snapshot))
    }

    /// Resolve a city, optionally narrowed by state, and build the view.
    ///
    /// With a state the city/state match rule picks the place and the label
    /// is "city, state". Without one the first search result is used with
    /// its own short label.
    pub async fn search_city(
        &self,
        city: &str,
        state: Option<&str>,
    ) -> Result<DashboardView, AppError> {
        let suggestion = match state {
            Some(state) => {
                let coordinate = self.geocoder.coordinates_for(city, state).await?;
                PlaceSuggestion {
                    value: format!("{}, {}", city, state),
                    label: format!("{}, {}", city, state),
                    coordinate,
                }
            }
            None => {
                let places = self.geocoder.search(city, None).await?;
                normalize_suggestions(&places)
                    .into_iter()
                    .next()
                    .ok_or_else(|| AppError::NotFound("Location not found".to_string()))?
            }
        };
        self.search(&suggestion).await
    }

    /// Store a search result in `current`.
    ///
    /// A failed search is logged and leaves `current` untouched. Returns
    /// whether the view changed.
    pub fn apply(
        current: &mut Option<DashboardView>,
        result: Result<DashboardView, AppError>,
    ) -> bool {
        match result {
            Ok(view) => {
                tracing::info!(
                    "Dashboard: {} now {}°C, {} alert(s)",
                    view.label,
                    view.snapshot.current.temp_c,
                    view.alerts.len()
                );
                *current = Some(view);
                true
            }
            Err(e) => {
                tracing::error!("Dashboard: error fetching weather data: {}", e);
                false
            }
        }
    }
}
