//! Place search (Nominatim) and suggestion shaping.
//!
//! The HTTP side is a thin wrapper around `GET /search`. Everything that
//! decides what the user sees (labels, which result wins for a city/state
//! pair) lives in the pure functions `normalize_suggestions` and
//! `resolve_coordinates` so it can be tested without a network.

use serde::{Deserialize, Deserializer};
use std::fmt;

use crate::config::AppConfig;
use crate::errors::AppError;

/// A point on the map, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl fmt::Display for Coordinate {
    /// Renders as `lat,lon`, the form the forecast provider accepts for `q`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// One row of a Nominatim search response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawPlace {
    pub display_name: String,
    #[serde(deserialize_with = "de_degrees")]
    pub lat: f64,
    #[serde(deserialize_with = "de_degrees")]
    pub lon: f64,
}

impl RawPlace {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            latitude: self.lat,
            longitude: self.lon,
        }
    }
}

/// A display-ready search suggestion.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceSuggestion {
    /// Full provider display name.
    pub value: String,
    /// Short "city, region" form.
    pub label: String,
    pub coordinate: Coordinate,
}

/// Nominatim sends coordinates as JSON strings ("-23.5"). Accept numbers too.
fn de_degrees<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Degrees {
        Number(f64),
        Text(String),
    }

    let value = match Degrees::deserialize(deserializer)? {
        Degrees::Number(n) => n,
        Degrees::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| serde::de::Error::custom(format!("invalid coordinate '{}': {}", s, e)))?,
    };

    if !value.is_finite() {
        return Err(serde::de::Error::custom("coordinate must be finite"));
    }
    Ok(value)
}

/// Short label for a comma-separated place name.
///
/// "São Paulo, SP, Brazil" becomes "São Paulo, SP". A name without a second
/// segment is returned unchanged.
fn short_label(display_name: &str) -> String {
    let mut segments = display_name.split(',');
    let city = segments.next().map(str::trim).unwrap_or_default();

    match segments.next().map(str::trim) {
        Some(region) => format!("{}, {}", city, region),
        None => display_name.to_string(),
    }
}

/// Shape raw search results into suggestions. Order is preserved and
/// duplicates are kept; an empty input gives an empty output.
pub fn normalize_suggestions(raw_results: &[RawPlace]) -> Vec<PlaceSuggestion> {
    raw_results
        .iter()
        .map(|place| PlaceSuggestion {
            value: place.display_name.clone(),
            label: short_label(&place.display_name),
            coordinate: place.coordinate(),
        })
        .collect()
}

/// Pick the coordinates for a city/state search.
///
/// The first result whose display name contains both `city` and `state`
/// (case-sensitive substring match) wins. Without such a result the first
/// result is used, whether or not it is plausible.
pub fn resolve_coordinates(
    results: &[RawPlace],
    city: &str,
    state: &str,
) -> Result<Coordinate, AppError> {
    let first = results
        .first()
        .ok_or_else(|| AppError::NotFound("Location not found".to_string()))?;

    let chosen = results
        .iter()
        .find(|place| place.display_name.contains(city) && place.display_name.contains(state))
        .unwrap_or_else(|| {
            tracing::debug!(
                "No exact match for '{}' / '{}', using first result '{}'",
                city,
                state,
                first.display_name
            );
            first
        });

    Ok(chosen.coordinate())
}

/// Client for the Nominatim search endpoint.
#[derive(Debug, Clone)]
pub struct GeocodingClient {
    client: reqwest::Client,
    base_url: String,
    country: String,
}

impl GeocodingClient {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        // Nominatim's usage policy requires an identifying User-Agent.
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.geocoding_base_url.trim_end_matches('/').to_string(),
            country: config.geocoding_country.clone(),
        })
    }

    /// Search places by city and optional state, restricted to the
    /// configured country.
    pub async fn search(&self, city: &str, state: Option<&str>) -> Result<Vec<RawPlace>, AppError> {
        let url = format!("{}/search", self.base_url);

        let mut params: Vec<(&str, &str)> = vec![("city", city)];
        if let Some(state) = state {
            params.push(("state", state));
        }
        params.push(("country", self.country.as_str()));
        params.push(("format", "json"));

        tracing::debug!("Geocoding search city='{}' state={:?}", city, state);

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| AppError::from_reqwest("Nominatim", e))?;

        if !response.status().is_success() {
            return Err(AppError::Provider(format!(
                "Nominatim returned HTTP {}",
                response.status()
            )));
        }

        let places: Vec<RawPlace> = response
            .json()
            .await
            .map_err(|e| AppError::from_reqwest("Nominatim", e))?;

        tracing::debug!("Geocoding search returned {} results", places.len());
        Ok(places)
    }

    /// Suggestions for a search box. A blank query yields no suggestions and
    /// makes no request.
    pub async fn suggest(&self, query: &str) -> Result<Vec<PlaceSuggestion>, AppError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let places = self.search(query, None).await?;
        Ok(normalize_suggestions(&places))
    }

    /// Resolve a city/state pair to a single coordinate.
    pub async fn coordinates_for(&self, city: &str, state: &str) -> Result<Coordinate, AppError> {
        let places = self.search(city, Some(state)).await?;
        resolve_coordinates(&places, city, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};
    use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn place(name: &str, lat: f64, lon: f64) -> RawPlace {
        RawPlace {
            display_name: name.to_string(),
            lat,
            lon,
        }
    }

    #[test]
    fn test_normalize_sao_paulo() {
        let raw: Vec<RawPlace> = serde_json::from_value(serde_json::json!([
            {"display_name": "São Paulo, SP, Brazil", "lat": "-23.5", "lon": "-46.6"}
        ]))
        .unwrap();

        let suggestions = normalize_suggestions(&raw);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].label, "São Paulo, SP");
        assert_eq!(suggestions[0].value, "São Paulo, SP, Brazil");
        assert_eq!(
            suggestions[0].coordinate,
            Coordinate {
                latitude: -23.5,
                longitude: -46.6
            }
        );
    }

    #[test]
    fn test_normalize_empty() {
        assert!(normalize_suggestions(&[]).is_empty());
    }

    #[test]
    fn test_normalize_single_segment_keeps_raw_name() {
        let suggestions = normalize_suggestions(&[place("Brasil", -10.0, -55.0)]);
        assert_eq!(suggestions[0].label, "Brasil");
    }

    #[test]
    fn test_normalize_trims_segments_and_keeps_order_and_duplicates() {
        let raw = vec![
            place("  Campinas ,  SP , Brazil", -22.9, -47.06),
            place("Recife, PE, Brazil", -8.05, -34.9),
            place("Recife, PE, Brazil", -8.05, -34.9),
        ];
        let labels: Vec<String> = normalize_suggestions(&raw)
            .into_iter()
            .map(|s| s.label)
            .collect();
        assert_eq!(labels, vec!["Campinas, SP", "Recife, PE", "Recife, PE"]);
    }

    #[test]
    fn test_resolve_empty_is_not_found() {
        let err = resolve_coordinates(&[], "X", "Y").unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_resolve_prefers_exact_match() {
        let raw = vec![
            place("Rio de Janeiro, Brazil", 1.0, 1.0),
            place("Rio de Janeiro, RJ, Brazil", -22.9, -43.2),
        ];
        let coord = resolve_coordinates(&raw, "Rio de Janeiro", "RJ").unwrap();
        assert_eq!(coord.latitude, -22.9);
        assert_eq!(coord.longitude, -43.2);
    }

    #[test]
    fn test_resolve_falls_back_to_first() {
        let raw = vec![
            place("Santa Maria, RS, Brazil", -29.68, -53.8),
            place("Santa Maria, DF, Brazil", -16.0, -48.0),
        ];
        let coord = resolve_coordinates(&raw, "Santa Maria", "SP").unwrap();
        assert_eq!(coord.latitude, -29.68);
    }

    #[test]
    fn test_resolve_is_case_sensitive_substring() {
        let raw = vec![
            place("first, Brazil", 0.0, 0.0),
            // "rj" lowercase does not match "RJ"; substring "Rio" matches inside "Rio Bonito"
            place("Rio Bonito, rj, Brazil", 5.0, 5.0),
            place("Rio Bonito, RJ, Brazil", 6.0, 6.0),
        ];
        let coord = resolve_coordinates(&raw, "Rio", "RJ").unwrap();
        assert_eq!(coord.latitude, 6.0);
    }

    #[test]
    fn test_raw_place_rejects_bad_coordinate() {
        let parsed: Result<Vec<RawPlace>, _> = serde_json::from_value(serde_json::json!([
            {"display_name": "Nowhere", "lat": "north", "lon": "-46.6"}
        ]));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_raw_place_accepts_numeric_coordinates() {
        let parsed: RawPlace = serde_json::from_value(serde_json::json!(
            {"display_name": "Manaus, AM, Brazil", "lat": -3.1, "lon": -60.02}
        ))
        .unwrap();
        assert_eq!(parsed.coordinate().to_string(), "-3.1,-60.02");
    }

    #[tokio::test]
    async fn test_search_sends_expected_query() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("city", "Rio de Janeiro"))
            .and(query_param("state", "RJ"))
            .and(query_param("country", "Brazil"))
            .and(query_param("format", "json"))
            .and(header("user-agent", "WeatherDashboardTests/0.1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"display_name": "Rio de Janeiro, Região Sudeste, Brazil", "lat": "-22.0", "lon": "-43.0"},
                {"display_name": "Rio de Janeiro, RJ, Brazil", "lat": "-22.9", "lon": "-43.2"}
            ])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = GeocodingClient::new(&AppConfig::for_tests(&mock_server.uri())).unwrap();
        let coord = client.coordinates_for("Rio de Janeiro", "RJ").await.unwrap();
        assert_eq!(coord.latitude, -22.9);
    }

    #[tokio::test]
    async fn test_suggest_omits_state() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("city", "Curitiba"))
            .and(query_param_is_missing("state"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"display_name": "Curitiba, Paraná, Brazil", "lat": "-25.4", "lon": "-49.27"}
            ])))
            .mount(&mock_server)
            .await;

        let client = GeocodingClient::new(&AppConfig::for_tests(&mock_server.uri())).unwrap();
        let suggestions = assert_ok!(client.suggest("Curitiba").await);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].label, "Curitiba, Paraná");
    }

    #[tokio::test]
    async fn test_suggest_blank_query_makes_no_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = GeocodingClient::new(&AppConfig::for_tests(&mock_server.uri())).unwrap();
        let suggestions = assert_ok!(client.suggest("   ").await);
        assert!(suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_coordinates_for_empty_response_is_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&mock_server)
            .await;

        let client = GeocodingClient::new(&AppConfig::for_tests(&mock_server.uri())).unwrap();
        let err = assert_err!(client.coordinates_for("Atlantis", "XX").await);
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_search_http_error_is_provider_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let client = GeocodingClient::new(&AppConfig::for_tests(&mock_server.uri())).unwrap();
        let err = client.search("Recife", None).await.unwrap_err();
        assert!(matches!(err, AppError::Provider(_)));
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_search_malformed_payload_is_provider_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"display_name": "Recife, PE, Brazil", "lat": "not-a-number", "lon": "-34.9"}
            ])))
            .mount(&mock_server)
            .await;

        let client = GeocodingClient::new(&AppConfig::for_tests(&mock_server.uri())).unwrap();
        let err = client.search("Recife", None).await.unwrap_err();
        assert!(matches!(err, AppError::Provider(_)));
    }

    #[tokio::test]
    async fn test_search_unreachable_is_network_error() {
        // Nothing listens on port 9 locally.
        let client = GeocodingClient::new(&AppConfig::for_tests("http://127.0.0.1:9")).unwrap();
        let err = client.search("Recife", None).await.unwrap_err();
        assert!(matches!(err, AppError::Network(_)));
    }
}
