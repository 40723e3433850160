//! Weather dashboard core.
//!
//! Geocodes a city through Nominatim, fetches current conditions and a
//! multi-day forecast from weatherapi.com, classifies the wind on the
//! Beaufort scale and derives threshold alerts. A capitals board keeps
//! temperature and live local time for ten world capitals.

pub mod config;
pub mod errors;
pub mod services;

pub use config::AppConfig;
pub use errors::AppError;
pub use services::alerts::generate_alerts;
pub use services::beaufort::{classify_wind, BeaufortCategory};
pub use services::clock::current_time_in;
pub use services::geocoding::{
    normalize_suggestions, resolve_coordinates, Coordinate, PlaceSuggestion, RawPlace,
};
pub use services::weather::ForecastSnapshot;
