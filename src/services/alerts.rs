//! Threshold alerts derived from current conditions.

use crate::services::beaufort::classify_wind;

/// Temperatures strictly above this raise a heat alert.
pub const TEMPERATURE_THRESHOLD_C: f64 = 30.0;

/// Wind speeds strictly above this raise a wind alert.
pub const WIND_SPEED_THRESHOLD_KMH: f64 = 50.0;

/// Build the alert list for one observation.
///
/// Both rules are evaluated independently; the temperature alert, if any,
/// comes first. The list is rebuilt from scratch on every call.
pub fn generate_alerts(temperature_c: f64, wind_speed_kmh: f64) -> Vec<String> {
    let mut alerts = Vec::new();

    if temperature_c > TEMPERATURE_THRESHOLD_C {
        alerts.push(format!("High temperature alert: {}°C", temperature_c));
    }

    if wind_speed_kmh > WIND_SPEED_THRESHOLD_KMH {
        alerts.push(format!(
            "High wind alert: {} km/h ({})",
            wind_speed_kmh,
            classify_wind(wind_speed_kmh)
        ));
    }

    alerts
}
