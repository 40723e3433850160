//! Local wall-clock time in named IANA time zones.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::errors::AppError;

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn parse_time_zone(time_zone_id: &str) -> Result<Tz, AppError> {
    time_zone_id
        .parse::<Tz>()
        .map_err(|_| AppError::InvalidTimeZone(time_zone_id.to_string()))
}

/// Format `instant` as local time in `time_zone_id`, `YYYY-MM-DD HH:MM:SS`.
pub fn format_time_in(time_zone_id: &str, instant: DateTime<Utc>) -> Result<String, AppError> {
    let tz = parse_time_zone(time_zone_id)?;
    Ok(instant.with_timezone(&tz).format(DISPLAY_FORMAT).to_string())
}

/// Current local time in `time_zone_id`.
pub fn current_time_in(time_zone_id: &str) -> Result<String, AppError> {
    format_time_in(time_zone_id, Utc::now())
}

/// The `HH:MM:SS` part of a formatted local time.
pub fn clock_time(formatted: &str) -> &str {
    formatted
        .split_once(' ')
        .map(|(_, time)| time)
        .unwrap_or(formatted)
}
