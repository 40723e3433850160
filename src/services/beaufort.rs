//! Beaufort wind-force classification from speeds in km/h.

use std::fmt;

/// Beaufort category, force 0 (Calm) through 12 (Hurricane).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeaufortCategory {
    Calm,
    LightAir,
    LightBreeze,
    GentleBreeze,
    ModerateBreeze,
    FreshBreeze,
    StrongBreeze,
    NearGale,
    Gale,
    SevereGale,
    Storm,
    ViolentStorm,
    Hurricane,
}

/// Inclusive upper bounds (km/h) for Light air through Violent storm.
/// Anything below 1 km/h is Calm; anything above the last bound is Hurricane.
const UPPER_BOUNDS_KMH: [(f64, BeaufortCategory); 11] = [
    (5.0, BeaufortCategory::LightAir),
    (11.0, BeaufortCategory::LightBreeze),
    (19.0, BeaufortCategory::GentleBreeze),
    (28.0, BeaufortCategory::ModerateBreeze),
    (38.0, BeaufortCategory::FreshBreeze),
    (49.0, BeaufortCategory::StrongBreeze),
    (61.0, BeaufortCategory::NearGale),
    (74.0, BeaufortCategory::Gale),
    (88.0, BeaufortCategory::SevereGale),
    (102.0, BeaufortCategory::Storm),
    (117.0, BeaufortCategory::ViolentStorm),
];

const CALM_BELOW_KMH: f64 = 1.0;

impl BeaufortCategory {
    pub fn label(self) -> &'static str {
        match self {
            BeaufortCategory::Calm => "Calm",
            BeaufortCategory::LightAir => "Light air",
            BeaufortCategory::LightBreeze => "Light breeze",
            BeaufortCategory::GentleBreeze => "Gentle breeze",
            BeaufortCategory::ModerateBreeze => "Moderate breeze",
            BeaufortCategory::FreshBreeze => "Fresh breeze",
            BeaufortCategory::StrongBreeze => "Strong breeze",
            BeaufortCategory::NearGale => "Near gale",
            BeaufortCategory::Gale => "Gale",
            BeaufortCategory::SevereGale => "Severe gale",
            BeaufortCategory::Storm => "Storm",
            BeaufortCategory::ViolentStorm => "Violent storm",
            BeaufortCategory::Hurricane => "Hurricane",
        }
    }

    /// Beaufort force number (0-12).
    pub fn force(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for BeaufortCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a wind speed in km/h.
///
/// The first band whose upper bound is >= the speed wins, so a boundary value
/// belongs to the lower category (exactly 5 km/h is Light air). Negative
/// speeds and NaN are Calm.
pub fn classify_wind(speed_kmh: f64) -> BeaufortCategory {
    // `!(x >= 1)` rather than `x < 1` so NaN lands here too.
    if !(speed_kmh >= CALM_BELOW_KMH) {
        return BeaufortCategory::Calm;
    }

    UPPER_BOUNDS_KMH
        .iter()
        .find(|(upper, _)| speed_kmh <= *upper)
        .map(|(_, category)| *category)
        .unwrap_or(BeaufortCategory::Hurricane)
}
