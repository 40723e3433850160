pub mod alerts;
pub mod beaufort;
pub mod capitals;
pub mod clock;
pub mod dashboard;
pub mod geocoding;
pub mod weather;
