//! Domain types shared across sources, aggregation and the advisory facade.

mod models;
mod season;

pub use models::{
    ClimateReading, CropProfile, CurrentConditions, DailyForecast, MarketPrice, PesticideProfile,
    Snapshot, SoilReading, WeatherReading,
};
pub use season::Season;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Validated WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    lat: f64,
    lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Result<Self, ValidationError> {
        if !lat.is_finite() {
            return Err(ValidationError::NonFiniteValue { field: "lat" });
        }
        if !lon.is_finite() {
            return Err(ValidationError::NonFiniteValue { field: "lon" });
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(ValidationError::LatitudeOutOfRange { value: lat });
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(ValidationError::LongitudeOutOfRange { value: lon });
        }
        Ok(Self { lat, lon })
    }

    pub const fn lat(&self) -> f64 {
        self.lat
    }

    pub const fn lon(&self) -> f64 {
        self.lon
    }

    /// Deterministic seed derived from the coordinate pair, used by the
    /// offline mock sources.
    pub fn seed(&self) -> u64 {
        format!("{:.4},{:.4}", self.lat, self.lon)
            .bytes()
            .fold(0_u64, |acc, byte| {
                acc.wrapping_mul(33).wrapping_add(byte as u64)
            })
    }
}

/// Resolved place identity (administrative region plus locality).
///
/// Identity resolution is infallible by contract: a geocoder failure
/// degrades to [`Identity::unknown`] so the fallback snapshot can still
/// carry the caller's real location when one was resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub region: String,
    pub place: String,
}

impl Identity {
    pub fn new(region: impl Into<String>, place: impl Into<String>) -> Self {
        let region = non_empty_or(region.into(), "Unknown");
        let place = non_empty_or(place.into(), "Unknown");
        Self { region, place }
    }

    pub fn unknown() -> Self {
        Self {
            region: String::from("Unknown"),
            place: String::from("Unknown"),
        }
    }
}

fn non_empty_or(value: String, default: &str) -> String {
    if value.trim().is_empty() {
        String::from(default)
    } else {
        value
    }
}
