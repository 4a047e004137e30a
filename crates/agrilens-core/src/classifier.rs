//! Sentinel-default detection for the soil simulator.
//!
//! The simulator reports internal failure by answering with a fixed,
//! documented default pair instead of an error status. Seeing that exact
//! pair means the payload is fabricated and must be treated as a hard
//! failure, not as data.

use crate::domain::SoilReading;

/// pH value of the simulator's documented default payload.
pub const SENTINEL_PH: f64 = 6.5;
/// Organic carbon value of the simulator's documented default payload.
pub const SENTINEL_ORGANIC_CARBON: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoilVerdict {
    Real,
    SentinelDefault,
}

/// Exact comparison on purpose: the sentinel is a fixed literal emitted by
/// the upstream, not a measured value. A legitimately measured 6.5/8.0
/// reading is misclassified; that sharp edge is accepted and documented.
pub fn classify_soil(reading: &SoilReading) -> SoilVerdict {
    if reading.ph == SENTINEL_PH && reading.organic_carbon == SENTINEL_ORGANIC_CARBON {
        SoilVerdict::SentinelDefault
    } else {
        SoilVerdict::Real
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(ph: f64, organic_carbon: f64) -> SoilReading {
        SoilReading {
            ph,
            organic_carbon,
            cation_exchange_capacity: 12.0,
            bulk_density: 1.4,
            soil_type: String::from("Loam"),
            nitrogen: 60.0,
            phosphorus: 20.0,
            potassium: 40.0,
            electrical_conductivity: 0.5,
            salinity: 0.1,
            sand_percent: 40.0,
            silt_percent: 30.0,
            clay_percent: 30.0,
            topsoil_moisture: 0.0,
            subsoil_moisture: 0.0,
            soil_temperature: 25.0,
        }
    }

    #[test]
    fn exact_default_pair_is_sentinel() {
        assert_eq!(
            classify_soil(&reading(6.5, 8.0)),
            SoilVerdict::SentinelDefault
        );
    }

    #[test]
    fn either_field_off_the_default_is_real() {
        assert_eq!(classify_soil(&reading(6.5, 8.1)), SoilVerdict::Real);
        assert_eq!(classify_soil(&reading(6.4, 8.0)), SoilVerdict::Real);
        assert_eq!(classify_soil(&reading(6.50001, 8.0)), SoilVerdict::Real);
    }
}
