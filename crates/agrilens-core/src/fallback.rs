//! Last-resort snapshot used when aggregation cannot complete.
//!
//! The values are a plausible, internally consistent Rabi-season farm in
//! central India. The snapshot is rebuilt on every call so the forecast
//! dates always start at today; only the identity is taken from the
//! caller, which keeps the location real even when every upstream is down.

use crate::domain::{
    ClimateReading, CurrentConditions, DailyForecast, Identity, Season, Snapshot, SoilReading,
    WeatherReading,
};

pub const FALLBACK_RECOMMENDATION: &str = "Based on the typical clay loam soil in your area and \
the upcoming dry spell, consider planting Chickpea (Gram) or Wheat for the Rabi season.";

pub struct FallbackSnapshotProvider;

impl FallbackSnapshotProvider {
    /// Build a fresh fallback snapshot carrying the resolved identity.
    pub fn snapshot(identity: Identity) -> Snapshot {
        Snapshot {
            identity,
            season: Season::Rabi,
            groundwater_index: 75.0,
            soil: fallback_soil(),
            weather: fallback_weather(),
            climate: fallback_climate(),
            recommendation: FALLBACK_RECOMMENDATION.to_owned(),
        }
    }
}

fn fallback_soil() -> SoilReading {
    SoilReading {
        ph: 6.8,
        organic_carbon: 8.5,
        cation_exchange_capacity: 15.2,
        bulk_density: 1.3,
        soil_type: String::from("Clay Loam"),
        nitrogen: 75.0,
        phosphorus: 22.0,
        potassium: 48.0,
        electrical_conductivity: 0.4,
        salinity: 0.1,
        sand_percent: 30.0,
        silt_percent: 35.0,
        clay_percent: 35.0,
        topsoil_moisture: 22.5,
        subsoil_moisture: 18.0,
        soil_temperature: 23.0,
    }
}

fn fallback_weather() -> WeatherReading {
    let today = time::OffsetDateTime::now_utc().date();
    let forecast = (0..7)
        .map(|i| DailyForecast {
            date: iso_date(today + time::Duration::days(i as i64)),
            max_temp: 28.0 + i as f64 * 0.5,
            min_temp: 18.0 + i as f64 * 0.5,
            precipitation_sum: if i == 2 { 5.0 } else { 0.0 },
            wind_max: 12.0,
            uv_max: 6.5,
        })
        .collect();

    WeatherReading {
        current: CurrentConditions {
            temperature: 24.5,
            humidity: 65.0,
            apparent_temperature: 25.0,
            wind_speed: 10.2,
            wind_gusts: 15.0,
            pressure: 1012.0,
            visibility: 10_000.0,
            uv_index: 6.0,
        },
        forecast,
    }
}

fn fallback_climate() -> ClimateReading {
    ClimateReading {
        average_temperature: 25.5,
        annual_rainfall: 1200.0,
        classification: String::from("Tropical Savanna"),
        hottest_month_max: 38.0,
        coldest_month_min: 12.0,
        driest_month_rain: 5.0,
    }
}

fn iso_date(date: time::Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        date.month() as u8,
        date.day()
    )
}
