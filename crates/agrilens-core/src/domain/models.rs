use serde::{Deserialize, Serialize};

use super::{Identity, Season};

/// Simulated soil properties for a location, enriched with live moisture
/// and temperature where the weather upstream cooperates.
///
/// Unknown moisture and temperature default to 0.0 rather than `Option`;
/// the upstream reports the same sentinel and the advisory prompts render
/// the value either way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilReading {
    pub ph: f64,
    pub organic_carbon: f64,
    pub cation_exchange_capacity: f64,
    pub bulk_density: f64,
    pub soil_type: String,
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub electrical_conductivity: f64,
    pub salinity: f64,
    pub sand_percent: f64,
    pub silt_percent: f64,
    pub clay_percent: f64,
    pub topsoil_moisture: f64,
    pub subsoil_moisture: f64,
    pub soil_temperature: f64,
}

/// Current conditions as reported by the live weather upstream.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature: f64,
    pub humidity: f64,
    pub apparent_temperature: f64,
    pub wind_speed: f64,
    pub wind_gusts: f64,
    pub pressure: f64,
    pub visibility: f64,
    pub uv_index: f64,
}

/// One day of the forward forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub date: String,
    pub max_temp: f64,
    pub min_temp: f64,
    pub precipitation_sum: f64,
    pub wind_max: f64,
    pub uv_max: f64,
}

/// Current weather plus the ordered 7-day forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub current: CurrentConditions,
    pub forecast: Vec<DailyForecast>,
}

impl WeatherReading {
    /// Mean of the daily maximum temperatures, 0.0 for an empty forecast.
    pub fn avg_max_temp(&self) -> f64 {
        if self.forecast.is_empty() {
            return 0.0;
        }
        self.forecast.iter().map(|day| day.max_temp).sum::<f64>() / self.forecast.len() as f64
    }

    /// Total forecast precipitation in millimetres.
    pub fn total_rain(&self) -> f64 {
        self.forecast.iter().map(|day| day.precipitation_sum).sum()
    }
}

/// 30-year climate normals with a locally derived Koppen-Geiger label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateReading {
    pub average_temperature: f64,
    pub annual_rainfall: f64,
    pub classification: String,
    pub hottest_month_max: f64,
    pub coldest_month_min: f64,
    pub driest_month_rain: f64,
}

/// The fully assembled farm snapshot. The aggregator is the sole writer;
/// once returned the snapshot is never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub identity: Identity,
    pub season: Season,
    /// Rainfall-derived groundwater availability index on a 0-100 scale.
    pub groundwater_index: f64,
    pub soil: SoilReading,
    pub weather: WeatherReading,
    pub climate: ClimateReading,
    pub recommendation: String,
}

/// One mandi price row (prices are per quintal in INR).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketPrice {
    pub serial_no: String,
    pub market: String,
    pub commodity: String,
    pub variety: String,
    pub min_price: f64,
    pub max_price: f64,
    pub modal_price: f64,
    pub date: String,
    pub region: String,
}

/// Static crop reference row attached to snapshot responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CropProfile {
    pub name: &'static str,
    pub season: &'static str,
    pub soil: &'static str,
    pub duration: &'static str,
    pub ph_range: &'static str,
    pub water_need: &'static str,
    pub notes: &'static str,
}

/// Static pesticide reference row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PesticideProfile {
    pub name: &'static str,
    pub target_pest: &'static str,
    pub crop: &'static str,
    pub mode_of_action: &'static str,
    pub toxicity: &'static str,
    pub pre_harvest_interval: &'static str,
    pub notes: &'static str,
}
