//! Current conditions and 7-day forecast from the live weather upstream.
//!
//! Weather is a hard dependency of the snapshot: transport or payload
//! failures surface as errors and push the aggregation onto the fallback
//! path, unlike groundwater which degrades in place.

use std::sync::Arc;

use serde::Deserialize;

use crate::domain::{Coordinates, CurrentConditions, DailyForecast, WeatherReading};
use crate::http_client::{HttpClient, HttpRequest};
use crate::sources::SourceError;

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,\
wind_speed_10m,wind_gusts_10m,pressure_msl,visibility,uv_index";
const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,precipitation_sum,\
wind_speed_10m_max,uv_index_max";

pub struct WeatherSource {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: u64,
}

impl WeatherSource {
    pub const DEFAULT_URL: &'static str = "https://api.open-meteo.com/v1/forecast";

    pub fn new(http_client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            timeout_ms: 10_000,
        }
    }

    /// # Errors
    ///
    /// Returns [`SourceError`] on transport failure, non-success status
    /// or an unparseable payload.
    pub async fn fetch(&self, coords: &Coordinates) -> Result<WeatherReading, SourceError> {
        if self.http_client.is_mock() {
            return Ok(mock_reading(coords));
        }

        let url = format!(
            "{}?latitude={}&longitude={}&current={}&daily={}&forecast_days=7&timezone=auto",
            self.base_url,
            coords.lat(),
            coords.lon(),
            CURRENT_FIELDS,
            DAILY_FIELDS
        );
        let request = HttpRequest::get(url).with_timeout_ms(self.timeout_ms);

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|error| SourceError::unavailable(error.message().to_owned()))?;
        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "weather upstream returned status {}",
                response.status
            )));
        }

        let payload: ForecastPayload = serde_json::from_str(&response.body).map_err(|e| {
            SourceError::invalid_payload(format!("unparseable weather payload: {}", e))
        })?;

        Ok(payload.into_reading())
    }
}

#[derive(Debug, Deserialize)]
struct ForecastPayload {
    current: CurrentPayload,
    daily: DailyPayload,
}

#[derive(Debug, Deserialize)]
struct CurrentPayload {
    #[serde(default)]
    temperature_2m: f64,
    #[serde(default)]
    relative_humidity_2m: f64,
    #[serde(default)]
    apparent_temperature: f64,
    #[serde(default)]
    wind_speed_10m: f64,
    #[serde(default)]
    wind_gusts_10m: f64,
    #[serde(default)]
    pressure_msl: f64,
    #[serde(default)]
    visibility: f64,
    #[serde(default)]
    uv_index: f64,
}

#[derive(Debug, Deserialize)]
struct DailyPayload {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    temperature_2m_max: Vec<f64>,
    #[serde(default)]
    temperature_2m_min: Vec<f64>,
    #[serde(default)]
    precipitation_sum: Vec<f64>,
    #[serde(default)]
    wind_speed_10m_max: Vec<f64>,
    #[serde(default)]
    uv_index_max: Vec<f64>,
}

impl ForecastPayload {
    fn into_reading(self) -> WeatherReading {
        let days = self.daily.time.len();
        let column = |values: &[f64], i: usize| values.get(i).copied().unwrap_or(0.0);

        let forecast = (0..days)
            .map(|i| DailyForecast {
                date: self.daily.time[i].clone(),
                max_temp: column(&self.daily.temperature_2m_max, i),
                min_temp: column(&self.daily.temperature_2m_min, i),
                precipitation_sum: column(&self.daily.precipitation_sum, i),
                wind_max: column(&self.daily.wind_speed_10m_max, i),
                uv_max: column(&self.daily.uv_index_max, i),
            })
            .collect();

        WeatherReading {
            current: CurrentConditions {
                temperature: self.current.temperature_2m,
                humidity: self.current.relative_humidity_2m,
                apparent_temperature: self.current.apparent_temperature,
                wind_speed: self.current.wind_speed_10m,
                wind_gusts: self.current.wind_gusts_10m,
                pressure: self.current.pressure_msl,
                visibility: self.current.visibility,
                uv_index: self.current.uv_index,
            },
            forecast,
        }
    }
}

fn mock_reading(coords: &Coordinates) -> WeatherReading {
    let seed = coords.seed();
    let base_temp = 18.0 + (seed % 15) as f64;
    let today = time::OffsetDateTime::now_utc().date();

    let forecast = (0..7)
        .map(|i| {
            let wobble = ((seed >> i) % 5) as f64 * 0.5;
            DailyForecast {
                date: iso_date(today + time::Duration::days(i as i64)),
                max_temp: base_temp + 6.0 + wobble,
                min_temp: base_temp - 4.0 + wobble,
                precipitation_sum: if (seed >> i) % 3 == 0 { 4.0 + wobble } else { 0.0 },
                wind_max: 10.0 + ((seed >> i) % 8) as f64,
                uv_max: 5.0 + ((seed >> i) % 4) as f64,
            }
        })
        .collect();

    WeatherReading {
        current: CurrentConditions {
            temperature: base_temp,
            humidity: 40.0 + (seed % 40) as f64,
            apparent_temperature: base_temp + 1.0,
            wind_speed: 8.0 + (seed % 10) as f64,
            wind_gusts: 14.0 + (seed % 12) as f64,
            pressure: 1008.0 + (seed % 10) as f64,
            visibility: 20_000.0,
            uv_index: 4.0 + (seed % 5) as f64,
        },
        forecast,
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
