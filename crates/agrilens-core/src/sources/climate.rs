//! Thirty-year climate normals and a coarse Köppen classification.
//!
//! Daily normals for 1991-2020 are reduced to the handful of aggregates
//! the advisory prompts need. Like weather, climate is a hard snapshot
//! dependency: failures here push the aggregation onto the fallback path.

use std::sync::Arc;

use serde::Deserialize;

use crate::domain::{ClimateReading, Coordinates};
use crate::http_client::{HttpClient, HttpRequest};
use crate::sources::SourceError;

pub struct ClimateSource {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: u64,
}

impl ClimateSource {
    pub const DEFAULT_URL: &'static str = "https://climate-api.open-meteo.com/v1/climate";

    pub fn new(http_client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            timeout_ms: 15_000,
        }
    }

    /// # Errors
    ///
    /// Returns [`SourceError`] on transport failure, non-success status,
    /// an unparseable payload, or a payload with no usable daily rows.
    pub async fn fetch(&self, coords: &Coordinates) -> Result<ClimateReading, SourceError> {
        if self.http_client.is_mock() {
            return Ok(mock_reading(coords));
        }

        let url = format!(
            "{}?latitude={}&longitude={}&start_date=1991-01-01&end_date=2020-12-31\
             &models=CMCC_CM2_VHR4&daily=temperature_2m_mean,temperature_2m_max,\
             temperature_2m_min,precipitation_sum",
            self.base_url,
            coords.lat(),
            coords.lon()
        );
        let request = HttpRequest::get(url).with_timeout_ms(self.timeout_ms);

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|error| SourceError::unavailable(error.message().to_owned()))?;
        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "climate upstream returned status {}",
                response.status
            )));
        }

        let payload: NormalsPayload = serde_json::from_str(&response.body).map_err(|e| {
            SourceError::invalid_payload(format!("unparseable climate payload: {}", e))
        })?;

        payload.into_reading()
    }
}

#[derive(Debug, Deserialize)]
struct NormalsPayload {
    daily: NormalsDaily,
}

#[derive(Debug, Deserialize)]
struct NormalsDaily {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    temperature_2m_mean: Vec<f64>,
    #[serde(default)]
    temperature_2m_max: Vec<f64>,
    #[serde(default)]
    temperature_2m_min: Vec<f64>,
    #[serde(default)]
    precipitation_sum: Vec<f64>,
}

impl NormalsPayload {
    fn into_reading(self) -> Result<ClimateReading, SourceError> {
        let daily = self.daily;
        let count = daily.temperature_2m_mean.len();
        if count == 0 {
            return Err(SourceError::invalid_payload(
                "climate payload carried no daily rows".to_owned(),
            ));
        }

        let average_temperature =
            daily.temperature_2m_mean.iter().sum::<f64>() / count as f64;

        // Average daily precipitation scaled to a calendar year.
        let precip_count = daily.precipitation_sum.len().max(1);
        let annual_rainfall =
            daily.precipitation_sum.iter().sum::<f64>() / precip_count as f64 * 365.25;

        // Per-calendar-month aggregates across the whole 30-year span.
        let mut max_sum = [0.0f64; 12];
        let mut max_n = [0u32; 12];
        let mut min_sum = [0.0f64; 12];
        let mut min_n = [0u32; 12];
        let mut rain_sum = [0.0f64; 12];
        let mut rain_n = [0u32; 12];

        for (i, date) in daily.time.iter().enumerate() {
            let Some(month) = month_index(date) else { continue };
            if let Some(v) = daily.temperature_2m_max.get(i) {
                max_sum[month] += v;
                max_n[month] += 1;
            }
            if let Some(v) = daily.temperature_2m_min.get(i) {
                min_sum[month] += v;
                min_n[month] += 1;
            }
            if let Some(v) = daily.precipitation_sum.get(i) {
                rain_sum[month] += v;
                rain_n[month] += 1;
            }
        }

        let monthly = |sums: &[f64; 12], ns: &[u32; 12]| {
            (0..12)
                .filter(|&m| ns[m] > 0)
                .map(|m| sums[m] / ns[m] as f64)
                .collect::<Vec<_>>()
        };

        let hottest_month_max = monthly(&max_sum, &max_n)
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max);
        let coldest_month_min = monthly(&min_sum, &min_n)
            .into_iter()
            .fold(f64::INFINITY, f64::min);
        // Average daily rain of the driest month, scaled to a 30-day month.
        let driest_month_rain = monthly(&rain_sum, &rain_n)
            .into_iter()
            .fold(f64::INFINITY, f64::min)
            * 30.0;

        Ok(ClimateReading {
            average_temperature,
            annual_rainfall,
            classification: koppen_classification(average_temperature, annual_rainfall)
                .to_owned(),
            hottest_month_max: finite_or_zero(hottest_month_max),
            coldest_month_min: finite_or_zero(coldest_month_min),
            driest_month_rain: finite_or_zero(driest_month_rain),
        })
    }
}

/// Coarse Köppen-style label from mean temperature and annual rainfall.
pub fn koppen_classification(average_temperature: f64, annual_rainfall: f64) -> &'static str {
    if average_temperature >= 18.0 {
        if annual_rainfall > 2000.0 {
            "Tropical rainforest (Af)"
        } else if annual_rainfall > 1500.0 {
            "Tropical monsoon (Am)"
        } else {
            "Tropical savanna (Aw)"
        }
    } else if average_temperature > -3.0 {
        if annual_rainfall > 1000.0 {
            "Humid subtropical (Cfa)"
        } else {
            "Mediterranean (Csa)"
        }
    } else {
        "Arid (BWh)"
    }
}

fn month_index(date: &str) -> Option<usize> {
    let month: usize = date.get(5..7)?.parse().ok()?;
    (1..=12).contains(&month).then(|| month - 1)
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

fn mock_reading(coords: &Coordinates) -> ClimateReading {
    let seed = coords.seed();
    let average_temperature = 16.0 + (seed % 14) as f64;
    let annual_rainfall = 300.0 + (seed % 1900) as f64;
    ClimateReading {
        average_temperature,
        annual_rainfall,
        classification: koppen_classification(average_temperature, annual_rainfall).to_owned(),
        hottest_month_max: average_temperature + 12.0,
        coldest_month_min: average_temperature - 10.0,
        driest_month_rain: (annual_rainfall / 12.0 * 0.2).round(),
    }
}
