//! Soil properties from the AI simulator, enriched with live moisture.
//!
//! The simulator is the primary soil source. Its answer is parsed with
//! per-field defaults, classified against the documented sentinel pair,
//! and then enriched with real-time topsoil/subsoil moisture and soil
//! temperature from the live weather upstream. Enrichment failures are
//! absorbed; a sentinel verdict is a hard failure.

use std::sync::Arc;

use crate::classifier::{classify_soil, SoilVerdict, SENTINEL_ORGANIC_CARBON, SENTINEL_PH};
use crate::domain::{Coordinates, SoilReading};
use crate::http_client::{HttpClient, HttpRequest};
use crate::prompt;
use crate::sources::SourceError;
use crate::textgen::{invoke_chain, CredentialChain, TextGenerator};

/// A soil reading plus the warnings accumulated while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct SoilOutcome {
    pub reading: SoilReading,
    pub warnings: Vec<String>,
}

pub struct SoilSimulator {
    generator: Arc<dyn TextGenerator>,
    data_chain: CredentialChain,
    http_client: Arc<dyn HttpClient>,
    forecast_url: String,
    archive_url: String,
    timeout_ms: u64,
}

impl SoilSimulator {
    pub const DEFAULT_FORECAST_URL: &'static str = "https://api.open-meteo.com/v1/forecast";
    pub const DEFAULT_ARCHIVE_URL: &'static str = "https://archive-api.open-meteo.com/v1/archive";

    pub fn new(
        generator: Arc<dyn TextGenerator>,
        data_chain: CredentialChain,
        http_client: Arc<dyn HttpClient>,
        forecast_url: impl Into<String>,
        archive_url: impl Into<String>,
    ) -> Self {
        Self {
            generator,
            data_chain,
            http_client,
            forecast_url: forecast_url.into(),
            archive_url: archive_url.into(),
            timeout_ms: 10_000,
        }
    }

    /// Simulate, classify, then enrich.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the credential chain is exhausted or
    /// the classified reading is the sentinel default pair.
    pub async fn fetch(&self, coords: &Coordinates) -> Result<SoilOutcome, SourceError> {
        let prompt = prompt::soil_simulation(coords.lat(), coords.lon());
        let success = invoke_chain(self.generator.as_ref(), &self.data_chain, &prompt)
            .await
            .map_err(|failure| failure.to_source_error())?;

        let mut warnings = success.warnings;
        let mut reading = parse_simulated(&success.text);

        if classify_soil(&reading) == SoilVerdict::SentinelDefault {
            return Err(SourceError::sentinel_default(format!(
                "soil simulator answered with its default pair (pH {SENTINEL_PH}, SOC {SENTINEL_ORGANIC_CARBON})"
            )));
        }

        self.enrich_moisture(coords, &mut reading, &mut warnings)
            .await;

        Ok(SoilOutcome { reading, warnings })
    }

    /// Rainfall-derived groundwater availability on a 0-100 scale.
    ///
    /// Sum of daily precipitation over the trailing 90 days, scaled so
    /// 400 mm maps to 100 and capped there. Fetch failure degrades to 0.0
    /// with a warning; it never fails the aggregation.
    pub async fn groundwater_index(&self, coords: &Coordinates) -> (f64, Vec<String>) {
        if self.http_client.is_mock() {
            return (((coords.seed() % 80) as f64 + 10.0).min(100.0), Vec::new());
        }

        // The archive upstream caps end_date at today in UTC; yesterday
        // avoids boundary errors around midnight.
        let end = time::OffsetDateTime::now_utc().date() - time::Duration::days(1);
        let start = end - time::Duration::days(90);
        let url = format!(
            "{}?latitude={}&longitude={}&start_date={}&end_date={}&daily=precipitation_sum",
            self.archive_url,
            coords.lat(),
            coords.lon(),
            iso_date(start),
            iso_date(end)
        );

        match self.fetch_json(&url).await {
            Ok(value) => {
                let total: f64 = value["daily"]["precipitation_sum"]
                    .as_array()
                    .map(|days| days.iter().filter_map(|v| v.as_f64()).sum())
                    .unwrap_or(0.0);
                ((total / 400.0 * 100.0).min(100.0), Vec::new())
            }
            Err(error) => (
                0.0,
                vec![format!(
                    "groundwater index degraded to 0.0: {}",
                    error.message()
                )],
            ),
        }
    }

    async fn enrich_moisture(
        &self,
        coords: &Coordinates,
        reading: &mut SoilReading,
        warnings: &mut Vec<String>,
    ) {
        if self.http_client.is_mock() {
            reading.topsoil_moisture = 12.0 + (coords.seed() % 18) as f64;
            return;
        }

        match self.fetch_property(coords, "soil_moisture_0_to_7cm").await {
            Ok(value) => reading.topsoil_moisture = value,
            Err(error) => {
                reading.topsoil_moisture = 0.0;
                warnings.push(format!("topsoil moisture unavailable: {}", error.message()));
            }
        }

        // Subsoil moisture and soil temperature only overwrite the
        // simulated values when the live call succeeds.
        if let Ok(value) = self.fetch_property(coords, "soil_moisture_7_to_28cm").await {
            reading.subsoil_moisture = value;
        }
        if let Ok(value) = self.fetch_property(coords, "soil_temperature_0cm").await {
            reading.soil_temperature = value;
        }
    }

    async fn fetch_property(
        &self,
        coords: &Coordinates,
        property: &str,
    ) -> Result<f64, SourceError> {
        let url = format!(
            "{}?latitude={}&longitude={}&current={}",
            self.forecast_url,
            coords.lat(),
            coords.lon(),
            property
        );
        let value = self.fetch_json(&url).await?;
        Ok(value["current"][property].as_f64().unwrap_or(0.0))
    }

    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, SourceError> {
        let request = HttpRequest::get(url).with_timeout_ms(self.timeout_ms);
        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|error| SourceError::unavailable(error.message().to_owned()))?;

        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "upstream returned status {}",
                response.status
            )));
        }

        serde_json::from_str(&response.body)
            .map_err(|e| SourceError::invalid_payload(format!("unparseable payload: {}", e)))
    }
}

/// Parse the simulator's JSON answer with per-field defaults.
///
/// A payload that does not parse at all yields the sentinel-default
/// reading, which the classifier then flags; that keeps "simulator broke"
/// and "simulator admitted failure" on the same hard-failure path.
pub fn parse_simulated(raw: &str) -> SoilReading {
    let cleaned = raw.replace("```json", "").replace("```", "");
    let cleaned = cleaned.trim();

    let Ok(value) = serde_json::from_str::<serde_json::Value>(cleaned) else {
        return sentinel_reading();
    };

    let number = |key: &str, default: f64| value[key].as_f64().unwrap_or(default);
    let percent = |key: &str, default: f64| number(key, default).clamp(0.0, 100.0);

    SoilReading {
        ph: number("ph", SENTINEL_PH),
        organic_carbon: number("soilOrganicCarbon", SENTINEL_ORGANIC_CARBON),
        cation_exchange_capacity: number("cationExchangeCapacity", 12.0),
        bulk_density: number("bulkDensity", 1.4),
        soil_type: value["soilType"].as_str().unwrap_or("Loam").to_owned(),
        nitrogen: number("nitrogen", 60.0),
        phosphorus: number("phosphorus", 20.0),
        potassium: number("potassium", 40.0),
        electrical_conductivity: number("electricalConductivity", 0.5),
        salinity: number("salinity", 0.1),
        sand_percent: percent("sandPercent", 40.0),
        silt_percent: percent("siltPercent", 30.0),
        clay_percent: percent("clayPercent", 30.0),
        topsoil_moisture: 0.0,
        subsoil_moisture: number("subsoilMoisture", 0.0),
        soil_temperature: number("soilTemperature", 25.0),
    }
}

fn sentinel_reading() -> SoilReading {
    SoilReading {
        ph: SENTINEL_PH,
        organic_carbon: SENTINEL_ORGANIC_CARBON,
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

fn iso_date(date: time::Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        date.month() as u8,
        date.day()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify_soil;
    use crate::http_client::NoopHttpClient;
    use crate::textgen::{Credential, MockTextGenerator};

    fn simulator() -> SoilSimulator {
        let chain = CredentialChain::new(
            "data",
            vec![Credential::new("primary", "demo-key").expect("valid credential")],
        )
        .expect("valid chain");
        SoilSimulator::new(
            Arc::new(MockTextGenerator),
            chain,
            Arc::new(NoopHttpClient),
            SoilSimulator::DEFAULT_FORECAST_URL,
            SoilSimulator::DEFAULT_ARCHIVE_URL,
        )
    }

    #[test]
    fn fenced_json_is_parsed() {
        let raw = "```json\n{\"ph\": 7.1, \"soilOrganicCarbon\": 5.5, \"soilType\": \"Clay\"}\n```";
        let reading = parse_simulated(raw);
        assert_eq!(reading.ph, 7.1);
        assert_eq!(reading.organic_carbon, 5.5);
        assert_eq!(reading.soil_type, "Clay");
        // Missing fields pick up their documented defaults.
        assert_eq!(reading.nitrogen, 60.0);
    }

    #[test]
    fn garbage_payload_degrades_to_the_sentinel_reading() {
        let reading = parse_simulated("I cannot help with that request.");
        assert_eq!(classify_soil(&reading), SoilVerdict::SentinelDefault);
    }

    #[test]
    fn texture_percents_are_clamped() {
        let raw = "{\"ph\": 7.0, \"soilOrganicCarbon\": 5.0, \"sandPercent\": 140, \"clayPercent\": -5}";
        let reading = parse_simulated(raw);
        assert_eq!(reading.sand_percent, 100.0);
        assert_eq!(reading.clay_percent, 0.0);
    }

    #[tokio::test]
    async fn offline_fetch_yields_a_real_classified_reading() {
        let simulator = simulator();
        let coords = Coordinates::new(12.97, 77.59).expect("valid coordinates");

        let outcome = simulator.fetch(&coords).await.expect("offline soil fetch");
        assert_eq!(classify_soil(&outcome.reading), SoilVerdict::Real);
        assert!(outcome.reading.topsoil_moisture > 0.0);
    }

    #[tokio::test]
    async fn offline_groundwater_index_is_deterministic_and_bounded() {
        let simulator = simulator();
        let coords = Coordinates::new(26.85, 80.95).expect("valid coordinates");

        let (first, warnings) = simulator.groundwater_index(&coords).await;
        let (second, _) = simulator.groundwater_index(&coords).await;

        assert_eq!(first, second);
        assert!((0.0..=100.0).contains(&first));
        assert!(warnings.is_empty());
    }
}
