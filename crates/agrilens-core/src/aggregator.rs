//! Snapshot assembly: identity, concurrent fetches, recommendation.
//!
//! The pipeline is all-or-nothing for soil, weather and climate: any of
//! those failing aborts the aggregation with the stage that broke, and
//! the caller substitutes the fallback snapshot. Groundwater and the
//! moisture enrichment degrade in place with warnings instead.

use std::fmt;
use std::sync::Arc;

use crate::domain::{Coordinates, Identity, Season, Snapshot};
use crate::prompt::{self, PromptContext};
use crate::sources::climate::ClimateSource;
use crate::sources::geocoder::ReverseGeocoder;
use crate::sources::soil::SoilSimulator;
use crate::sources::weather::WeatherSource;
use crate::sources::SourceError;
use crate::textgen::{invoke_chain, CredentialChain, TextGenerator};

/// Pipeline stage an aggregation failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateStage {
    Soil,
    Weather,
    Climate,
    Recommendation,
}

impl fmt::Display for AggregateStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Soil => "soil",
            Self::Weather => "weather",
            Self::Climate => "climate",
            Self::Recommendation => "recommendation",
        };
        f.write_str(name)
    }
}

/// A completed snapshot plus everything that went slightly wrong on the
/// way there.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateSuccess {
    pub snapshot: Snapshot,
    pub warnings: Vec<String>,
}

/// An aborted aggregation. The identity is always resolved (possibly
/// `Unknown`) so the fallback snapshot can still carry a real location.
#[derive(Debug, Clone)]
pub struct AggregateError {
    pub stage: AggregateStage,
    pub identity: Identity,
    pub errors: Vec<SourceError>,
    pub warnings: Vec<String>,
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "aggregation aborted at the {} stage with {} error(s)",
            self.stage,
            self.errors.len()
        )
    }
}

pub struct SnapshotAggregator {
    geocoder: ReverseGeocoder,
    soil: SoilSimulator,
    weather: WeatherSource,
    climate: ClimateSource,
    generator: Arc<dyn TextGenerator>,
    data_chain: CredentialChain,
}

impl SnapshotAggregator {
    pub fn new(
        geocoder: ReverseGeocoder,
        soil: SoilSimulator,
        weather: WeatherSource,
        climate: ClimateSource,
        generator: Arc<dyn TextGenerator>,
        data_chain: CredentialChain,
    ) -> Self {
        Self {
            geocoder,
            soil,
            weather,
            climate,
            generator,
            data_chain,
        }
    }

    /// Run the full pipeline for one coordinate pair.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateError`] when soil, weather or climate fail, or
    /// when the recommendation chain is exhausted.
    pub async fn aggregate(
        &self,
        coords: &Coordinates,
    ) -> Result<AggregateSuccess, AggregateError> {
        let identity = self.geocoder.resolve(coords).await;

        let (soil, weather, climate, groundwater) = tokio::join!(
            self.soil.fetch(coords),
            self.weather.fetch(coords),
            self.climate.fetch(coords),
            self.soil.groundwater_index(coords),
        );

        let mut warnings = Vec::new();
        let mut errors = Vec::new();
        let mut stage = None;

        let soil = match soil {
            Ok(outcome) => {
                warnings.extend(outcome.warnings);
                Some(outcome.reading)
            }
            Err(error) => {
                stage.get_or_insert(AggregateStage::Soil);
                errors.push(error);
                None
            }
        };
        let weather = match weather {
            Ok(reading) => Some(reading),
            Err(error) => {
                stage.get_or_insert(AggregateStage::Weather);
                errors.push(error);
                None
            }
        };
        let climate = match climate {
            Ok(reading) => Some(reading),
            Err(error) => {
                stage.get_or_insert(AggregateStage::Climate);
                errors.push(error);
                None
            }
        };

        let (groundwater_index, groundwater_warnings) = groundwater;
        warnings.extend(groundwater_warnings);

        if let Some(stage) = stage {
            return Err(AggregateError {
                stage,
                identity,
                errors,
                warnings,
            });
        }

        // stage is None, so all three readings are present.
        let (Some(soil), Some(weather), Some(climate)) = (soil, weather, climate) else {
            return Err(AggregateError {
                stage: AggregateStage::Soil,
                identity,
                errors,
                warnings,
            });
        };

        let season = Season::current();
        let ctx = PromptContext {
            identity: &identity,
            season,
            soil: &soil,
            weather: &weather,
            climate: &climate,
        };
        let recommendation_prompt = prompt::crop_recommendation(&ctx);

        let recommendation = match invoke_chain(
            self.generator.as_ref(),
            &self.data_chain,
            &recommendation_prompt,
        )
        .await
        {
            Ok(success) => {
                warnings.extend(success.warnings);
                to_single_line(&success.text)
            }
            Err(failure) => {
                errors.push(failure.to_source_error());
                return Err(AggregateError {
                    stage: AggregateStage::Recommendation,
                    identity,
                    errors,
                    warnings,
                });
            }
        };

        Ok(AggregateSuccess {
            snapshot: Snapshot {
                identity,
                season,
                groundwater_index,
                soil,
                weather,
                climate,
                recommendation,
            },
            warnings,
        })
    }
}

/// Collapse a model answer to its first meaningful line, with code fences
/// and carriage returns stripped.
pub fn to_single_line(text: &str) -> String {
    let cleaned = text.replace("```", "").replace('\r', "");
    cleaned
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("")
        .to_owned()
}
