//! Public advisory facade over the aggregation pipeline.
//!
//! Everything outward-facing is resilient: `snapshot` substitutes the
//! fallback snapshot instead of failing, `chat_answer` degrades to a
//! fixed apology, `translate` returns its input unchanged on failure.
//! Validation errors are the only errors callers ever see.

use std::sync::Arc;

use crate::aggregator::{to_single_line, SnapshotAggregator};
use crate::config::AdvisorConfig;
use crate::domain::{Coordinates, CropProfile, MarketPrice, PesticideProfile, Snapshot};
use crate::error::ValidationError;
use crate::fallback::FallbackSnapshotProvider;
use crate::http_client::{HttpClient, NoopHttpClient, ReqwestHttpClient};
use crate::prompt::{self, PromptContext};
use crate::reference;
use crate::sources::climate::ClimateSource;
use crate::sources::geocoder::ReverseGeocoder;
use crate::sources::market::MarketPriceSource;
use crate::sources::soil::SoilSimulator;
use crate::sources::weather::WeatherSource;
use crate::textgen::{
    invoke_chain, CredentialChain, GeminiTextClient, MockTextGenerator, TextGenerator,
};

pub const CHAT_APOLOGY: &str =
    "I am sorry, I am having trouble connecting right now. Please try again in a moment.";

/// A snapshot plus how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotOutcome {
    pub snapshot: Snapshot,
    pub used_fallback: bool,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

/// The plain-language plan surface. `bullets[0]` is always the locally
/// built "Best crop" line, so it can never disagree with the snapshot
/// recommendation it was copied from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FarmerSummary {
    pub recommendation: String,
    pub bullets: Vec<String>,
}

pub struct Advisor {
    aggregator: SnapshotAggregator,
    market: MarketPriceSource,
    generator: Arc<dyn TextGenerator>,
    data_chain: CredentialChain,
    chat_chain: CredentialChain,
}

impl Advisor {
    pub fn new(config: AdvisorConfig) -> Self {
        let http_client: Arc<dyn HttpClient> = if config.mock_mode {
            Arc::new(NoopHttpClient)
        } else {
            Arc::new(ReqwestHttpClient::new())
        };
        let generator: Arc<dyn TextGenerator> = if config.mock_mode {
            Arc::new(MockTextGenerator)
        } else {
            Arc::new(GeminiTextClient::new(
                Arc::clone(&http_client),
                config.text_api_url.clone(),
            ))
        };
        Self::with_parts(config, http_client, generator)
    }

    /// Construction seam for tests that script the generator or the
    /// transport.
    pub fn with_parts(
        config: AdvisorConfig,
        http_client: Arc<dyn HttpClient>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        let aggregator = SnapshotAggregator::new(
            ReverseGeocoder::new(Arc::clone(&http_client), config.geocode_url.clone()),
            SoilSimulator::new(
                Arc::clone(&generator),
                config.data_chain.clone(),
                Arc::clone(&http_client),
                config.forecast_url.clone(),
                config.archive_url.clone(),
            ),
            WeatherSource::new(Arc::clone(&http_client), config.forecast_url.clone()),
            ClimateSource::new(Arc::clone(&http_client), config.climate_url.clone()),
            Arc::clone(&generator),
            config.data_chain.clone(),
        );
        let market = MarketPriceSource::new(Arc::clone(&http_client), config.market_url.clone());

        Self {
            aggregator,
            market,
            generator,
            data_chain: config.data_chain,
            chat_chain: config.chat_chain,
        }
    }

    /// Aggregate a snapshot; never fails.
    pub async fn snapshot(&self, coords: &Coordinates) -> SnapshotOutcome {
        match self.aggregator.aggregate(coords).await {
            Ok(success) => SnapshotOutcome {
                snapshot: success.snapshot,
                used_fallback: false,
                warnings: success.warnings,
                errors: Vec::new(),
            },
            Err(aborted) => {
                let mut errors: Vec<String> =
                    aborted.errors.iter().map(|e| e.to_string()).collect();
                errors.push(aborted.to_string());
                SnapshotOutcome {
                    snapshot: FallbackSnapshotProvider::snapshot(aborted.identity),
                    used_fallback: true,
                    warnings: aborted.warnings,
                    errors,
                }
            }
        }
    }

    /// Context-grounded answer to a free-form question.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyQuestion`] for a blank question;
    /// upstream exhaustion degrades to [`CHAT_APOLOGY`] instead of failing.
    pub async fn chat_answer(
        &self,
        coords: &Coordinates,
        question: &str,
        language: &str,
    ) -> Result<String, ValidationError> {
        if question.trim().is_empty() {
            return Err(ValidationError::EmptyQuestion);
        }

        let outcome = self.snapshot(coords).await;
        let snapshot = &outcome.snapshot;
        let ctx = PromptContext {
            identity: &snapshot.identity,
            season: snapshot.season,
            soil: &snapshot.soil,
            weather: &snapshot.weather,
            climate: &snapshot.climate,
        };
        let prompt = prompt::chat(&ctx, question.trim(), language);

        let answer = match invoke_chain(self.generator.as_ref(), &self.chat_chain, &prompt).await {
            Ok(success) => {
                let text = success.text.trim().to_owned();
                if text.is_empty() {
                    CHAT_APOLOGY.to_owned()
                } else {
                    text
                }
            }
            Err(_) => CHAT_APOLOGY.to_owned(),
        };
        Ok(answer)
    }

    /// Short plan built around the snapshot's own recommendation.
    pub async fn farmer_summary(&self, coords: &Coordinates) -> FarmerSummary {
        let outcome = self.snapshot(coords).await;
        let snapshot = &outcome.snapshot;
        let recommendation = snapshot.recommendation.clone();

        let mut bullets = vec![format!("Best crop: {}", recommendation)];

        let ctx = PromptContext {
            identity: &snapshot.identity,
            season: snapshot.season,
            soil: &snapshot.soil,
            weather: &snapshot.weather,
            climate: &snapshot.climate,
        };
        let prompt = prompt::farmer_plan(&ctx, &recommendation);

        match invoke_chain(self.generator.as_ref(), &self.data_chain, &prompt).await {
            Ok(success) => {
                bullets.extend(plan_lines(&success.text));
            }
            Err(_) => {
                bullets.extend(static_plan(snapshot));
            }
        }

        FarmerSummary {
            recommendation,
            bullets,
        }
    }

    /// Translate through the chat chain; identity for English and on any
    /// upstream failure.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyTranslationInput`] for blank input.
    pub async fn translate(
        &self,
        text: &str,
        target_language: &str,
    ) -> Result<String, ValidationError> {
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyTranslationInput);
        }
        let language = target_language.trim();
        if language.is_empty() || language.eq_ignore_ascii_case("en") {
            return Ok(text.to_owned());
        }

        let prompt = prompt::translation(text, language);
        match invoke_chain(self.generator.as_ref(), &self.chat_chain, &prompt).await {
            Ok(success) if !success.text.trim().is_empty() => Ok(success.text.trim().to_owned()),
            _ => Ok(text.to_owned()),
        }
    }

    /// Price rows for a commodity; the market defaults per region.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for a blank commodity or region.
    pub async fn market_prices(
        &self,
        commodity: &str,
        region: &str,
        market: Option<&str>,
    ) -> Result<Vec<MarketPrice>, ValidationError> {
        let commodity = commodity.trim();
        if commodity.is_empty() {
            return Err(ValidationError::EmptyCommodity);
        }
        let region = region.trim();
        if region.is_empty() {
            return Err(ValidationError::EmptyRegion);
        }

        let market = match market.map(str::trim).filter(|m| !m.is_empty()) {
            Some(market) => market.to_owned(),
            None => self.market.default_market(region).to_owned(),
        };
        Ok(self.market.prices(commodity, region, &market).await)
    }

    /// Current-day base rows for the default commodity set.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyRegion`] for a blank region.
    pub fn default_prices(&self, region: &str) -> Result<Vec<MarketPrice>, ValidationError> {
        let region = region.trim();
        if region.is_empty() {
            return Err(ValidationError::EmptyRegion);
        }
        let market = self.market.default_market(region);
        Ok(self.market.default_prices(region, market))
    }

    pub fn available_commodities(&self) -> Vec<&'static str> {
        self.market.available_commodities()
    }

    pub fn available_regions(&self) -> Vec<&'static str> {
        self.market.available_regions()
    }

    pub fn default_market(&self, region: &str) -> &'static str {
        self.market.default_market(region)
    }

    pub fn crop_profiles(&self) -> &'static [CropProfile] {
        reference::crop_profiles()
    }

    pub fn pesticide_profiles(&self) -> &'static [PesticideProfile] {
        reference::pesticide_profiles()
    }
}

fn plan_lines(raw: &str) -> Vec<String> {
    raw.replace("```", "")
        .lines()
        .map(|line| line.trim().trim_start_matches(['-', '*', '\u{2022}']).trim())
        .filter(|line| !line.is_empty())
        .take(5)
        .map(str::to_owned)
        .collect()
}

/// Plan used when the text upstream is exhausted. Kept short and derived
/// only from snapshot fields so it stays truthful offline.
fn static_plan(snapshot: &Snapshot) -> Vec<String> {
    let crop = to_single_line(&snapshot.recommendation);
    let crop = crop.split('\u{2014}').next().unwrap_or("").trim().to_owned();
    // A recommendation without the "Crop — reason" shape (the fallback
    // snapshot's full sentence, for one) is not a usable crop name.
    let crop = if crop.is_empty() || crop.len() > 30 {
        String::from("the recommended crop")
    } else {
        crop
    };
    vec![
        format!(
            "Prepare the field for {} before the {} sowing window.",
            crop,
            snapshot.season.label()
        ),
        String::from("Apply basal fertilizer at sowing and top-dress after four weeks."),
        String::from("Irrigate when the topsoil dries out; avoid waterlogging."),
        String::from("Scout weekly for pests and use recommended generic pesticides only."),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn advisor() -> Advisor {
        Advisor::new(AdvisorConfig::mock())
    }

    fn coords() -> Coordinates {
        Coordinates::new(12.97, 77.59).expect("valid coordinates")
    }

    #[tokio::test]
    async fn offline_snapshot_takes_the_primary_path() {
        let outcome = advisor().snapshot(&coords()).await;
        assert!(!outcome.used_fallback);
        assert!(outcome.errors.is_empty());
        assert!(!outcome.snapshot.recommendation.is_empty());
    }

    #[tokio::test]
    async fn blank_question_is_rejected_before_any_fetch() {
        let error = advisor()
            .chat_answer(&coords(), "   ", "en")
            .await
            .expect_err("blank question");
        assert!(matches!(error, ValidationError::EmptyQuestion));
    }

    #[tokio::test]
    async fn summary_first_bullet_reuses_the_recommendation_verbatim() {
        let advisor = advisor();
        let summary = advisor.farmer_summary(&coords()).await;
        let outcome = advisor.snapshot(&coords()).await;

        assert_eq!(
            summary.bullets[0],
            format!("Best crop: {}", outcome.snapshot.recommendation)
        );
        assert_eq!(summary.recommendation, outcome.snapshot.recommendation);
        assert!(summary.bullets.len() > 1);
    }

    #[tokio::test]
    async fn translate_is_identity_for_english_and_blank_targets() {
        let advisor = advisor();
        assert_eq!(
            advisor.translate("sow early", "en").await.expect("identity"),
            "sow early"
        );
        assert_eq!(
            advisor.translate("sow early", "  ").await.expect("identity"),
            "sow early"
        );
        assert_eq!(
            advisor.translate("sow early", "EN").await.expect("identity"),
            "sow early"
        );
    }

    #[tokio::test]
    async fn offline_translate_echoes_the_input_for_other_languages() {
        let advisor = advisor();
        assert_eq!(
            advisor.translate("sow early", "hi").await.expect("echo"),
            "sow early"
        );
    }

    #[tokio::test]
    async fn market_validation_rejects_blank_inputs() {
        let advisor = advisor();
        assert!(matches!(
            advisor.market_prices("", "Karnataka", None).await,
            Err(ValidationError::EmptyCommodity)
        ));
        assert!(matches!(
            advisor.market_prices("Rice", " ", None).await,
            Err(ValidationError::EmptyRegion)
        ));
        assert!(matches!(
            advisor.default_prices(""),
            Err(ValidationError::EmptyRegion)
        ));
    }

    #[tokio::test]
    async fn market_prices_resolve_the_default_market_per_region() {
        let advisor = advisor();
        let rows = advisor
            .market_prices("Rice", "Karnataka", None)
            .await
            .expect("rows");
        assert_eq!(rows[0].market, "Bangalore");
    }

    #[test]
    fn plan_lines_strip_bullet_markers_and_cap_at_five() {
        let raw = "- one\n* two\n\u{2022} three\n\nfour\nfive\nsix";
        let lines = plan_lines(raw);
        assert_eq!(lines, vec!["one", "two", "three", "four", "five"]);
    }

    #[test]
    fn catalogs_are_exposed() {
        let advisor = advisor();
        assert!(!advisor.crop_profiles().is_empty());
        assert!(!advisor.pesticide_profiles().is_empty());
    }
}
