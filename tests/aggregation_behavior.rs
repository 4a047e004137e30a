//! Behavior-driven tests for snapshot aggregation
//!
//! These tests verify HOW the pipeline composes its sources: the happy
//! path over the offline sources, the hard-failure paths that push the
//! advisor onto the fallback snapshot, and the identity guarantees the
//! fallback keeps.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use agrilens_core::{
    Advisor, AdvisorConfig, Coordinates, Credential, FallbackSnapshotProvider, MockTextGenerator,
    NoopHttpClient, Season, SourceError, TextGenerator, FALLBACK_RECOMMENDATION,
};

/// Answers soil prompts with a fixed payload and everything else with a
/// one-line recommendation.
struct SoilScripted {
    soil_answer: Result<String, SourceError>,
}

impl TextGenerator for SoilScripted {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
        _credential: &'a Credential,
    ) -> Pin<Box<dyn Future<Output = Result<String, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            if prompt.contains("soil data simulation") {
                self.soil_answer.clone()
            } else {
                Ok(String::from("Wheat \u{2014} cool, dry season fits winter wheat."))
            }
        })
    }
}

struct AlwaysDown;

impl TextGenerator for AlwaysDown {
    fn generate<'a>(
        &'a self,
        _prompt: &'a str,
        _credential: &'a Credential,
    ) -> Pin<Box<dyn Future<Output = Result<String, SourceError>> + Send + 'a>> {
        Box::pin(async { Err(SourceError::unavailable("upstream down".to_owned())) })
    }
}

fn advisor_with(generator: Arc<dyn TextGenerator>) -> Advisor {
    Advisor::with_parts(AdvisorConfig::mock(), Arc::new(NoopHttpClient), generator)
}

fn coords() -> Coordinates {
    Coordinates::new(12.97, 77.59).expect("valid coordinates")
}

#[tokio::test]
async fn offline_pipeline_assembles_a_complete_snapshot() {
    let advisor = Advisor::new(AdvisorConfig::mock());
    let outcome = advisor.snapshot(&coords()).await;

    assert!(!outcome.used_fallback);
    assert!(outcome.errors.is_empty());

    let snapshot = &outcome.snapshot;
    assert_eq!(snapshot.season, Season::current());
    assert_ne!(snapshot.identity.region, "Unknown");
    assert!((0.0..=100.0).contains(&snapshot.groundwater_index));
    assert_eq!(snapshot.weather.forecast.len(), 7);
    assert!(!snapshot.climate.classification.is_empty());
    assert!(!snapshot.recommendation.contains('\n'));
}

#[tokio::test]
async fn identical_coordinates_produce_identical_snapshots_offline() {
    let advisor = Advisor::new(AdvisorConfig::mock());

    let first = advisor.snapshot(&coords()).await;
    let second = advisor.snapshot(&coords()).await;

    assert_eq!(first.snapshot, second.snapshot);
}

#[tokio::test]
async fn exhausted_text_upstream_degrades_to_the_fallback_snapshot() {
    let advisor = advisor_with(Arc::new(AlwaysDown));
    let outcome = advisor.snapshot(&coords()).await;

    assert!(outcome.used_fallback);
    assert!(!outcome.errors.is_empty());
    assert_eq!(outcome.snapshot.season, Season::Rabi);
    assert_eq!(outcome.snapshot.groundwater_index, 75.0);
    assert_eq!(outcome.snapshot.recommendation, FALLBACK_RECOMMENDATION);
}

#[tokio::test]
async fn the_fallback_keeps_the_resolved_identity() {
    // The geocoder still resolves offline, so even a total text-upstream
    // outage must not cost the caller their location.
    let advisor = advisor_with(Arc::new(AlwaysDown));
    let outcome = advisor.snapshot(&coords()).await;

    let resolved = Advisor::new(AdvisorConfig::mock())
        .snapshot(&coords())
        .await
        .snapshot
        .identity;

    assert!(outcome.used_fallback);
    assert_eq!(outcome.snapshot.identity, resolved);
}

#[tokio::test]
async fn a_sentinel_soil_answer_is_a_hard_failure() {
    let advisor = advisor_with(Arc::new(SoilScripted {
        soil_answer: Ok(String::from("{\"ph\": 6.5, \"soilOrganicCarbon\": 8.0}")),
    }));
    let outcome = advisor.snapshot(&coords()).await;

    assert!(outcome.used_fallback);
    assert!(outcome
        .errors
        .iter()
        .any(|error| error.contains("source.sentinel_default")));
}

#[tokio::test]
async fn an_unparseable_soil_answer_is_also_a_hard_failure() {
    let advisor = advisor_with(Arc::new(SoilScripted {
        soil_answer: Ok(String::from("Sorry, I cannot generate soil data.")),
    }));
    let outcome = advisor.snapshot(&coords()).await;

    assert!(outcome.used_fallback);
}

#[tokio::test]
async fn a_nearly_sentinel_reading_passes_classification() {
    let advisor = advisor_with(Arc::new(SoilScripted {
        soil_answer: Ok(String::from("{\"ph\": 6.5, \"soilOrganicCarbon\": 8.01}")),
    }));
    let outcome = advisor.snapshot(&coords()).await;

    assert!(!outcome.used_fallback);
    assert_eq!(outcome.snapshot.soil.organic_carbon, 8.01);
}

#[tokio::test]
async fn fallback_forecast_dates_start_today() {
    let snapshot =
        FallbackSnapshotProvider::snapshot(agrilens_core::Identity::new("Karnataka", "Mysuru"));
    let today = time_today_iso();

    assert_eq!(snapshot.weather.forecast[0].date, today);
    assert_eq!(snapshot.weather.forecast.len(), 7);
}

#[tokio::test]
async fn offline_mock_generator_never_returns_the_sentinel_pair() {
    // Probe a spread of coordinates; the offline simulator must stay
    // clear of the sentinel pair so mock mode always takes the primary
    // path.
    let advisor = advisor_with(Arc::new(MockTextGenerator));
    for lat in [-35, -10, 0, 15, 28, 47] {
        let coords = Coordinates::new(lat as f64, (lat * 2) as f64).expect("valid coordinates");
        let outcome = advisor.snapshot(&coords).await;
        assert!(
            !outcome.used_fallback,
            "fallback at lat {lat}: {:?}",
            outcome.errors
        );
    }
}

fn time_today_iso() -> String {
    let date = time::OffsetDateTime::now_utc().date();
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        date.month() as u8,
        date.day()
    )
}
