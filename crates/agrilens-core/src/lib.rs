//! # Agrilens Core
//!
//! Core aggregation and advisory logic for the Agrilens farm-data toolkit.
//!
//! ## Overview
//!
//! This crate provides the foundational components for Agrilens:
//!
//! - **Canonical domain models** for coordinates, soil, weather, climate
//!   and market prices
//! - **Credential chains** with ordered fallback over text-generation keys
//! - **Snapshot aggregation** with concurrent upstream fetches
//! - **Sentinel classification** of simulated soil payloads
//! - **Fallback snapshot** so the advisory surface never fails
//! - **TTL cache** for market price rows
//!
//! ## Feature Flags
//!
//! | Flag | Description |
//! |------|-------------|
//! | `default` | Standard feature set |
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`advisor`] | Public advisory facade (snapshot, chat, summary, prices) |
//! | [`aggregator`] | Snapshot assembly pipeline |
//! | [`cache`] | Generic TTL cache |
//! | [`classifier`] | Sentinel-default soil classification |
//! | [`config`] | Credential chains and endpoint wiring |
//! | [`domain`] | Domain models (Coordinates, Snapshot, MarketPrice) |
//! | [`error`] | Core error types |
//! | [`fallback`] | Last-resort snapshot provider |
//! | [`http_client`] | HTTP client abstraction |
//! | [`prompt`] | Deterministic prompt builders |
//! | [`reference`] | Static crop and pesticide catalogs |
//! | [`sources`] | Upstream sources (soil, weather, climate, market, geocoder) |
//! | [`textgen`] | Text-generation clients and credential chain invocation |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use agrilens_core::{Advisor, AdvisorConfig, Coordinates};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let advisor = Advisor::new(AdvisorConfig::from_env()?);
//!     let coords = Coordinates::new(12.97, 77.59)?;
//!
//!     let outcome = advisor.snapshot(&coords).await;
//!     println!("{}", outcome.snapshot.recommendation);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CLI / Caller   │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │    Advisor      │────▶│ Fallback Snapshot│
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │   Aggregator    │────▶│ Credential Chain │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Sources         │────▶│ HTTP Client      │
//! │ (soil/weather/…)│     │ (reqwest/none)   │
//! └─────────────────┘     └──────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! All operations return `Result` types with structured errors:
//!
//! ```rust
//! use agrilens_core::{SourceError, SourceErrorKind};
//!
//! fn handle_error(error: SourceError) {
//!     match error.kind() {
//!         SourceErrorKind::Unavailable => {
//!             // Try the next credential in the chain
//!         }
//!         SourceErrorKind::SentinelDefault => {
//!             // Fabricated payload; fall back
//!         }
//!         SourceErrorKind::Exhausted => {
//!             // Whole chain failed; substitute the fallback
//!         }
//!         _ => {}
//!     }
//! }
//! ```
//!
//! ## Security
//!
//! - API keys are read from environment variables only (never logged)
//! - Keys travel as URL query credentials to the text upstream only
//! - Input validation on all domain types

pub mod advisor;
pub mod aggregator;
pub mod cache;
pub mod classifier;
pub mod config;
pub mod domain;
pub mod error;
pub mod fallback;
pub mod http_client;
pub mod prompt;
pub mod reference;
pub mod sources;
pub mod textgen;

// Re-export commonly used types at crate root for convenience

// Advisory facade
pub use advisor::{Advisor, FarmerSummary, SnapshotOutcome, CHAT_APOLOGY};

// Aggregation pipeline
pub use aggregator::{
    to_single_line, AggregateError, AggregateStage, AggregateSuccess, SnapshotAggregator,
};

// Caching
pub use cache::TtlCache;

// Sentinel classification
pub use classifier::{classify_soil, SoilVerdict, SENTINEL_ORGANIC_CARBON, SENTINEL_PH};

// Configuration
pub use config::AdvisorConfig;

// Domain models
pub use domain::{
    ClimateReading, Coordinates, CropProfile, CurrentConditions, DailyForecast, Identity,
    MarketPrice, PesticideProfile, Season, Snapshot, SoilReading, WeatherReading,
};

// Error types
pub use error::{CoreError, ValidationError};

// Fallback snapshot
pub use fallback::{FallbackSnapshotProvider, FALLBACK_RECOMMENDATION};

// HTTP client types
pub use http_client::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, NoopHttpClient,
    ReqwestHttpClient,
};

// Upstream sources
pub use sources::climate::{koppen_classification, ClimateSource};
pub use sources::geocoder::ReverseGeocoder;
pub use sources::market::{MarketPriceSource, DEFAULT_COMMODITIES};
pub use sources::soil::{SoilOutcome, SoilSimulator};
pub use sources::weather::WeatherSource;
pub use sources::{SourceError, SourceErrorKind};

// Text generation
pub use textgen::{
    invoke_chain, ChainAttemptError, ChainFailure, ChainSuccess, Credential, CredentialChain,
    GeminiTextClient, MockTextGenerator, TextGenerator,
};
