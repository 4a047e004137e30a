//! Advisor wiring: credential chains, endpoint URLs and mock mode.
//!
//! Configuration comes from the environment by default. Each chain reads
//! a primary and an optional secondary key; when no data key is present
//! at all the whole advisor drops into offline mock mode rather than
//! failing construction.

use std::env;

use crate::error::ValidationError;
use crate::textgen::{Credential, CredentialChain};

pub const DATA_KEY_ENV: &str = "AGRILENS_DATA_API_KEY";
pub const DATA_KEY_2_ENV: &str = "AGRILENS_DATA_API_KEY_2";
pub const CHAT_KEY_ENV: &str = "AGRILENS_CHAT_API_KEY";
pub const CHAT_KEY_2_ENV: &str = "AGRILENS_CHAT_API_KEY_2";
pub const TEXT_API_URL_ENV: &str = "AGRILENS_TEXT_API_URL";
pub const MARKET_URL_ENV: &str = "AGRILENS_MARKET_API_URL";

pub const DEFAULT_TEXT_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";

#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    pub mock_mode: bool,
    pub data_chain: CredentialChain,
    pub chat_chain: CredentialChain,
    pub text_api_url: String,
    pub geocode_url: String,
    pub forecast_url: String,
    pub archive_url: String,
    pub climate_url: String,
    pub market_url: String,
}

impl AdvisorConfig {
    /// Offline configuration with placeholder credentials. Every source
    /// answers deterministically from the coordinate seed.
    pub fn mock() -> Self {
        // Placeholder keys keep the chain invariants satisfied; the
        // offline generator never reads them.
        let data_chain = chain_of("data", &[("primary", "offline"), ("secondary", "offline")]);
        let chat_chain = chain_of(
            "chat",
            &[("chat-primary", "offline"), ("chat-secondary", "offline")],
        );
        Self {
            mock_mode: true,
            data_chain,
            chat_chain,
            text_api_url: DEFAULT_TEXT_API_URL.to_owned(),
            geocode_url: crate::sources::geocoder::ReverseGeocoder::DEFAULT_URL.to_owned(),
            forecast_url: crate::sources::soil::SoilSimulator::DEFAULT_FORECAST_URL.to_owned(),
            archive_url: crate::sources::soil::SoilSimulator::DEFAULT_ARCHIVE_URL.to_owned(),
            climate_url: crate::sources::climate::ClimateSource::DEFAULT_URL.to_owned(),
            market_url: crate::sources::market::MarketPriceSource::DEFAULT_URL.to_owned(),
        }
    }

    /// Read chains and URL overrides from the environment.
    ///
    /// Missing data credentials mean there is nothing to talk to the text
    /// upstream with, so the advisor falls back to [`AdvisorConfig::mock`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when a present key is blank.
    pub fn from_env() -> Result<Self, ValidationError> {
        let Some(data_primary) = non_blank_env(DATA_KEY_ENV) else {
            return Ok(Self::mock());
        };

        let mut data = vec![Credential::new("primary", data_primary)?];
        if let Some(key) = non_blank_env(DATA_KEY_2_ENV) {
            data.push(Credential::new("secondary", key)?);
        }
        let data_chain = CredentialChain::new("data", data)?;

        // The chat chain reuses the data credentials when no dedicated
        // chat keys are configured.
        let chat_chain = match non_blank_env(CHAT_KEY_ENV) {
            Some(primary) => {
                let mut chat = vec![Credential::new("chat-primary", primary)?];
                if let Some(key) = non_blank_env(CHAT_KEY_2_ENV) {
                    chat.push(Credential::new("chat-secondary", key)?);
                }
                CredentialChain::new("chat", chat)?
            }
            None => CredentialChain::new("chat", data_chain.iter().cloned().collect())?,
        };

        let mut config = Self {
            mock_mode: false,
            data_chain,
            chat_chain,
            ..Self::mock()
        };
        if let Some(url) = non_blank_env(TEXT_API_URL_ENV) {
            config.text_api_url = url;
        }
        if let Some(url) = non_blank_env(MARKET_URL_ENV) {
            config.market_url = url;
        }
        Ok(config)
    }

    pub fn with_mock_mode(mut self, mock_mode: bool) -> Self {
        self.mock_mode = mock_mode;
        self
    }

    pub fn with_data_chain(mut self, chain: CredentialChain) -> Self {
        self.data_chain = chain;
        self
    }

    pub fn with_chat_chain(mut self, chain: CredentialChain) -> Self {
        self.chat_chain = chain;
        self
    }

    pub fn with_text_api_url(mut self, url: impl Into<String>) -> Self {
        self.text_api_url = url.into();
        self
    }

    pub fn with_market_url(mut self, url: impl Into<String>) -> Self {
        self.market_url = url.into();
        self
    }
}

fn non_blank_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn chain_of(name: &str, entries: &[(&str, &str)]) -> CredentialChain {
    let credentials = entries
        .iter()
        .map(|(label, key)| {
            // Literal non-empty inputs; the validators cannot fire.
            Credential::new(*label, *key).unwrap_or_else(|_| {
                unreachable!("placeholder credentials are statically non-empty")
            })
        })
        .collect();
    CredentialChain::new(name, credentials)
        .unwrap_or_else(|_| unreachable!("placeholder chain is statically non-empty"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_config_carries_both_chains_in_order() {
        let config = AdvisorConfig::mock();

        assert!(config.mock_mode);
        assert_eq!(config.data_chain.len(), 2);
        assert_eq!(
            config
                .chat_chain
                .iter()
                .map(|c| c.label())
                .collect::<Vec<_>>(),
            vec!["chat-primary", "chat-secondary"]
        );
    }

    #[test]
    fn builder_overrides_stick() {
        let config = AdvisorConfig::mock()
            .with_text_api_url("http://localhost:9090/generate")
            .with_market_url("http://localhost:9090/prices")
            .with_mock_mode(false);

        assert!(!config.mock_mode);
        assert_eq!(config.text_api_url, "http://localhost:9090/generate");
        assert_eq!(config.market_url, "http://localhost:9090/prices");
    }
}
