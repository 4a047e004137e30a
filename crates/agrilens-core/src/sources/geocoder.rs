//! Reverse geocoding of coordinates into a place identity.

use std::sync::Arc;

use serde::Deserialize;

use crate::domain::{Coordinates, Identity};
use crate::http_client::{HttpClient, HttpRequest};

/// Resolves coordinates to `(region, place)`.
///
/// Resolution is infallible by contract: transport or parse failures
/// degrade to [`Identity::unknown`] so the aggregation pipeline (and the
/// fallback snapshot after it) always has an identity to carry.
pub struct ReverseGeocoder {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: u64,
}

impl ReverseGeocoder {
    pub const DEFAULT_URL: &'static str =
        "https://api.bigdatacloud.net/data/reverse-geocode-client";

    pub fn new(http_client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            timeout_ms: 8_000,
        }
    }

    pub async fn resolve(&self, coords: &Coordinates) -> Identity {
        if self.http_client.is_mock() {
            return mock_identity(coords);
        }

        let url = format!(
            "{}?latitude={}&longitude={}&localityLanguage=en",
            self.base_url,
            coords.lat(),
            coords.lon()
        );
        let request = HttpRequest::get(url).with_timeout_ms(self.timeout_ms);

        let response = match self.http_client.execute(request).await {
            Ok(response) if response.is_success() => response,
            _ => return Identity::unknown(),
        };

        match serde_json::from_str::<GeocodePayload>(&response.body) {
            Ok(payload) => {
                let place = if payload.locality.trim().is_empty() {
                    payload.city
                } else {
                    payload.locality
                };
                Identity::new(payload.principal_subdivision, place)
            }
            Err(_) => Identity::unknown(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeocodePayload {
    #[serde(rename = "principalSubdivision", default)]
    principal_subdivision: String,
    #[serde(default)]
    locality: String,
    #[serde(default)]
    city: String,
}

fn mock_identity(coords: &Coordinates) -> Identity {
    const PLACES: [(&str, &str); 4] = [
        ("Karnataka", "Mysuru"),
        ("Punjab", "Ludhiana"),
        ("Maharashtra", "Nashik"),
        ("Uttar Pradesh", "Varanasi"),
    ];
    let (region, place) = PLACES[(coords.seed() % PLACES.len() as u64) as usize];
    Identity::new(region, place)
}
