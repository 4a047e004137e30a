//! Mandi commodity prices with a keyed TTL cache and a seeded mock series.
//!
//! Live rows come from a configured mandi-price endpoint and are cached
//! for thirty minutes per (commodity, region, market) key. When the live
//! call fails, or the transport is the offline one, a deterministic
//! 7-day series around per-commodity base prices stands in. The mock
//! series is never written to the cache.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::TtlCache;
use crate::domain::MarketPrice;
use crate::http_client::{HttpClient, HttpRequest};

const CACHE_TTL: Duration = Duration::from_secs(30 * 60);
const MOCK_SERIES_DAYS: u32 = 7;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Commodities offered when the caller does not name any.
pub const DEFAULT_COMMODITIES: [&str; 10] = [
    "Rice", "Wheat", "Potato", "Onion", "Tomato", "Maize", "Soybean", "Mustard", "Chickpea",
    "Cotton",
];

/// Typical Indian wholesale price bands in INR per quintal.
const BASE_PRICES: [(&str, f64, f64, f64); 20] = [
    ("Rice", 2800.0, 3500.0, 3150.0),
    ("Wheat", 2200.0, 2800.0, 2500.0),
    ("Potato", 1200.0, 2000.0, 1600.0),
    ("Onion", 1500.0, 3500.0, 2500.0),
    ("Tomato", 1800.0, 4000.0, 2800.0),
    ("Maize", 1800.0, 2400.0, 2100.0),
    ("Soybean", 4500.0, 5500.0, 5000.0),
    ("Mustard", 5000.0, 6500.0, 5750.0),
    ("Chickpea", 5500.0, 7000.0, 6250.0),
    ("Cotton", 6500.0, 8000.0, 7250.0),
    ("Sugarcane", 350.0, 450.0, 400.0),
    ("Groundnut", 5500.0, 7500.0, 6500.0),
    ("Sorghum", 2800.0, 3600.0, 3200.0),
    ("Pearl Millet", 2200.0, 2800.0, 2500.0),
    ("Barley", 1800.0, 2400.0, 2100.0),
    ("Lentil", 6000.0, 8000.0, 7000.0),
    ("Mung Bean", 7500.0, 9500.0, 8500.0),
    ("Pigeon Pea", 7000.0, 9000.0, 8000.0),
    ("Cucumber", 2000.0, 3500.0, 2750.0),
    ("Watermelon", 1500.0, 2500.0, 2000.0),
];

const DEFAULT_BASE_PRICE: (f64, f64, f64) = (2000.0, 3000.0, 2500.0);

const REGIONS: [&str; 36] = [
    "Andaman and Nicobar",
    "Andhra Pradesh",
    "Arunachal Pradesh",
    "Assam",
    "Bihar",
    "Chandigarh",
    "Chhattisgarh",
    "Dadra and Nagar Haveli",
    "Delhi",
    "Goa",
    "Gujarat",
    "Haryana",
    "Himachal Pradesh",
    "Jammu and Kashmir",
    "Jharkhand",
    "Karnataka",
    "Kerala",
    "Ladakh",
    "Lakshadweep",
    "Madhya Pradesh",
    "Maharashtra",
    "Manipur",
    "Meghalaya",
    "Mizoram",
    "Nagaland",
    "Odisha",
    "Puducherry",
    "Punjab",
    "Rajasthan",
    "Sikkim",
    "Tamil Nadu",
    "Telangana",
    "Tripura",
    "Uttar Pradesh",
    "Uttarakhand",
    "West Bengal",
];

const DEFAULT_MARKETS: [(&str, &str); 36] = [
    ("Delhi", "Azadpur"),
    ("Maharashtra", "Mumbai"),
    ("Karnataka", "Bangalore"),
    ("Tamil Nadu", "Chennai"),
    ("Gujarat", "Ahmedabad"),
    ("Uttar Pradesh", "Lucknow"),
    ("Punjab", "Ludhiana"),
    ("Haryana", "Karnal"),
    ("Rajasthan", "Jaipur"),
    ("Madhya Pradesh", "Bhopal"),
    ("West Bengal", "Kolkata"),
    ("Bihar", "Patna"),
    ("Andhra Pradesh", "Vijayawada"),
    ("Telangana", "Hyderabad"),
    ("Kerala", "Kochi"),
    ("Odisha", "Bhubaneswar"),
    ("Assam", "Guwahati"),
    ("Jharkhand", "Ranchi"),
    ("Chhattisgarh", "Raipur"),
    ("Uttarakhand", "Dehradun"),
    ("Himachal Pradesh", "Shimla"),
    ("Jammu and Kashmir", "Jammu"),
    ("Goa", "Panaji"),
    ("Tripura", "Agartala"),
    ("Meghalaya", "Shillong"),
    ("Manipur", "Imphal"),
    ("Nagaland", "Kohima"),
    ("Arunachal Pradesh", "Itanagar"),
    ("Mizoram", "Aizawl"),
    ("Sikkim", "Gangtok"),
    ("Chandigarh", "Chandigarh"),
    ("Puducherry", "Puducherry"),
    ("Ladakh", "Leh"),
    ("Andaman and Nicobar", "Port Blair"),
    ("Dadra and Nagar Haveli", "Silvassa"),
    ("Lakshadweep", "Kavaratti"),
];

pub struct MarketPriceSource {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    cache: TtlCache<Vec<MarketPrice>>,
    timeout_ms: u64,
}

impl MarketPriceSource {
    pub const DEFAULT_URL: &'static str = "https://api.agrilens.in/v1/mandi-prices";

    pub fn new(http_client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            cache: TtlCache::new(CACHE_TTL),
            timeout_ms: 12_000,
        }
    }

    /// Price rows for one commodity in one market.
    ///
    /// Infallible by contract: live failure degrades to the seeded mock
    /// series for the same key, so callers always get rows back.
    pub async fn prices(&self, commodity: &str, region: &str, market: &str) -> Vec<MarketPrice> {
        if self.http_client.is_mock() {
            return mock_series(commodity, region, market);
        }

        let key = cache_key(commodity, region, market);
        if let Some(cached) = self.cache.get(&key).await {
            return cached;
        }

        match self.fetch_live(commodity, region, market).await {
            Some(rows) if !rows.is_empty() => {
                self.cache.put(key, rows.clone()).await;
                rows
            }
            _ => mock_series(commodity, region, market),
        }
    }

    /// One current-day row per default commodity, straight off the base
    /// price table.
    pub fn default_prices(&self, region: &str, market: &str) -> Vec<MarketPrice> {
        let date = display_date(time::OffsetDateTime::now_utc().date());
        DEFAULT_COMMODITIES
            .iter()
            .enumerate()
            .map(|(i, commodity)| {
                let (min, max, modal) = base_price(commodity);
                MarketPrice {
                    serial_no: (i + 1).to_string(),
                    market: market.to_owned(),
                    commodity: (*commodity).to_owned(),
                    variety: String::from("Local"),
                    min_price: min,
                    max_price: max,
                    modal_price: modal,
                    date: date.clone(),
                    region: region.to_owned(),
                }
            })
            .collect()
    }

    pub fn available_commodities(&self) -> Vec<&'static str> {
        BASE_PRICES.iter().map(|(name, _, _, _)| *name).collect()
    }

    pub fn available_regions(&self) -> Vec<&'static str> {
        REGIONS.to_vec()
    }

    pub fn default_market(&self, region: &str) -> &'static str {
        DEFAULT_MARKETS
            .iter()
            .find(|(state, _)| state.eq_ignore_ascii_case(region))
            .map(|(_, market)| *market)
            .unwrap_or("Local Market")
    }

    async fn fetch_live(
        &self,
        commodity: &str,
        region: &str,
        market: &str,
    ) -> Option<Vec<MarketPrice>> {
        let url = format!(
            "{}?commodity={}&state={}&market={}",
            self.base_url,
            urlencoding::encode(commodity),
            urlencoding::encode(region),
            urlencoding::encode(market)
        );
        let request = HttpRequest::get(url).with_timeout_ms(self.timeout_ms);

        let response = self.http_client.execute(request).await.ok()?;
        if !response.is_success() {
            return None;
        }

        let value: serde_json::Value = serde_json::from_str(&response.body).ok()?;
        let records = value.as_array().or_else(|| value["records"].as_array())?;

        Some(
            records
                .iter()
                .filter_map(|record| parse_record(record, region))
                .collect(),
        )
    }
}

fn cache_key(commodity: &str, region: &str, market: &str) -> String {
    format!("{}_{}_{}", commodity, region, market)
}

fn base_price(commodity: &str) -> (f64, f64, f64) {
    BASE_PRICES
        .iter()
        .find(|(name, _, _, _)| name.eq_ignore_ascii_case(commodity))
        .map(|(_, min, max, modal)| (*min, *max, *modal))
        .unwrap_or(DEFAULT_BASE_PRICE)
}

fn parse_record(record: &serde_json::Value, region: &str) -> Option<MarketPrice> {
    let field = |key: &str| record[key].as_str().unwrap_or("").trim().to_owned();
    let commodity = field("Commodity");
    if commodity.is_empty() {
        return None;
    }

    Some(MarketPrice {
        serial_no: field("S.No"),
        market: field("City"),
        commodity,
        variety: String::from("Local"),
        min_price: sanitize_price(&field("Min Prize")),
        max_price: sanitize_price(&field("Max Prize")),
        modal_price: sanitize_price(&field("Model Prize")),
        date: field("Date"),
        region: region.to_owned(),
    })
}

/// Upstream prices arrive as display strings ("Rs 2,800/-"); keep digits
/// and the decimal point, everything else falls away.
fn sanitize_price(raw: &str) -> f64 {
    let digits: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse().unwrap_or(0.0)
}

/// Seven rows, today first, daily prices wobbling +/-10% around the
/// commodity's base band. Seeded from the cache key so identical queries
/// always see the identical series.
fn mock_series(commodity: &str, region: &str, market: &str) -> Vec<MarketPrice> {
    let key = cache_key(commodity, region, market);
    let seed = key
        .bytes()
        .fold(0u64, |acc, b| acc.wrapping_mul(33).wrapping_add(b as u64));
    let mut rng = fastrand::Rng::with_seed(seed);

    let (min, max, modal) = base_price(commodity);
    let today = time::OffsetDateTime::now_utc().date();

    (0..MOCK_SERIES_DAYS)
        .map(|day| {
            let variation = 0.9 + rng.f64() * 0.2;
            MarketPrice {
                serial_no: (day + 1).to_string(),
                market: market.to_owned(),
                commodity: commodity.to_owned(),
                variety: String::from("Local"),
                min_price: round2(min * variation),
                max_price: round2(max * variation),
                modal_price: round2(modal * variation),
                date: display_date(today - time::Duration::days(day as i64)),
                region: region.to_owned(),
            }
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn display_date(date: time::Date) -> String {
    format!(
        "{:02} {} {}",
        date.day(),
        MONTH_NAMES[date.month() as usize - 1],
        date.year()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::NoopHttpClient;

    fn source() -> MarketPriceSource {
        MarketPriceSource::new(Arc::new(NoopHttpClient), MarketPriceSource::DEFAULT_URL)
    }

    #[test]
    fn price_sanitation_strips_display_noise() {
        assert_eq!(sanitize_price("Rs 2,800/-"), 2800.0);
        assert_eq!(sanitize_price("3150.50"), 3150.5);
        assert_eq!(sanitize_price("N/A"), 0.0);
        assert_eq!(sanitize_price(""), 0.0);
    }

    #[test]
    fn record_parsing_uses_the_upstream_key_spelling() {
        let record = serde_json::json!({
            "S.No": "1",
            "City": "Azadpur",
            "Commodity": "Onion",
            "Min Prize": "Rs 1,500",
            "Max Prize": "Rs 3,500",
            "Model Prize": "Rs 2,500",
            "Date": "29 Aug 2026"
        });

        let price = parse_record(&record, "Delhi").expect("record parses");
        assert_eq!(price.market, "Azadpur");
        assert_eq!(price.min_price, 1500.0);
        assert_eq!(price.modal_price, 2500.0);
        assert_eq!(price.variety, "Local");
        assert_eq!(price.region, "Delhi");
    }

    #[test]
    fn records_without_a_commodity_are_dropped() {
        let record = serde_json::json!({ "S.No": "1", "City": "Azadpur" });
        assert!(parse_record(&record, "Delhi").is_none());
    }

    #[tokio::test]
    async fn offline_series_is_deterministic_and_seven_days_long() {
        let source = source();

        let first = source.prices("Rice", "Karnataka", "Bangalore").await;
        let second = source.prices("Rice", "Karnataka", "Bangalore").await;

        assert_eq!(first, second);
        assert_eq!(first.len(), 7);
        assert_eq!(first[0].serial_no, "1");
        // Every row stays within the +/-10% band around the base prices.
        for row in &first {
            assert!(row.min_price >= 2800.0 * 0.9 && row.min_price <= 2800.0 * 1.1);
            assert!(row.modal_price >= 3150.0 * 0.9 && row.modal_price <= 3150.0 * 1.1);
        }
    }

    #[test]
    fn different_keys_produce_different_series() {
        let a = mock_series("Rice", "Karnataka", "Bangalore");
        let b = mock_series("Rice", "Punjab", "Ludhiana");
        assert_ne!(a[0].min_price, b[0].min_price);
    }

    #[test]
    fn unknown_commodity_uses_the_default_band() {
        let series = mock_series("Dragonfruit", "Kerala", "Kochi");
        assert!(series[0].modal_price >= 2500.0 * 0.9);
        assert!(series[0].modal_price <= 2500.0 * 1.1);
    }

    #[test]
    fn default_prices_cover_the_default_commodities() {
        let source = source();
        let rows = source.default_prices("Karnataka", "Bangalore");

        assert_eq!(rows.len(), DEFAULT_COMMODITIES.len());
        assert_eq!(rows[0].commodity, "Rice");
        assert_eq!(rows[0].modal_price, 3150.0);
        assert_eq!(rows.last().map(|r| r.commodity.as_str()), Some("Cotton"));
    }

    #[test]
    fn default_market_lookup_falls_back_to_local() {
        let source = source();
        assert_eq!(source.default_market("Delhi"), "Azadpur");
        assert_eq!(source.default_market("karnataka"), "Bangalore");
        assert_eq!(source.default_market("Atlantis"), "Local Market");
    }

    #[test]
    fn catalogs_are_complete() {
        let source = source();
        assert_eq!(source.available_regions().len(), 36);
        assert_eq!(source.available_commodities().len(), 20);
    }
}
