use async_trait::async_trait;
use pizzeria_core::{AddressValidator, AddressVerdict, CoreError, CoreResult, LocalAddressValidator};
use pizzeria_shared::Address;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = "pizzeria-api/0.1";
const RESULT_LIMIT: &str = "5";

/// Latitude/longitude window a geocoded address must fall into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        self.min_lat < lat && lat < self.max_lat && self.min_lon < lon && lon < self.max_lon
    }
}

impl Default for BoundingBox {
    /// Toulouse with roughly 20km of margin
    fn default() -> Self {
        Self {
            min_lat: 43.3,
            max_lat: 43.9,
            min_lon: 0.9,
            max_lon: 1.9,
        }
    }
}

/// One entry of a Nominatim `/search?format=json` response
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResult {
    #[serde(default)]
    pub class: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub display_name: String,
    pub lat: String,
    pub lon: String,
}

impl GeocodeResult {
    fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.lat.parse().ok()?, self.lon.parse().ok()?))
    }

    fn is_boundary(&self) -> bool {
        self.class == "boundary" || matches!(self.kind.as_str(), "county" | "state" | "country")
    }

    fn is_street_level(&self) -> bool {
        matches!(self.kind.as_str(), "house" | "residential" | "road" | "address")
    }
}

/// Pick the result that confirms the street exists inside `area`.
///
/// Street-level results win; otherwise the first in-area result mentioning
/// the street is accepted.
pub fn best_match<'a>(
    results: &'a [GeocodeResult],
    street: &str,
    area: &BoundingBox,
) -> Option<&'a GeocodeResult> {
    let street = street.trim().to_lowercase();
    let first_word = street.split_whitespace().next().unwrap_or_default().to_string();

    let mut fallback = None;
    for result in results {
        let Some((lat, lon)) = result.coordinates() else {
            continue;
        };
        if !area.contains(lat, lon) || result.is_boundary() {
            continue;
        }

        let display = result.display_name.to_lowercase();
        if !display.contains(&street) && !display.contains(&first_word) {
            continue;
        }
        if result.is_street_level() {
            return Some(result);
        }
        fallback.get_or_insert(result);
    }
    fallback
}

/// Validates addresses against the local delivery-zone rules, then checks
/// that the street actually exists with a Nominatim-compatible geocoder.
pub struct NominatimValidator {
    client: reqwest::Client,
    base_url: String,
    zone: LocalAddressValidator,
    area: BoundingBox,
    timeout: Duration,
}

impl NominatimValidator {
    pub fn new(base_url: impl Into<String>, zone: LocalAddressValidator, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            zone,
            area: BoundingBox::default(),
            timeout,
        }
    }

    pub fn with_area(mut self, area: BoundingBox) -> Self {
        self.area = area;
        self
    }

    async fn search(&self, query: &str) -> CoreResult<Vec<GeocodeResult>> {
        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("q", query), ("format", "json"), ("limit", RESULT_LIMIT)])
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| CoreError::ExternalService(format!("geocoding request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(CoreError::ExternalService(format!(
                "geocoding service answered HTTP {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| CoreError::ExternalService(format!("unreadable geocoding response: {}", e)))
    }
}

#[async_trait]
impl AddressValidator for NominatimValidator {
    async fn validate(&self, address: &Address) -> CoreResult<AddressVerdict> {
        let verdict = self.zone.check(address);
        if !verdict.is_valid() {
            return Ok(verdict);
        }

        let query = format!("{}, France", address);
        let results = self.search(&query).await?;
        debug!("Geocoder returned {} result(s) for '{}'", results.len(), query);

        Ok(match best_match(&results, &address.street, &self.area) {
            Some(_) => AddressVerdict::Valid,
            None if results.is_empty() => {
                AddressVerdict::Invalid(format!("Address '{}' could not be found", address))
            }
            None => AddressVerdict::Invalid(format!(
                "Address '{}' does not exist in the delivery area, check the street name",
                address
            )),
        })
    }
}
