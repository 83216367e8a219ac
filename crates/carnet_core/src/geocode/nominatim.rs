//! Nominatim-backed geocoder.
//!
//! # Responsibility
//! - Issue one `search` request per lookup: `format=json`, free-text
//!   query, `limit=1`.
//! - Decode candidates whose coordinates arrive as numeric-like strings.
//!
//! # Invariants
//! - Every request carries an explicit User-Agent (provider policy).
//! - Pacing between lookups is the queue's job, not the client's.

use crate::geocode::{GeoCandidate, GeocodeError, GeocodeResult, Geocoder};
use serde::Deserialize;

/// Public Nominatim search endpoint.
pub const NOMINATIM_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";

#[derive(Debug, Deserialize)]
struct NominatimHit {
    lat: String,
    lon: String,
}

/// Blocking Nominatim client.
pub struct NominatimGeocoder {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl NominatimGeocoder {
    /// Client against the public endpoint.
    pub fn new() -> GeocodeResult<Self> {
        Self::with_endpoint(NOMINATIM_ENDPOINT)
    }

    /// Client against a custom endpoint (self-hosted instance, tests).
    pub fn with_endpoint(endpoint: impl Into<String>) -> GeocodeResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("carnet/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

impl Geocoder for NominatimGeocoder {
    fn lookup(&self, place: &str) -> GeocodeResult<Vec<GeoCandidate>> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("format", "json"), ("q", place), ("limit", "1")])
            .send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status(status.as_u16()));
        }

        let payload = response.text()?;
        let hits: Vec<NominatimHit> = serde_json::from_str(&payload)
            .map_err(|err| GeocodeError::Malformed(err.to_string()))?;

        hits.into_iter()
            .map(|hit| {
                let lat = parse_coordinate(&hit.lat)?;
                let lon = parse_coordinate(&hit.lon)?;
                Ok(GeoCandidate { lat, lon })
            })
            .collect()
    }
}

fn parse_coordinate(value: &str) -> GeocodeResult<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| GeocodeError::Malformed(format!("non-numeric coordinate `{value}`")))
}
