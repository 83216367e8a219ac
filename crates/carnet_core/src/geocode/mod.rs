//! Geocoding: provider seam and the paced resolution queue.
//!
//! # Responsibility
//! - Resolve place names of placeable items into coordinates.
//! - Enforce the provider's one-request-per-second usage policy.
//!
//! # Invariants
//! - Lookups run strictly sequentially, never concurrently.
//! - A failed lookup leaves its item unresolved and eligible for the next
//!   scan; there is no terminal failure state.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod nominatim;
pub mod queue;

pub type GeocodeResult<T> = Result<T, GeocodeError>;

/// Geocoding lookup error.
#[derive(Debug)]
pub enum GeocodeError {
    Network(reqwest::Error),
    /// Provider answered with a non-success status.
    Status(u16),
    /// Provider answered with a body the candidate decoder rejects.
    Malformed(String),
}

impl Display for GeocodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network(err) => write!(f, "geocoding request failed: {err}"),
            Self::Status(code) => write!(f, "geocoding request returned status {code}"),
            Self::Malformed(message) => write!(f, "geocoding response rejected: {message}"),
        }
    }
}

impl Error for GeocodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Network(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GeocodeError {
    fn from(value: reqwest::Error) -> Self {
        Self::Network(value)
    }
}

/// One geocoding candidate; only the first returned candidate is ever
/// applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoCandidate {
    pub lat: f64,
    pub lon: f64,
}

/// Place-name resolution seam.
pub trait Geocoder {
    /// Resolves a free-text place query into ordered candidates.
    ///
    /// An empty vector is a successful lookup with no match.
    fn lookup(&self, place: &str) -> GeocodeResult<Vec<GeoCandidate>>;
}
