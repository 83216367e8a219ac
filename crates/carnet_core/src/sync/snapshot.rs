//! Remote snapshot fetch seam and HTTP implementation.
//!
//! # Responsibility
//! - Fetch the published trip document that unconditionally wins over the
//!   local cache at startup.
//! - Keep the HTTP details behind a trait so the gateway stays testable.
//!
//! # Invariants
//! - Every fetch bypasses intermediate caches with a fresh `t` query value.
//! - A fetch failure is recoverable by design; callers keep prior data.

use crate::model::trip::{TripData, TripDecodeError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

/// File name shared by the published snapshot and manual exports.
pub const SNAPSHOT_FILE_NAME: &str = "planning_sauvegarde.json";

/// Snapshot fetch error.
#[derive(Debug)]
pub enum SnapshotError {
    Network(reqwest::Error),
    /// Server answered with a non-success status.
    Status(u16),
    Parse(TripDecodeError),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network(err) => write!(f, "snapshot request failed: {err}"),
            Self::Status(code) => write!(f, "snapshot request returned status {code}"),
            Self::Parse(err) => write!(f, "snapshot payload rejected: {err}"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Network(err) => Some(err),
            Self::Status(_) => None,
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<reqwest::Error> for SnapshotError {
    fn from(value: reqwest::Error) -> Self {
        Self::Network(value)
    }
}

impl From<TripDecodeError> for SnapshotError {
    fn from(value: TripDecodeError) -> Self {
        Self::Parse(value)
    }
}

/// Source of the published trip snapshot.
pub trait SnapshotFetcher {
    /// Returns the remote document, `Ok(None)` when no remote is
    /// configured, or an error the caller recovers from silently.
    fn fetch(&self) -> Result<Option<TripData>, SnapshotError>;
}

/// Fetcher for deployments without a published snapshot.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRemote;

impl SnapshotFetcher for NoRemote {
    fn fetch(&self) -> Result<Option<TripData>, SnapshotError> {
        Ok(None)
    }
}

/// Blocking HTTP fetcher for the published snapshot file.
pub struct HttpSnapshotFetcher {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpSnapshotFetcher {
    /// Targets `planning_sauvegarde.json` under a base URL.
    pub fn new(base_url: &str) -> Result<Self, SnapshotError> {
        let url = format!("{}/{SNAPSHOT_FILE_NAME}", base_url.trim_end_matches('/'));
        Self::from_url(url)
    }

    /// Targets an explicit snapshot URL.
    pub fn from_url(url: impl Into<String>) -> Result<Self, SnapshotError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("carnet/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl SnapshotFetcher for HttpSnapshotFetcher {
    fn fetch(&self) -> Result<Option<TripData>, SnapshotError> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("t", cache_bust_stamp())])
            .send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(SnapshotError::Status(status.as_u16()));
        }
        let payload = response.text()?;
        let data = TripData::from_json_str(&payload)?;
        Ok(Some(data))
    }
}

fn cache_bust_stamp() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or(0);
    millis.to_string()
}
