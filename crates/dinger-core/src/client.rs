// Fetch boundary: the `LineupSource` seam and its reqwest implementation
// against the projections backend (`GET {base_url}/lineups[?test=true]`).

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;
use crate::projection::PlayerProjection;

// ---------------------------------------------------------------------------
// DataSource
// ---------------------------------------------------------------------------

/// Which backend dataset to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    #[default]
    Live,
    Test,
}

impl DataSource {
    pub fn toggled(self) -> DataSource {
        match self {
            DataSource::Live => DataSource::Test,
            DataSource::Test => DataSource::Live,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DataSource::Live => "LIVE",
            DataSource::Test => "TEST",
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure: connect, timeout, or reading the body.
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-success status.
    #[error("backend returned HTTP {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// The body was not a JSON array of lineup records.
    #[error("malformed lineup response from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// Network-class failures (transport and bad status) versus body
    /// parsing failures. Both render the same to the user.
    pub fn is_network(&self) -> bool {
        matches!(self, FetchError::Network { .. } | FetchError::Status { .. })
    }
}

// ---------------------------------------------------------------------------
// LineupSource
// ---------------------------------------------------------------------------

/// Anything that can produce a lineup batch.
#[async_trait]
pub trait LineupSource: Send + Sync {
    async fn fetch_lineups(&self, source: DataSource) -> Result<Vec<PlayerProjection>, FetchError>;
}

/// Parse a `/lineups` response body.
pub fn parse_lineups(body: &[u8]) -> Result<Vec<PlayerProjection>, serde_json::Error> {
    serde_json::from_slice(body)
}

// ---------------------------------------------------------------------------
// HttpLineupClient
// ---------------------------------------------------------------------------

/// reqwest-backed client for the projections backend.
#[derive(Debug, Clone)]
pub struct HttpLineupClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpLineupClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = Self::new(
            &config.backend.base_url,
            Duration::from_secs(config.backend.timeout_secs),
        )?;
        info!("Lineup client targeting {}", client.base_url);
        Ok(client)
    }

    pub fn lineups_url(&self) -> String {
        format!("{}/lineups", self.base_url)
    }
}

#[async_trait]
impl LineupSource for HttpLineupClient {
    async fn fetch_lineups(&self, source: DataSource) -> Result<Vec<PlayerProjection>, FetchError> {
        let url = self.lineups_url();
        let mut request = self.http.get(&url);
        if source == DataSource::Test {
            request = request.query(&[("test", "true")]);
        }
        debug!(%url, ?source, "fetching lineups");

        let response = request.send().await.map_err(|e| FetchError::Network {
            url: url.clone(),
            source: e,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url, status });
        }

        let body = response.bytes().await.map_err(|e| FetchError::Network {
            url: url.clone(),
            source: e,
        })?;

        let records = parse_lineups(&body).map_err(|e| FetchError::Parse { url, source: e })?;
        debug!(count = records.len(), "lineups parsed");
        Ok(records)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
