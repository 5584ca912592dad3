//! Latest release discovery
//!
//! The latest release tag is published as a plain-text document. Discovery
//! tries a bounded number of times and then settles on a fixed fallback, so
//! callers always get a version.

use async_trait::async_trait;
use edgeadm_types::constants::RETRY_TIMES;
use edgeadm_types::{DownloadEndpoints, Region};
use semver::Version;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Version used when discovery gives up
pub const DEFAULT_VERSION: Version = Version::new(1, 10, 0);

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Version fetch errors
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("empty response")]
    Empty,
}

/// Source of the latest release tag (raw text, e.g. `v1.12.1`)
#[async_trait]
pub trait VersionSource: Send + Sync {
    async fn fetch_latest(&self) -> Result<String, FetchError>;
}

/// Fetches the latest release tag over HTTP
#[derive(Debug, Clone)]
pub struct HttpVersionSource {
    client: reqwest::Client,
    url: String,
}

impl HttpVersionSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn for_region(region: Region) -> Self {
        Self::new(DownloadEndpoints::for_region(region).latest_version_url)
    }
}

#[async_trait]
impl VersionSource for HttpVersionSource {
    async fn fetch_latest(&self) -> Result<String, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(FetchError::Empty);
        }
        Ok(body)
    }
}

/// Where a discovered version came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionOrigin {
    Latest,
    Fallback,
}

/// Result of version discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredVersion {
    pub version: Version,
    pub origin: VersionOrigin,
}

impl fmt::Display for DiscoveredVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.version)
    }
}

/// Bounded retry with a fixed fallback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub fallback: Version,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: RETRY_TIMES,
            fallback: DEFAULT_VERSION,
        }
    }
}

impl RetryPolicy {
    /// Ask `source` for the latest version, falling back once attempts run out
    ///
    /// Empty and unparseable responses count as failed attempts.
    pub async fn resolve(&self, source: &dyn VersionSource) -> DiscoveredVersion {
        for attempt in 1..=self.max_attempts {
            match source.fetch_latest().await {
                Ok(raw) => match parse_tag(&raw) {
                    Some(version) => {
                        info!(%version, attempt, "Discovered latest release");
                        return DiscoveredVersion {
                            version,
                            origin: VersionOrigin::Latest,
                        };
                    }
                    None => warn!(attempt, response = raw.trim(), "Unparseable release tag"),
                },
                Err(e) => warn!(attempt, error = %e, "Failed to fetch latest release"),
            }
        }

        warn!(fallback = %self.fallback, "Using fallback release");
        DiscoveredVersion {
            version: self.fallback.clone(),
            origin: VersionOrigin::Fallback,
        }
    }
}

fn parse_tag(raw: &str) -> Option<Version> {
    let tag = raw.trim();
    if tag.is_empty() {
        return None;
    }
    Version::parse(tag.strip_prefix('v').unwrap_or(tag)).ok()
}
