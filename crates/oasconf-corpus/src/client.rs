//! Corpus directory client and document fetcher.
//!
//! The directory service (apis.guru by default) serves a single JSON object
//! keyed by API name; each value names a preferred version and a map of
//! version metadata. The client resolves every listed API to a
//! [`CorpusEntry`] for its preferred version and rewrites the spec URL into
//! a browsable GitHub deep-link base.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use oasconf_core::model::{CorpusEntry, CorpusMap};

/// Default corpus directory listing.
pub const APIS_GURU_LIST_URL: &str = "https://api.apis.guru/v2/list.json";

/// Hosted spec URL prefix, rewritten to `BROWSE_URL_PREFIX` for deep links.
const SPEC_URL_PREFIX: &str = "https://api.apis.guru/v2/specs/";
const BROWSE_URL_PREFIX: &str = "https://github.com/APIs-guru/openapi-directory/blob/main/APIs/";

/// Error fetching the corpus listing or a document.
///
/// All variants are fatal to a run: the harness fails fast rather than
/// producing a partial report.
#[derive(Error, Debug)]
pub enum CorpusError {
    /// The request could not be sent or the response body not read.
    #[error("HTTP error fetching {url}: {source}")]
    Transport {
        /// Endpoint that failed.
        url: String,
        /// Underlying transport error.
        source: reqwest::Error,
    },

    /// The endpoint answered with a non-2xx status.
    #[error("{url} returned HTTP {status}")]
    Status {
        /// Endpoint that failed.
        url: String,
        /// HTTP status code received.
        status: u16,
    },

    /// The listing body did not decode as the directory format.
    #[error("failed to decode corpus listing from {url}: {source}")]
    Decode {
        /// Endpoint that failed.
        url: String,
        /// Underlying decode error.
        source: reqwest::Error,
    },
}

/// Directory listing value: preferred version label plus per-version data.
#[derive(Debug, Deserialize)]
struct ListedApi {
    preferred: String,
    versions: BTreeMap<String, ListedVersion>,
}

/// Per-version metadata as served by the directory.
#[derive(Debug, Deserialize)]
struct ListedVersion {
    #[serde(rename = "openapiVer")]
    openapi_ver: String,
    #[serde(rename = "swaggerYamlUrl")]
    swagger_yaml_url: String,
    #[serde(rename = "swaggerUrl")]
    swagger_url: String,
    updated: DateTime<Utc>,
}

/// HTTP client for the corpus directory service.
///
/// The listing URL is injectable so integration tests can point the client
/// at a mock server. No timeout is configured here: timeout policy belongs
/// to the fetch mechanism, and full-corpus runs legitimately take a while.
#[derive(Debug, Clone)]
pub struct CorpusClient {
    http: reqwest::Client,
    list_url: String,
}

impl Default for CorpusClient {
    fn default() -> Self {
        Self::new(APIS_GURU_LIST_URL)
    }
}

impl CorpusClient {
    /// Create a client against the given directory listing URL.
    pub fn new(list_url: impl Into<String>) -> Self {
        Self { http: reqwest::Client::new(), list_url: list_url.into() }
    }

    /// Fetch and decode the directory listing into a corpus map.
    ///
    /// Each API resolves to its preferred version. Listed APIs whose
    /// preferred version is missing from their version map are skipped with
    /// a warning — a malformed directory row should not sink a run the way
    /// a transport fault does.
    pub async fn fetch_listing(&self) -> Result<CorpusMap, CorpusError> {
        let response = self.get(&self.list_url).await?;
        let listing: BTreeMap<String, ListedApi> =
            response.json().await.map_err(|source| CorpusError::Decode {
                url: self.list_url.clone(),
                source,
            })?;

        let mut corpus = CorpusMap::new();
        for (name, api) in listing {
            let Some(version) = api.versions.get(&api.preferred) else {
                tracing::warn!(
                    name,
                    preferred = api.preferred,
                    "listing has no metadata for its preferred version; skipping"
                );
                continue;
            };
            corpus.insert(
                name.clone(),
                CorpusEntry {
                    name,
                    api_version: api.preferred.clone(),
                    open_api_version: version.openapi_ver.clone(),
                    yaml_url: version.swagger_yaml_url.clone(),
                    json_url: version.swagger_url.clone(),
                    source_browse_url: browse_url(&version.swagger_yaml_url),
                    updated: version.updated,
                },
            );
        }
        tracing::debug!(size = corpus.len(), "fetched corpus listing");
        Ok(corpus)
    }

    /// Fetch the raw text of one document.
    pub async fn fetch_document(&self, url: &str) -> Result<String, CorpusError> {
        let response = self.get(url).await?;
        response
            .text()
            .await
            .map_err(|source| CorpusError::Transport { url: url.to_string(), source })
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, CorpusError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| CorpusError::Transport { url: url.to_string(), source })?;
        let status = response.status();
        if !status.is_success() {
            return Err(CorpusError::Status { url: url.to_string(), status: status.as_u16() });
        }
        Ok(response)
    }
}

/// Rewrite a hosted spec URL into its browsable GitHub counterpart.
///
/// URLs outside the known hosting prefix pass through unchanged; the deep
/// link then points at the raw document, which is still useful.
fn browse_url(yaml_url: &str) -> String {
    match yaml_url.strip_prefix(SPEC_URL_PREFIX) {
        Some(rest) => format!("{BROWSE_URL_PREFIX}{rest}"),
        None => yaml_url.to_string(),
    }
}
