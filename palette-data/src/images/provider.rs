//! HTTP-backed `CandidateSource` for the Pexels and Unsplash search APIs.
//!
//! The [`CandidateSource`] trait is synchronous so sessions stay usable from
//! plain loops. This source bridges the async HTTP client to that interface
//! by blocking on a Tokio runtime internally.
//!
//! # Example
//!
//! ```no_run
//! use palette_core::CandidateSource;
//! use palette_data::images::{HttpImageSource, HttpImageSourceConfig, ImageApi};
//!
//! let config = HttpImageSourceConfig::new(ImageApi::Pexels, "my-api-key");
//! let source = HttpImageSource::with_config(config)?;
//! let items = source.fetch("harbour", 4)?;
//! for item in &items {
//!     println!("{item}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use log::{debug, warn};
use palette_core::{CandidateSource, Item, SourceError};
use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::Url;

use super::response::{ImageRecord, PexelsSearchResponse, UnsplashSearchResponse};

/// Default user agent for search requests.
pub const DEFAULT_USER_AGENT: &str = "palette-images/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Supported image search APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageApi {
    /// <https://www.pexels.com/api/>
    #[default]
    Pexels,
    /// <https://unsplash.com/developers>
    Unsplash,
}

impl ImageApi {
    /// Public endpoint used when no base URL is configured.
    #[must_use]
    pub const fn default_base_url(self) -> &'static str {
        match self {
            Self::Pexels => "https://api.pexels.com",
            Self::Unsplash => "https://api.unsplash.com",
        }
    }

    /// Largest page size the API accepts.
    #[must_use]
    pub const fn max_per_page(self) -> usize {
        match self {
            Self::Pexels => 80,
            Self::Unsplash => 30,
        }
    }

    const fn search_path(self) -> &'static str {
        match self {
            Self::Pexels => "v1/search",
            Self::Unsplash => "search/photos",
        }
    }

    /// Lowercase API name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pexels => "pexels",
            Self::Unsplash => "unsplash",
        }
    }
}

impl fmt::Display for ImageApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown API name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown image API {0:?}; expected pexels or unsplash")]
pub struct UnknownImageApi(pub String);

impl FromStr for ImageApi {
    type Err = UnknownImageApi;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pexels" => Ok(Self::Pexels),
            "unsplash" => Ok(Self::Unsplash),
            _ => Err(UnknownImageApi(value.to_owned())),
        }
    }
}

/// Error type for [`HttpImageSource`] construction failures.
#[derive(Debug, Error)]
pub enum SourceBuildError {
    /// No API key was configured.
    #[error("an API key is required for {api}")]
    MissingApiKey {
        /// API the key was needed for.
        api: ImageApi,
    },
    /// The base URL could not be parsed.
    #[error("invalid base URL {url:?}")]
    InvalidBaseUrl {
        /// Rejected URL.
        url: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime")]
    Runtime(#[source] std::io::Error),
}

/// Configuration for [`HttpImageSource`].
#[derive(Clone)]
pub struct HttpImageSourceConfig {
    /// API to query.
    pub api: ImageApi,
    /// Pexels API key or Unsplash access key.
    pub api_key: String,
    /// Base URL for the API (e.g., `"https://api.pexels.com"`).
    pub base_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl fmt::Debug for HttpImageSourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpImageSourceConfig")
            .field("api", &self.api)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl HttpImageSourceConfig {
    /// Create a configuration for `api` using its public endpoint.
    #[must_use]
    pub fn new(api: ImageApi, api_key: impl Into<String>) -> Self {
        Self {
            api,
            api_key: api_key.into(),
            base_url: api.default_base_url().to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Point the source at a different endpoint, such as a local mock.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Image search client implementing [`CandidateSource`].
///
/// Every returned item carries a single tag: the query that found it.
///
/// # Runtime behaviour
///
/// When called from outside any Tokio runtime, the source uses its own
/// stored runtime. When called from within an existing multi-threaded Tokio
/// runtime (detected via [`Handle::try_current()`] and
/// [`RuntimeFlavor::MultiThread`]), it uses that runtime's handle with
/// [`tokio::task::block_in_place`] to avoid nested runtime panics.
///
/// When called from within a `current_thread` Tokio runtime, the source
/// falls back to its own internal runtime, which may deadlock if the
/// caller's runtime is driving IO this request depends on.
pub struct HttpImageSource {
    client: Client,
    config: HttpImageSourceConfig,
    endpoint: Url,
    runtime: Runtime,
}

impl fmt::Debug for HttpImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpImageSource")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("endpoint", &self.endpoint.as_str())
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl HttpImageSource {
    /// Create a source for `api` with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is blank or the HTTP client or Tokio
    /// runtime fails to build.
    pub fn new(api: ImageApi, api_key: impl Into<String>) -> Result<Self, SourceBuildError> {
        Self::with_config(HttpImageSourceConfig::new(api, api_key))
    }

    /// Create a source with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is blank, the base URL is invalid, or the
    /// HTTP client or Tokio runtime fails to build.
    pub fn with_config(config: HttpImageSourceConfig) -> Result<Self, SourceBuildError> {
        if config.api_key.trim().is_empty() {
            return Err(SourceBuildError::MissingApiKey { api: config.api });
        }
        let endpoint = build_endpoint(&config)?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(SourceBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(SourceBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            endpoint,
            runtime,
        })
    }

    /// API this source queries.
    #[must_use]
    pub const fn api(&self) -> ImageApi {
        self.config.api
    }

    /// Build the search URL for `query`.
    ///
    /// Unsplash expects the access key as a `client_id` parameter; Pexels
    /// receives it in the `Authorization` header instead.
    fn build_search_url(&self, query: &str, per_page: usize) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("query", query)
                .append_pair("per_page", &per_page.to_string());
            if self.config.api == ImageApi::Unsplash {
                pairs.append_pair("client_id", &self.config.api_key);
            }
        }
        url
    }

    /// Fetch and decode one page of results asynchronously.
    async fn fetch_records_async(
        &self,
        query: &str,
        per_page: usize,
    ) -> Result<Vec<ImageRecord>, SourceError> {
        let url = self.build_search_url(query, per_page);
        let mut request = self.client.get(url);
        if self.config.api == ImageApi::Pexels {
            request = request.header(AUTHORIZATION, &self.config.api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(err))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(err))?;

        match self.config.api {
            ImageApi::Pexels => response
                .json::<PexelsSearchResponse>()
                .await
                .map(PexelsSearchResponse::into_records),
            ImageApi::Unsplash => response
                .json::<UnsplashSearchResponse>()
                .await
                .map(UnsplashSearchResponse::into_records),
        }
        .map_err(|err| SourceError::ParseError {
            message: err.without_url().to_string(),
        })
    }

    /// Convert a reqwest error to a `SourceError`.
    ///
    /// The reported URL omits the query string so access keys never reach
    /// error messages or logs.
    fn convert_reqwest_error(&self, error: reqwest::Error) -> SourceError {
        let url = self.endpoint.as_str().to_owned();

        if error.is_timeout() {
            return SourceError::Timeout {
                url,
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return SourceError::HttpError {
                url,
                status: status.as_u16(),
                message: error.without_url().to_string(),
            };
        }

        SourceError::NetworkError {
            url,
            message: error.without_url().to_string(),
        }
    }
}

fn build_endpoint(config: &HttpImageSourceConfig) -> Result<Url, SourceBuildError> {
    let base = format!("{}/", config.base_url.trim_end_matches('/'));
    Url::parse(&base)
        .and_then(|root| root.join(config.api.search_path()))
        .map_err(|source| SourceBuildError::InvalidBaseUrl {
            url: config.base_url.clone(),
            source,
        })
}

/// Turn decoded records into items tagged with `query`.
///
/// Records without a URL or with a blank id are skipped with a warning.
fn records_into_items(records: Vec<ImageRecord>, query: &str, limit: usize) -> Vec<Item> {
    records
        .into_iter()
        .filter_map(|record| {
            let Some(url) = record.url else {
                warn!("skipping search result {} without an image URL", record.id);
                return None;
            };
            match Item::new(record.id, url, [query]) {
                Ok(item) => Some(item),
                Err(err) => {
                    warn!("skipping malformed search result: {err}");
                    None
                }
            }
        })
        .take(limit)
        .collect()
}

impl CandidateSource for HttpImageSource {
    /// Search for up to `limit` images matching `query`.
    ///
    /// # Runtime requirements
    ///
    /// When called from within an existing Tokio runtime, the runtime must be
    /// multi-threaded (`flavor = "multi_thread"`). Inside a `current_thread`
    /// runtime the source falls back to its own internal runtime.
    fn fetch(&self, query: &str, limit: usize) -> Result<Vec<Item>, SourceError> {
        let term = query.trim();
        if term.is_empty() {
            return Err(SourceError::EmptyQuery);
        }
        if limit == 0 {
            return Ok(Vec::new());
        }

        let per_page = limit.min(self.config.api.max_per_page());
        debug!("searching {} for {term:?} ({per_page} per page)", self.config.api);
        let future = self.fetch_records_async(term, per_page);
        let records = match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            // No runtime detected, or current_thread runtime: use our own runtime.
            _ => self.runtime.block_on(future),
        }?;
        Ok(records_into_items(records, term, limit))
    }
}
