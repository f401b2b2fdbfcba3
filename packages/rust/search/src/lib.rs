//! Web search client backed by the Tavily search API.
//!
//! The research stage asks this client for context about the user's query.
//! Tavily returns a synthesized answer plus the text content of each hit,
//! which we hand back as [`SearchResults`].

mod wire;

use std::time::Duration;

use deepresearch_shared::{AppConfig, DeepResearchError, Result, SearchResults, read_api_key};
use reqwest::{Client, StatusCode};
use tracing::{debug, info, instrument, warn};

use wire::{SearchRequest, SearchResponse};

/// Service name used in credential errors.
const SERVICE: &str = "tavily";

/// User-Agent string for search requests.
const USER_AGENT: &str = concat!("DeepResearch/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Configuration for the search client.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Base URL of the API (no trailing slash needed).
    pub base_url: String,
    /// Maximum number of hits to request.
    pub max_results: u32,
    /// "basic" or "advanced".
    pub search_depth: String,
    /// Timeout for HTTP requests in seconds.
    pub timeout_secs: u64,
}

impl From<&AppConfig> for SearchOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            base_url: config.search.base_url.clone(),
            max_results: config.search.max_results,
            search_depth: config.search.search_depth.clone(),
            timeout_secs: config.http.timeout_secs,
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Tavily API client.
#[derive(Debug, Clone)]
pub struct TavilyClient {
    client: Client,
    /// `None` when no key was configured; every search then fails as
    /// invalid credentials.
    api_key: Option<String>,
    opts: SearchOptions,
}

impl TavilyClient {
    /// Build a client with an explicit API key.
    pub fn new(api_key: impl Into<String>, opts: SearchOptions) -> Result<Self> {
        Self::build(Some(api_key.into()), opts)
    }

    /// Build a client with no API key. Searches fail with
    /// [`DeepResearchError::InvalidCredentials`] without touching the network.
    pub fn without_key(opts: SearchOptions) -> Result<Self> {
        Self::build(None, opts)
    }

    fn build(api_key: Option<String>, opts: SearchOptions) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(opts.timeout_secs))
            .build()
            .map_err(|e| DeepResearchError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            opts,
        })
    }

    /// Build a client from the app config, reading the key from its env var.
    /// A missing key yields a keyless client rather than an error.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let opts = SearchOptions::from(config);
        match read_api_key(&config.search.api_key_env) {
            Ok(api_key) => Self::new(api_key, opts),
            Err(e) => {
                warn!(error = %e, "no search API key, web research will be skipped");
                Self::without_key(opts)
            }
        }
    }

    /// Whether an API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Search the web for `query`.
    ///
    /// A rejected API key surfaces as [`DeepResearchError::InvalidCredentials`]
    /// so callers can tell it apart from transient failures.
    #[instrument(skip(self), fields(depth = %self.opts.search_depth))]
    pub async fn search(&self, query: &str) -> Result<SearchResults> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(DeepResearchError::invalid_credentials(SERVICE));
        };

        let url = format!("{}/search", self.opts.base_url.trim_end_matches('/'));
        let body = SearchRequest {
            query,
            include_answer: true,
            max_results: self.opts.max_results,
            search_depth: &self.opts.search_depth,
        };

        debug!(%url, "sending search request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| DeepResearchError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(DeepResearchError::invalid_credentials(SERVICE));
        }
        if !status.is_success() {
            return Err(DeepResearchError::Network(format!("{url}: HTTP {status}")));
        }

        let text = response
            .text()
            .await
            .map_err(|e| DeepResearchError::Network(format!("{url}: failed to read body: {e}")))?;

        let parsed: SearchResponse = serde_json::from_str(&text).map_err(|e| {
            DeepResearchError::parse(format!(
                "invalid search response: {e} (got: {})",
                text.chars().take(200).collect::<String>()
            ))
        })?;

        let results = SearchResults::from(parsed);
        info!(
            hits = results.excerpts.len(),
            has_summary = !results.summary.is_empty(),
            "search complete"
        );

        Ok(results)
    }
}
