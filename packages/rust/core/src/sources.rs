//! Alternate query sources: a local file or the body of a web page.
//!
//! Either one can stand in for a typed query. The loaded text goes through
//! the same validation as any other query.

use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info, instrument};
use url::Url;

use deepresearch_shared::{DeepResearchError, Result};

/// Maximum number of redirects to follow when fetching a page.
const MAX_REDIRECTS: usize = 5;

/// User-Agent string for page fetches.
const USER_AGENT: &str = concat!("DeepResearch/", env!("CARGO_PKG_VERSION"));

/// Read a query from a UTF-8 text file.
pub fn read_query_file(path: &Path) -> Result<String> {
    let content = std::fs::read_to_string(path).map_err(|e| DeepResearchError::io(path, e))?;
    debug!(path = %path.display(), bytes = content.len(), "read query file");
    Ok(content)
}

/// Fetch a URL and return its body as text. Non-2xx responses are errors
/// naming the HTTP status.
#[instrument(skip_all, fields(url = %url))]
pub async fn fetch_url_text(url: &Url, timeout_secs: u64) -> Result<String> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| DeepResearchError::Network(format!("failed to build HTTP client: {e}")))?;

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| DeepResearchError::Network(format!("{url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(DeepResearchError::Network(format!(
            "error fetching data from {url}: HTTP {status}"
        )));
    }

    let body = response
        .text()
        .await
        .map_err(|e| DeepResearchError::Network(format!("{url}: failed to read body: {e}")))?;

    info!(bytes = body.len(), "fetched page");
    Ok(body)
}
