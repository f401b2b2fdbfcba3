//! Request and response bodies of the Tavily `/search` endpoint.

use serde::{Deserialize, Serialize};

use deepresearch_shared::SearchResults;

/// JSON body posted to `/search`.
#[derive(Debug, Serialize)]
pub(crate) struct SearchRequest<'a> {
    pub query: &'a str,
    pub include_answer: bool,
    pub max_results: u32,
    pub search_depth: &'a str,
}

/// JSON body returned by `/search`. Only the fields we read are modelled.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub results: Vec<SearchHit>,
}

/// A single search hit.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchHit {
    #[serde(default)]
    pub content: Option<String>,
}

impl From<SearchResponse> for SearchResults {
    fn from(resp: SearchResponse) -> Self {
        Self {
            summary: resp.answer.unwrap_or_default(),
            excerpts: resp
                .results
                .into_iter()
                .map(|hit| hit.content.unwrap_or_default())
                .collect(),
        }
    }
}
