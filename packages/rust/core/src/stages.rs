//! The two pipeline stages and the collaborator traits they wrap.
//!
//! A stage takes a [`PipelineState`] by value and returns a new one with its
//! own field merged in. The research stage never fails: a search error turns
//! into a placeholder context string. The draft stage propagates every
//! composer error to the caller.

use std::future::Future;

use tracing::{debug, instrument, warn};

use deepresearch_shared::{DeepResearchError, PipelineState, Result, SearchResults};

/// Context substituted when the search service rejects the API key.
pub const INVALID_KEY_CONTEXT: &str =
    "Error: The API key is invalid or missing. Please check your API key.";

// ---------------------------------------------------------------------------
// Collaborator traits
// ---------------------------------------------------------------------------

/// Anything that can look up web context for a query.
pub trait ContextFetcher: Send + Sync {
    fn search(&self, query: &str) -> impl Future<Output = Result<SearchResults>> + Send;
}

/// Anything that can turn a prompt into an answer.
pub trait AnswerComposer: Send + Sync {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send;
}

/// One step of the pipeline.
pub trait Stage: Send + Sync {
    /// Name used in logs and progress output.
    fn name(&self) -> &'static str;

    fn execute(&self, state: PipelineState)
    -> impl Future<Output = Result<PipelineState>> + Send;
}

// ---------------------------------------------------------------------------
// ResearchStage
// ---------------------------------------------------------------------------

/// Fills `research` with web context for the query.
#[derive(Debug, Clone)]
pub struct ResearchStage<F> {
    fetcher: F,
}

impl<F: ContextFetcher> ResearchStage<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }
}

impl<F: ContextFetcher> Stage for ResearchStage<F> {
    fn name(&self) -> &'static str {
        "research"
    }

    #[instrument(skip_all, fields(stage = "research"))]
    async fn execute(&self, state: PipelineState) -> Result<PipelineState> {
        let research = match self.fetcher.search(&state.query).await {
            Ok(results) => results.to_context(),
            Err(e) => {
                warn!(error = %e, "web research failed, continuing without context");
                degraded_context(&e)
            }
        };

        debug!(research_len = research.len(), "research stage complete");
        Ok(state.with_research(research))
    }
}

/// The human-readable placeholder used in place of real context.
pub fn degraded_context(err: &DeepResearchError) -> String {
    match err {
        DeepResearchError::InvalidCredentials { .. } => INVALID_KEY_CONTEXT.to_string(),
        other => format!("Error: web research failed: {other}"),
    }
}

// ---------------------------------------------------------------------------
// DraftStage
// ---------------------------------------------------------------------------

/// Fills `answer` by asking the composer to answer the query from the research.
#[derive(Debug, Clone)]
pub struct DraftStage<C> {
    composer: C,
}

impl<C: AnswerComposer> DraftStage<C> {
    pub fn new(composer: C) -> Self {
        Self { composer }
    }

    pub fn composer(&self) -> &C {
        &self.composer
    }
}

impl<C: AnswerComposer> Stage for DraftStage<C> {
    fn name(&self) -> &'static str {
        "draft"
    }

    #[instrument(skip_all, fields(stage = "draft"))]
    async fn execute(&self, state: PipelineState) -> Result<PipelineState> {
        let research = state
            .research
            .as_deref()
            .ok_or(DeepResearchError::MissingField { field: "research" })?;

        let prompt = build_prompt(&state.query, research);
        let response = self.composer.generate(&prompt).await?;

        debug!(answer_len = response.len(), "draft stage complete");
        let answer = response.trim().to_string();
        Ok(state.with_answer(answer))
    }
}

/// Lay out the research context and query under fixed section markers.
pub fn build_prompt(query: &str, research: &str) -> String {
    format!(
        "
You are a highly intelligent AI expert. Use the context below to answer the user's query clearly and comprehensively.

=== CONTEXT ===
{research}

=== QUERY ===
{query}

=== ANSWER ===
"
    )
}
