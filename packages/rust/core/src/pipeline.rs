//! End-to-end `ask` pipeline: query → research → draft → answer.

use std::time::Instant;

use tracing::{info, instrument};

use deepresearch_shared::{DeepResearchError, PipelineState, Result};

use crate::stages::{AnswerComposer, ContextFetcher, DraftStage, ResearchStage, Stage};

/// Progress callback for reporting pipeline status.
pub trait PipelineProgress: Send + Sync {
    /// Called right before a stage starts.
    fn stage_started(&self, name: &str);
    /// Called once a stage has returned successfully.
    fn stage_finished(&self, name: &str);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl PipelineProgress for SilentProgress {
    fn stage_started(&self, _name: &str) {}
    fn stage_finished(&self, _name: &str) {}
}

/// Reject empty or whitespace-only queries. Returns the trimmed query.
pub fn validate_query(query: &str) -> Result<&str> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(DeepResearchError::invalid_input("please enter a query"));
    }
    Ok(trimmed)
}

/// The research → draft pipeline.
///
/// Stages always run in that order, one after the other. A failed search
/// still flows into the draft stage as placeholder context.
#[derive(Debug, Clone)]
pub struct Pipeline<F, C> {
    research: ResearchStage<F>,
    draft: DraftStage<C>,
}

impl<F: ContextFetcher, C: AnswerComposer> Pipeline<F, C> {
    pub fn new(fetcher: F, composer: C) -> Self {
        Self {
            research: ResearchStage::new(fetcher),
            draft: DraftStage::new(composer),
        }
    }

    /// The context fetcher behind the research stage.
    pub fn fetcher(&self) -> &F {
        self.research.fetcher()
    }

    /// The answer composer behind the draft stage.
    pub fn composer(&self) -> &C {
        self.draft.composer()
    }

    /// Run both stages and return the answer.
    pub async fn run(&self, query: &str) -> Result<String> {
        self.run_with_progress(query, &SilentProgress).await
    }

    /// Run both stages, reporting progress, and return the answer.
    pub async fn run_with_progress(
        &self,
        query: &str,
        progress: &dyn PipelineProgress,
    ) -> Result<String> {
        let state = self.run_state(query, progress).await?;
        state
            .answer
            .ok_or(DeepResearchError::MissingField { field: "answer" })
    }

    /// Run both stages and return the final state.
    #[instrument(skip_all, fields(query_len = query.len()))]
    pub async fn run_state(
        &self,
        query: &str,
        progress: &dyn PipelineProgress,
    ) -> Result<PipelineState> {
        let query = validate_query(query)?;
        let start = Instant::now();

        info!("starting research pipeline");

        let state = PipelineState::new(query);
        let state = run_stage(&self.research, state, progress).await?;
        let state = run_stage(&self.draft, state, progress).await?;

        info!(elapsed_ms = start.elapsed().as_millis() as u64, "pipeline complete");
        Ok(state)
    }
}

async fn run_stage<S: Stage>(
    stage: &S,
    state: PipelineState,
    progress: &dyn PipelineProgress,
) -> Result<PipelineState> {
    progress.stage_started(stage.name());
    let state = stage.execute(state).await?;
    progress.stage_finished(stage.name());
    Ok(state)
}
