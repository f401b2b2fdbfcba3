//! Core pipeline orchestration for DeepResearch.
//!
//! This crate ties web search, answer drafting, and plain-text rendering
//! into the end-to-end `ask` workflow.

pub mod pipeline;
pub mod providers;
pub mod sources;
pub mod stages;

pub use pipeline::{Pipeline, PipelineProgress, SilentProgress, validate_query};
pub use providers::{WebPipeline, pipeline_from_config};
pub use stages::{AnswerComposer, ContextFetcher, DraftStage, ResearchStage, Stage};

use deepresearch_shared::Result;

/// Answer `query` and render the answer as plain text.
pub async fn run_query<F, C>(pipeline: &Pipeline<F, C>, query: &str) -> Result<String>
where
    F: ContextFetcher,
    C: AnswerComposer,
{
    let answer = pipeline.run(query).await?;
    Ok(render_markup(&answer))
}

/// Render Markdown as plain text without running the pipeline.
pub fn render_markup(text: &str) -> String {
    deepresearch_markdown::render_plain_text(text)
}
