//! Domain types shared across DeepResearch crates.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// PipelineState
// ---------------------------------------------------------------------------

/// The value threaded through the research → draft pipeline.
///
/// Each stage consumes a state and returns a new one with its own field
/// merged in. Fields are only serialized once populated, so a state printed
/// mid-run shows exactly which stages have completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineState {
    /// The user query. Set at pipeline start, never changed afterwards.
    pub query: String,

    /// Context gathered by the research stage. `Some("")` means the search
    /// found nothing, which is distinct from the stage not having run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub research: Option<String>,

    /// The composed answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

impl PipelineState {
    /// Start a new state holding only the query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            research: None,
            answer: None,
        }
    }

    /// Return this state with `research` set, keeping every other field.
    pub fn with_research(self, research: impl Into<String>) -> Self {
        Self {
            research: Some(research.into()),
            ..self
        }
    }

    /// Return this state with `answer` set, keeping every other field.
    pub fn with_answer(self, answer: impl Into<String>) -> Self {
        Self {
            answer: Some(answer.into()),
            ..self
        }
    }
}

// ---------------------------------------------------------------------------
// SearchResults
// ---------------------------------------------------------------------------

/// Structured output of a web search: a short synthesized summary plus the
/// text excerpts of each hit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    pub summary: String,
    pub excerpts: Vec<String>,
}

impl SearchResults {
    /// Flatten into the single context string handed to the draft stage:
    /// the summary, a blank line, then each excerpt on its own line.
    pub fn to_context(&self) -> String {
        let docs = self.excerpts.join("\n");
        format!("{}\n\n{docs}", self.summary).trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_only_has_query() {
        let state = PipelineState::new("what is rust?");
        assert_eq!(state.query, "what is rust?");
        assert!(state.research.is_none());
        assert!(state.answer.is_none());
    }

    #[test]
    fn merging_fields_keeps_prior_ones() {
        let state = PipelineState::new("q")
            .with_research("ctx")
            .with_answer("a");
        assert_eq!(state.query, "q");
        assert_eq!(state.research.as_deref(), Some("ctx"));
        assert_eq!(state.answer.as_deref(), Some("a"));
    }

    #[test]
    fn empty_research_is_distinct_from_absent() {
        let state = PipelineState::new("q").with_research("");
        assert_eq!(state.research.as_deref(), Some(""));
        assert_ne!(state, PipelineState::new("q"));
    }

    #[test]
    fn state_serializes_only_populated_fields() {
        let json = serde_json::to_string(&PipelineState::new("q")).unwrap();
        assert_eq!(json, r#"{"query":"q"}"#);

        let json = serde_json::to_string(&PipelineState::new("q").with_research("r")).unwrap();
        assert_eq!(json, r#"{"query":"q","research":"r"}"#);
    }

    #[test]
    fn context_joins_summary_and_excerpts() {
        let results = SearchResults {
            summary: "Rust is a language.".into(),
            excerpts: vec!["first".into(), "second".into()],
        };
        assert_eq!(results.to_context(), "Rust is a language.\n\nfirst\nsecond");
    }

    #[test]
    fn context_without_summary_is_trimmed() {
        let results = SearchResults {
            summary: String::new(),
            excerpts: vec!["only excerpt".into()],
        };
        assert_eq!(results.to_context(), "only excerpt");
        assert_eq!(SearchResults::default().to_context(), "");
    }
}
