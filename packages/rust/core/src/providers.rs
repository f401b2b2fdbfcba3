//! Wiring of the concrete HTTP clients into the pipeline's collaborator traits.

use deepresearch_llm::GeminiClient;
use deepresearch_search::TavilyClient;
use deepresearch_shared::{AppConfig, Result, SearchResults};
use tracing::info;

use crate::pipeline::Pipeline;
use crate::stages::{AnswerComposer, ContextFetcher};

impl ContextFetcher for TavilyClient {
    async fn search(&self, query: &str) -> Result<SearchResults> {
        TavilyClient::search(self, query).await
    }
}

impl AnswerComposer for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        GeminiClient::generate(self, prompt).await
    }
}

/// The production pipeline: Tavily for research, Gemini for drafting.
pub type WebPipeline = Pipeline<TavilyClient, GeminiClient>;

/// Build the production pipeline from config. Fails if the LLM API key env
/// var is missing. A missing search key still builds; research then degrades
/// to the missing-key context.
pub fn pipeline_from_config(config: &AppConfig) -> Result<WebPipeline> {
    let fetcher = TavilyClient::from_config(config)?;
    let composer = GeminiClient::from_config(config)?;
    info!(model = %composer.model(), "pipeline configured");
    Ok(Pipeline::new(fetcher, composer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use deepresearch_llm::GeminiOptions;
    use deepresearch_search::SearchOptions;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn pipeline_for(server: &MockServer) -> WebPipeline {
        let fetcher = TavilyClient::new(
            "tvly-test",
            SearchOptions {
                base_url: server.uri(),
                max_results: 2,
                search_depth: "basic".into(),
                timeout_secs: 5,
            },
        )
        .unwrap();
        let composer = GeminiClient::new(
            "gem-test",
            GeminiOptions {
                base_url: server.uri(),
                model: "gemini-test".into(),
                timeout_secs: 5,
            },
        )
        .unwrap();
        Pipeline::new(fetcher, composer)
    }

    fn gemini_reply(text: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": text}]}}]
        }))
    }

    #[tokio::test]
    async fn test_pipeline_over_http() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "answer": "Tokio is an async runtime.",
                "results": [{"url": "https://tokio.rs", "content": "Tokio docs."}]
            })))
            .expect(2)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-test:generateContent"))
            .respond_with(gemini_reply("\n# Tokio\nIt runs **futures**.\n"))
            .expect(2)
            .mount(&server)
            .await;

        let pipeline = pipeline_for(&server);
        let answer = pipeline.run("what is tokio").await.unwrap();
        assert_eq!(answer, "# Tokio\nIt runs **futures**.");

        let rendered = crate::run_query(&pipeline, "what is tokio").await.unwrap();
        assert!(rendered.contains("TOKIO"));
        assert!(rendered.ends_with("It runs FUTURES."));
    }

    #[tokio::test]
    async fn test_rejected_search_key_still_answers() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-test:generateContent"))
            .respond_with(gemini_reply("answer without context"))
            .expect(1)
            .mount(&server)
            .await;

        let pipeline = pipeline_for(&server);
        let state = pipeline
            .run_state("q", &crate::SilentProgress)
            .await
            .unwrap();
        assert_eq!(
            state.research.as_deref(),
            Some(crate::stages::INVALID_KEY_CONTEXT)
        );
        assert_eq!(state.answer.as_deref(), Some("answer without context"));
    }

    #[tokio::test]
    async fn test_missing_search_key_still_answers() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-test:generateContent"))
            .respond_with(gemini_reply("answer without context"))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = AppConfig::default();
        config.search.api_key_env = "DR_TEST_UNSET_SEARCH_KEY_24680".into();
        config.search.base_url = server.uri();
        // PATH is always set, so it stands in for a configured LLM key.
        config.llm.api_key_env = "PATH".into();
        config.llm.base_url = server.uri();
        config.llm.model = "gemini-test".into();

        let pipeline = pipeline_from_config(&config).unwrap();
        assert!(!pipeline.fetcher().has_api_key());

        let state = pipeline
            .run_state("q", &crate::SilentProgress)
            .await
            .unwrap();
        assert_eq!(
            state.research.as_deref(),
            Some(crate::stages::INVALID_KEY_CONTEXT)
        );
        assert_eq!(state.answer.as_deref(), Some("answer without context"));
    }

    #[tokio::test]
    async fn test_composer_quota_error_is_terminal() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"results": []})),
            )
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-test:generateContent"))
            .respond_with(ResponseTemplate::new(429))
            .expect(1)
            .mount(&server)
            .await;

        let err = pipeline_for(&server).run("q").await.unwrap_err();
        assert!(err.to_string().contains("quota"));
    }
}
