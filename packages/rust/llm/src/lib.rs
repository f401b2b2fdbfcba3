//! Language model client backed by the Gemini `generateContent` API.
//!
//! The draft stage sends one prompt and expects one text answer back. Every
//! failure (rejected key, quota, transport, unusable body) is returned as an
//! error; nothing here retries.

mod wire;

use std::time::Duration;

use deepresearch_shared::{AppConfig, DeepResearchError, Result, read_api_key};
use reqwest::{Client, StatusCode};
use tracing::{debug, info, instrument};

use wire::{GenerateRequest, GenerateResponse};

/// Service name used in credential errors.
const SERVICE: &str = "gemini";

/// User-Agent string for model requests.
const USER_AGENT: &str = concat!("DeepResearch/", env!("CARGO_PKG_VERSION"));

/// Configuration for the Gemini client.
#[derive(Debug, Clone)]
pub struct GeminiOptions {
    /// Base URL of the API.
    pub base_url: String,
    /// Model name, with or without the `models/` prefix.
    pub model: String,
    /// Timeout for HTTP requests in seconds.
    pub timeout_secs: u64,
}

impl From<&AppConfig> for GeminiOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            base_url: config.llm.base_url.clone(),
            model: config.llm.model.clone(),
            timeout_secs: config.http.timeout_secs,
        }
    }
}

/// Gemini API client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    opts: GeminiOptions,
}

impl GeminiClient {
    /// Build a client with an explicit API key.
    pub fn new(api_key: impl Into<String>, opts: GeminiOptions) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(opts.timeout_secs))
            .build()
            .map_err(|e| DeepResearchError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            opts,
        })
    }

    /// Build a client from the app config, reading the key from its env var.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let api_key = read_api_key(&config.llm.api_key_env)?;
        Self::new(api_key, GeminiOptions::from(config))
    }

    /// The model this client talks to.
    pub fn model(&self) -> &str {
        &self.opts.model
    }

    fn endpoint(&self) -> String {
        let model = self.opts.model.trim_start_matches("models/");
        format!(
            "{}/v1beta/models/{model}:generateContent",
            self.opts.base_url.trim_end_matches('/')
        )
    }

    /// Send a single user prompt and return the model's text reply.
    #[instrument(skip_all, fields(model = %self.opts.model, prompt_len = prompt.len()))]
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let url = self.endpoint();
        debug!(%url, "sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&GenerateRequest::user_prompt(prompt))
            .send()
            .await
            .map_err(|e| DeepResearchError::Composer(format!("request to {SERVICE} failed: {e}")))?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(DeepResearchError::invalid_credentials(SERVICE));
            }
            StatusCode::TOO_MANY_REQUESTS => {
                return Err(DeepResearchError::Composer(format!(
                    "{SERVICE} quota exceeded (HTTP {status})"
                )));
            }
            s if !s.is_success() => {
                let body = response.text().await.unwrap_or_default();
                return Err(DeepResearchError::Composer(format!(
                    "{SERVICE} returned HTTP {status}: {}",
                    body.chars().take(200).collect::<String>()
                )));
            }
            _ => {}
        }

        let text = response
            .text()
            .await
            .map_err(|e| DeepResearchError::Composer(format!("failed to read response: {e}")))?;

        let parsed: GenerateResponse = serde_json::from_str(&text).map_err(|e| {
            DeepResearchError::Composer(format!(
                "malformed response: {e} (got: {})",
                text.chars().take(200).collect::<String>()
            ))
        })?;

        let answer = parsed.first_text().ok_or_else(|| {
            DeepResearchError::Composer("malformed response: no candidate text".into())
        })?;

        info!(answer_len = answer.len(), "generation complete");
        Ok(answer)
    }
}
