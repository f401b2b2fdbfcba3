//! Application configuration for DeepResearch.
//!
//! User config lives at `~/.deepresearch/deepresearch.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DeepResearchError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "deepresearch.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".deepresearch";

// ---------------------------------------------------------------------------
// Config structs (matching deepresearch.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Web search (Tavily) settings.
    #[serde(default)]
    pub search: SearchConfig,

    /// Language model (Gemini) settings.
    #[serde(default)]
    pub llm: LlmConfig,

    /// HTTP client settings shared by all remote calls.
    #[serde(default)]
    pub http: HttpConfig,
}

/// `[search]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_search_key_env")]
    pub api_key_env: String,

    /// Base URL of the search API.
    #[serde(default = "default_search_base_url")]
    pub base_url: String,

    /// Maximum number of hits to request.
    #[serde(default = "default_max_results")]
    pub max_results: u32,

    /// Search depth: "basic" or "advanced".
    #[serde(default = "default_search_depth")]
    pub search_depth: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_search_key_env(),
            base_url: default_search_base_url(),
            max_results: default_max_results(),
            search_depth: default_search_depth(),
        }
    }
}

fn default_search_key_env() -> String {
    "TAVILY_API_KEY".into()
}
fn default_search_base_url() -> String {
    "https://api.tavily.com".into()
}
fn default_max_results() -> u32 {
    5
}
fn default_search_depth() -> String {
    "basic".into()
}

/// `[llm]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_llm_key_env")]
    pub api_key_env: String,

    /// Base URL of the Generative Language API.
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    /// Model used to draft answers.
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_llm_key_env(),
            base_url: default_llm_base_url(),
            model: default_model(),
        }
    }
}

fn default_llm_key_env() -> String {
    "GEMINI_API_KEY".into()
}
fn default_llm_base_url() -> String {
    "https://generativelanguage.googleapis.com".into()
}
fn default_model() -> String {
    "gemini-1.5-flash-latest".into()
}

/// `[http]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    60
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.deepresearch/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| DeepResearchError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.deepresearch/deepresearch.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DeepResearchError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        DeepResearchError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| DeepResearchError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| DeepResearchError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| DeepResearchError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Read an API key from the named env var, failing if it is unset or empty.
pub fn read_api_key(var_name: &str) -> Result<String> {
    match std::env::var(var_name) {
        Ok(val) if !val.trim().is_empty() => Ok(val),
        _ => Err(DeepResearchError::config(format!(
            "API key not found. Set the {var_name} environment variable."
        ))),
    }
}

/// Check the API keys a run needs.
///
/// Only the LLM key is required. Without a search key the run still goes
/// ahead and the research stage falls back to its missing-key context.
pub fn validate_api_keys(config: &AppConfig) -> Result<()> {
    read_api_key(&config.llm.api_key_env)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("TAVILY_API_KEY"));
        assert!(toml_str.contains("GEMINI_API_KEY"));
        assert!(toml_str.contains("gemini-1.5-flash-latest"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.search.max_results, 5);
        assert_eq!(parsed.http.timeout_secs, 60);
        assert_eq!(parsed.llm.api_key_env, "GEMINI_API_KEY");
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[llm]
model = "gemini-2.0-flash"

[http]
timeout_secs = 5
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.llm.model, "gemini-2.0-flash");
        assert_eq!(config.llm.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.search.base_url, "https://api.tavily.com");
        assert_eq!(config.http.timeout_secs, 5);
    }

    #[test]
    fn load_config_from_missing_file_is_io_error() {
        let err = load_config_from(Path::new("/nonexistent/deepresearch.toml")).unwrap_err();
        assert!(matches!(err, DeepResearchError::Io { .. }));
    }

    #[test]
    fn api_key_validation() {
        let mut config = AppConfig::default();
        // Use a unique env var name to avoid interfering with other tests
        config.llm.api_key_env = "DR_TEST_NONEXISTENT_KEY_12345".into();
        let result = validate_api_keys(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("DR_TEST_NONEXISTENT_KEY_12345"));
    }

    #[test]
    fn missing_search_key_is_not_fatal() {
        let mut config = AppConfig::default();
        config.search.api_key_env = "DR_TEST_NONEXISTENT_KEY_67890".into();
        // PATH is always set, so it stands in for a configured LLM key.
        config.llm.api_key_env = "PATH".into();
        assert!(validate_api_keys(&config).is_ok());
    }
}
