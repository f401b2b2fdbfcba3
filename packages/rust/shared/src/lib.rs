//! Shared types, error model, and configuration for DeepResearch.
//!
//! This crate is the foundation depended on by all other DeepResearch crates.
//! It provides:
//! - [`DeepResearchError`] — the unified error type
//! - Domain types ([`PipelineState`], [`SearchResults`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, HttpConfig, LlmConfig, SearchConfig, config_dir, config_file_path, init_config,
    load_config, load_config_from, read_api_key, validate_api_keys,
};
pub use error::{DeepResearchError, Result};
pub use types::{PipelineState, SearchResults};
