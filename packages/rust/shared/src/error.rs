//! Error types for DeepResearch.
//!
//! Library crates use [`DeepResearchError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all DeepResearch operations.
#[derive(Debug, thiserror::Error)]
pub enum DeepResearchError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// The caller supplied unusable input (e.g. an empty query).
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// A remote service rejected the configured API key.
    #[error("{service}: the API key is invalid or missing")]
    InvalidCredentials { service: String },

    /// Network/HTTP error talking to a remote service.
    #[error("network error: {0}")]
    Network(String),

    /// A response body could not be decoded.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// The answer composer failed (quota, service fault, malformed response).
    #[error("composer error: {0}")]
    Composer(String),

    /// A pipeline stage ran on a state that lacks a field it depends on.
    #[error("pipeline state is missing `{field}`")]
    MissingField { field: &'static str },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DeepResearchError>;

impl DeepResearchError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create an invalid-input error from any displayable message.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
        }
    }

    /// Create a credentials error for the named service.
    pub fn invalid_credentials(service: impl Into<String>) -> Self {
        Self::InvalidCredentials {
            service: service.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = DeepResearchError::config("missing API key");
        assert_eq!(err.to_string(), "config error: missing API key");

        let err = DeepResearchError::invalid_credentials("tavily");
        assert_eq!(err.to_string(), "tavily: the API key is invalid or missing");

        let err = DeepResearchError::MissingField { field: "research" };
        assert!(err.to_string().contains("`research`"));
    }
}
