// SYNOID Shorts Error Taxonomy
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Transient failures (network, tool exit, malformed responses) are retried by
// the call-site RetryPolicy. Contiguity violations are programming errors and
// abort immediately.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, ShortsError>;

#[derive(thiserror::Error, Debug)]
pub enum ShortsError {
    #[error("network error: {0}")]
    Network(String),

    #[error("{tool} failed ({status}): {stderr}")]
    ToolFailed {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("contiguity violation: {0}")]
    Contiguity(String),

    #[error("missing artifact: {0}")]
    MissingArtifact(PathBuf),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ShortsError {
    pub fn contiguity(msg: impl Into<String>) -> Self {
        Self::Contiguity(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    pub fn tool(tool: &str, status: impl ToString, stderr: impl Into<String>) -> Self {
        Self::ToolFailed {
            tool: tool.to_string(),
            status: status.to_string(),
            stderr: stderr.into(),
        }
    }

    /// Whether the default retry predicate should try again.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::ToolFailed { .. } | Self::MalformedResponse(_)
        )
    }
}

impl From<reqwest::Error> for ShortsError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e.to_string())
    }
}
