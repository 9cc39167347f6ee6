//! Error types for the pool price oracle

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving startup configuration
///
/// All variants are fatal: the entry point reports them and exits.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The environment-definition file could not be loaded
    #[error("Failed to load environment file {}: {source}", .path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    /// A required variable is not set
    #[error("Environment variable {key} is required")]
    MissingRequired { key: String },

    /// A variable is set but its value cannot be used
    #[error("Invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    /// Creates a MissingRequired error
    pub fn missing(key: &str) -> Self {
        Self::MissingRequired {
            key: key.to_string(),
        }
    }

    /// Creates an Invalid error
    pub fn invalid(key: &str, value: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors that can occur when querying the GraphQL endpoint
#[derive(Debug, Error)]
pub enum QueryError {
    /// Network request failed
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Timeout waiting for response
    #[error("Request timeout")]
    Timeout,

    /// Endpoint answered with a non-success status or a GraphQL error payload
    #[error("Endpoint error: {0}")]
    Endpoint(String),

    /// Response body could not be decoded
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl QueryError {
    /// Converts a transport error, separating timeouts from other failures
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(err)
        }
    }

    /// Returns the failure category of this error
    pub fn kind(&self) -> QueryErrorKind {
        match self {
            QueryError::Network(_) => QueryErrorKind::Network,
            QueryError::Timeout => QueryErrorKind::Timeout,
            QueryError::Endpoint(_) => QueryErrorKind::Endpoint,
            QueryError::MalformedResponse(_) => QueryErrorKind::Malformed,
        }
    }
}

/// Failure category of a query, used in logs, metrics and events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryErrorKind {
    Network,
    Timeout,
    Endpoint,
    Malformed,
}

impl QueryErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryErrorKind::Network => "network",
            QueryErrorKind::Timeout => "timeout",
            QueryErrorKind::Endpoint => "endpoint",
            QueryErrorKind::Malformed => "malformed",
        }
    }
}

impl fmt::Display for QueryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
