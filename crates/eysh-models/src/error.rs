//! Artifact error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while fetching or decoding a model artifact.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// Reading an artifact file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The artifact isn't valid JSON or doesn't match the artifact schema.
    #[error("malformed artifact {name}: {source}")]
    Json {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// The artifact parsed but its contents are inconsistent.
    #[error("invalid artifact {name}: {reason}")]
    Invalid { name: String, reason: String },

    /// The artifact server returned an error response.
    #[error("artifact server error (HTTP {status}) for {url}")]
    Http { status: u16, url: String },

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),
}

impl ArtifactError {
    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        ArtifactError::Invalid {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
