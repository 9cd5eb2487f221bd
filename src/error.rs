use std::path::PathBuf;

use thiserror::Error;

/// The question source could not deliver a batch. Shown to the user with a
/// retry button; never fatal.
#[derive(Debug, Error)]
pub enum ProviderUnavailable {
    #[error("could not reach the question service: {0}")]
    Network(#[from] reqwest::Error),

    #[error("question service answered with status {0}")]
    Status(reqwest::StatusCode),

    #[error("question data is malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("cannot read {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} has an invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("cannot build the HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Result type of the chat handlers.
pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;
