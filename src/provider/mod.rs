//! Question sources.
//!
//! A provider hands over the whole batch in one call; the quiz never asks
//! for single questions.

pub mod fixed;
pub mod remote;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{Config, QuestionSource};
use crate::error::{ConfigError, ProviderUnavailable};
use crate::quiz::Question;

pub use fixed::FixedProvider;
pub use remote::RemoteProvider;

#[async_trait]
pub trait QuestionProvider: Send + Sync {
    /// Fetches the ordered question batch. An empty batch is a valid answer
    /// and is not an error.
    async fn fetch_questions(&self) -> Result<Vec<Question>, ProviderUnavailable>;

    /// Short human readable origin, for logs.
    fn describe(&self) -> String;
}

pub fn from_config(config: &Config) -> Result<Arc<dyn QuestionProvider>, ConfigError> {
    let provider: Arc<dyn QuestionProvider> = match &config.source {
        QuestionSource::Builtin => Arc::new(FixedProvider::builtin()),
        QuestionSource::File(path) => Arc::new(FixedProvider::from_path(path.clone())),
        QuestionSource::Remote { base_url } => {
            Arc::new(RemoteProvider::new(base_url, config.fetch_timeout)?)
        }
    };
    Ok(provider)
}

/// Keeps the playable records of a freshly decoded batch.
///
/// Records without options cannot be shown and are skipped; everything
/// else goes through [`Question::lenient`].
pub(crate) fn keep_playable(records: impl IntoIterator<Item = Question>) -> Vec<Question> {
    records
        .into_iter()
        .filter_map(|record| {
            let id = record.id;
            match Question::lenient(record.id, record.prompt, record.options, record.correct) {
                Ok(question) => Some(question),
                Err(err) => {
                    log::warn!("Skipping question {}: {}", id, err);
                    None
                }
            }
        })
        .collect()
}
