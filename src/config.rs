//! Runtime configuration, read from the environment (and `.env`).

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::quiz::arrange::Arrangement;

const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionSource {
    Builtin,
    File(PathBuf),
    Remote { base_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub source: QuestionSource,
    pub fetch_timeout: Duration,
    pub arrangement: Arrangement,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let source = if let Some(base_url) = var("QUIZ_API_URL") {
            if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                return Err(ConfigError::Invalid {
                    key: "QUIZ_API_URL",
                    value: base_url,
                    reason: "expected an http(s) URL".into(),
                });
            }
            QuestionSource::Remote { base_url }
        } else if let Some(path) = var("QUIZ_QUESTIONS_FILE") {
            QuestionSource::File(PathBuf::from(path))
        } else {
            QuestionSource::Builtin
        };

        let timeout_secs = parse(var("QUIZ_FETCH_TIMEOUT_SECS"), "QUIZ_FETCH_TIMEOUT_SECS")?
            .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS);

        let arrangement = Arrangement {
            shuffle_questions: parse_flag(var("QUIZ_SHUFFLE_QUESTIONS"), "QUIZ_SHUFFLE_QUESTIONS")?,
            shuffle_options: parse_flag(var("QUIZ_SHUFFLE_OPTIONS"), "QUIZ_SHUFFLE_OPTIONS")?,
            seed: parse(var("QUIZ_SEED"), "QUIZ_SEED")?,
        };

        Ok(Self {
            source,
            fetch_timeout: Duration::from_secs(timeout_secs),
            arrangement,
        })
    }
}

fn parse<T>(value: Option<String>, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .map(|raw| {
            raw.trim().parse().map_err(|err: T::Err| ConfigError::Invalid {
                key,
                reason: err.to_string(),
                value: raw,
            })
        })
        .transpose()
}

fn parse_flag(value: Option<String>, key: &'static str) -> Result<bool, ConfigError> {
    match value.as_deref().map(|raw| raw.trim().to_ascii_lowercase()) {
        None => Ok(false),
        Some(flag) => match flag.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid {
                key,
                value: flag.clone(),
                reason: "expected true or false".into(),
            }),
        },
    }
}
