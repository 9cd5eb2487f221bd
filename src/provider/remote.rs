use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::{keep_playable, QuestionProvider};
use crate::error::{ConfigError, ProviderUnavailable};
use crate::quiz::{CorrectAnswer, Question};

const QUESTIONS_PATH: &str = "questions_with_answers/";

/// Pulls the batch from the quiz API in a single request.
pub struct RemoteProvider {
    client: reqwest::Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct ApiQuestion {
    question_id: u32,
    content: String,
    #[serde(default)]
    answers: Vec<ApiAnswer>,
}

#[derive(Debug, Deserialize)]
struct ApiAnswer {
    content: String,
    #[serde(default)]
    is_correct: bool,
}

impl ApiQuestion {
    fn into_question(self) -> Question {
        let flagged = self
            .answers
            .iter()
            .enumerate()
            .filter(|(_, answer)| answer.is_correct)
            .map(|(i, _)| i)
            .collect::<Vec<_>>();
        if flagged.is_empty() && !self.answers.is_empty() {
            log::warn!(
                "Question {} has no answer marked correct, using the first one",
                self.question_id
            );
        }
        let correct = CorrectAnswer::from_flags(flagged, self.answers.len());
        Question {
            id: self.question_id,
            prompt: self.content,
            options: self.answers.into_iter().map(|answer| answer.content).collect(),
            correct,
        }
    }
}

/// Decodes a `questions_with_answers` response body.
pub(crate) fn decode_batch(body: &str) -> Result<Vec<Question>, serde_json::Error> {
    let records: Vec<ApiQuestion> = serde_json::from_str(body)?;
    Ok(keep_playable(records.into_iter().map(ApiQuestion::into_question)))
}

impl RemoteProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ConfigError::HttpClient)?;
        Ok(Self {
            client,
            url: format!("{}/{}", base_url.trim_end_matches('/'), QUESTIONS_PATH),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl QuestionProvider for RemoteProvider {
    async fn fetch_questions(&self) -> Result<Vec<Question>, ProviderUnavailable> {
        log::debug!("Fetching questions from {}", self.url);
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderUnavailable::Status(status));
        }
        let body = response.text().await?;
        let questions = decode_batch(&body)?;
        log::info!("Fetched {} questions from {}", questions.len(), self.url);
        Ok(questions)
    }

    fn describe(&self) -> String {
        format!("quiz API at {}", self.url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"[
        {
            "question_id": 1,
            "content": "Gdzie znajduje się biblioteka?",
            "category": 1,
            "answers": [
                {"answer_id": 1, "content": "Na parterze w budynku A", "is_correct": true},
                {"answer_id": 2, "content": "Na drugim piętrze budynku B", "is_correct": false}
            ]
        },
        {
            "question_id": 2,
            "content": "Bez oznaczenia",
            "category": null,
            "answers": [
                {"answer_id": 3, "content": "x", "is_correct": false},
                {"answer_id": 4, "content": "y", "is_correct": false}
            ]
        },
        {
            "question_id": 3,
            "content": "Dwie poprawne",
            "answers": [
                {"answer_id": 5, "content": "p", "is_correct": true},
                {"answer_id": 6, "content": "q", "is_correct": false},
                {"answer_id": 7, "content": "r", "is_correct": true}
            ]
        },
        {"question_id": 4, "content": "Bez odpowiedzi", "answers": []}
    ]"#;

    #[test]
    fn decodes_api_records() {
        let questions = decode_batch(BODY).unwrap();
        assert_eq!(questions.len(), 3);
        assert_eq!(questions[0].prompt, "Gdzie znajduje się biblioteka?");
        assert_eq!(questions[0].options.len(), 2);
        assert_eq!(questions[0].correct, CorrectAnswer::Single(0));
    }

    #[test]
    fn unmarked_question_defaults_to_first_option() {
        let questions = decode_batch(BODY).unwrap();
        assert_eq!(questions[1].correct, CorrectAnswer::Single(0));
    }

    #[test]
    fn several_marked_answers_become_a_set() {
        let questions = decode_batch(BODY).unwrap();
        assert!(questions[2].is_correct(0));
        assert!(questions[2].is_correct(2));
        assert!(!questions[2].is_correct(1));
    }

    #[test]
    fn empty_array_decodes_to_empty_batch() {
        assert!(decode_batch("[]").unwrap().is_empty());
    }

    #[test]
    fn non_array_body_is_malformed() {
        assert!(decode_batch(r#"{"detail": "Not Found"}"#).is_err());
    }

    #[test]
    fn joins_base_url_and_path() {
        let provider =
            RemoteProvider::new("http://localhost:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(provider.url(), "http://localhost:8000/questions_with_answers/");
    }

    #[tokio::test]
    async fn unreachable_service_is_unavailable() {
        // nothing listens on port 9 on a test box
        let provider = RemoteProvider::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = provider.fetch_questions().await.unwrap_err();
        assert!(matches!(err, ProviderUnavailable::Network(_)));
    }
}
