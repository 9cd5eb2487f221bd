use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;

use super::{keep_playable, QuestionProvider};
use crate::error::ProviderUnavailable;
use crate::quiz::{CorrectAnswer, Question};

/// Questions known up front: the built-in set or a JSON file read on every
/// fetch, so edits to the file show up on the next start.
pub enum FixedProvider {
    Builtin(Vec<Question>),
    File(PathBuf),
}

impl FixedProvider {
    pub fn builtin() -> Self {
        Self::from_questions(builtin_questions())
    }

    pub fn from_questions(questions: Vec<Question>) -> Self {
        FixedProvider::Builtin(questions)
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        FixedProvider::File(path.into())
    }
}

#[async_trait]
impl QuestionProvider for FixedProvider {
    async fn fetch_questions(&self) -> Result<Vec<Question>, ProviderUnavailable> {
        match self {
            FixedProvider::Builtin(questions) => Ok(questions.clone()),
            FixedProvider::File(path) => {
                let raw = tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| ProviderUnavailable::File {
                        path: path.clone(),
                        source,
                    })?;
                let records: Vec<FileQuestion> = serde_json::from_str(&raw)?;
                Ok(keep_playable(records.into_iter().map(FileQuestion::into_question)))
            }
        }
    }

    fn describe(&self) -> String {
        match self {
            FixedProvider::Builtin(questions) => {
                format!("built-in list ({} questions)", questions.len())
            }
            FixedProvider::File(path) => format!("file {}", path.display()),
        }
    }
}

/// A question record as written in a questions file. Only the answer marker
/// is optional; a record without it falls back to the first option.
#[derive(Debug, Deserialize)]
struct FileQuestion {
    id: u32,
    question: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default, rename = "correctAnswer")]
    correct_answer: Option<CorrectAnswer>,
}

impl FileQuestion {
    fn into_question(self) -> Question {
        let correct = match self.correct_answer {
            Some(correct) => correct,
            None => {
                if !self.options.is_empty() {
                    log::warn!(
                        "Question {} has no correctAnswer, using the first option",
                        self.id
                    );
                }
                CorrectAnswer::from_flags([], self.options.len())
            }
        };
        Question {
            id: self.id,
            prompt: self.question,
            options: self.options,
            correct,
        }
    }
}

fn question(id: u32, prompt: &str, options: [&str; 4], correct: usize) -> Question {
    Question {
        id,
        prompt: prompt.to_string(),
        options: options.iter().map(|option| option.to_string()).collect(),
        correct: CorrectAnswer::Single(correct),
    }
}

fn builtin_questions() -> Vec<Question> {
    vec![
        question(
            1,
            "Gdzie znajduje się biblioteka?",
            [
                "Na parterze w budynku A",
                "Na drugim piętrze budynku B",
                "Na trzecim piętrze budynku C",
                "W piwnicy budynku A",
            ],
            0,
        ),
        question(
            2,
            "W którym roku powstała uczelnia WSB Merito w Gdańsku?",
            ["1998", "2001", "2005", "2010"],
            0,
        ),
        question(
            3,
            "Jaki kolor dominuje w logo WSB Merito?",
            ["Czerwony", "Zielony", "Niebieski", "Żółty"],
            2,
        ),
        question(
            4,
            "Ile wydziałów posiada uczelnia WSB Merito?",
            ["2 wydziały", "3 wydziały", "4 wydziały", "5 wydziałów"],
            2,
        ),
        question(
            5,
            "Gdzie znajduje się główny kampus WSB Merito w Gdańsku?",
            [
                "Przy ul. Grunwaldzkiej",
                "Przy ul. Długiej",
                "Przy ul. Traugutta",
                "Przy ul. Wały Piastowskie",
            ],
            3,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir()
            .join(format!("merito-quiz-{}-{}", std::process::id(), name));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn builtin_questions_are_valid() {
        let questions = builtin_questions();
        assert_eq!(questions.len(), 5);
        for q in &questions {
            let rebuilt =
                Question::new(q.id, q.prompt.clone(), q.options.clone(), q.correct.clone());
            assert!(rebuilt.is_ok());
        }
    }

    #[tokio::test]
    async fn builtin_provider_returns_its_list() {
        let questions = FixedProvider::builtin().fetch_questions().await.unwrap();
        assert_eq!(questions[2].prompt, "Jaki kolor dominuje w logo WSB Merito?");
        assert!(questions[2].is_correct(2));
    }

    #[tokio::test]
    async fn empty_list_is_not_an_error() {
        let questions = FixedProvider::from_questions(Vec::new())
            .fetch_questions()
            .await
            .unwrap();
        assert!(questions.is_empty());
    }

    #[tokio::test]
    async fn reads_questions_from_file() {
        let path = temp_file(
            "ok.json",
            r#"[{"id": 1, "question": "Ile?", "options": ["1", "2"], "correctAnswer": 7}]"#,
        );
        let questions = FixedProvider::from_path(&path).fetch_questions().await.unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].correct, CorrectAnswer::Single(0));
    }

    #[tokio::test]
    async fn record_without_answer_marker_keeps_the_batch() {
        let path = temp_file(
            "unmarked.json",
            r#"[
                {"id": 1, "question": "Ile?", "options": ["1", "2"], "correctAnswer": 1},
                {"id": 2, "question": "Gdzie?", "options": ["A", "B", "C"]},
                {"id": 3, "question": "Pusta", "options": []}
            ]"#,
        );
        let questions = FixedProvider::from_path(&path).fetch_questions().await.unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].correct, CorrectAnswer::Single(1));
        assert_eq!(questions[1].prompt, "Gdzie?");
        assert_eq!(questions[1].correct, CorrectAnswer::Single(0));
    }

    #[tokio::test]
    async fn missing_file_is_unavailable() {
        let provider = FixedProvider::from_path("/nonexistent/merito/pytania.json");
        let err = provider.fetch_questions().await.unwrap_err();
        assert!(matches!(err, ProviderUnavailable::File { .. }));
    }

    #[tokio::test]
    async fn garbage_file_is_malformed() {
        let path = temp_file("bad.json", "to nie jest json");
        let err = FixedProvider::from_path(&path).fetch_questions().await.unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, ProviderUnavailable::Malformed(_)));
    }
}
