pub mod arrange;
pub mod card;
pub mod machine;
pub mod results;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Which option(s) of a question count as correct.
///
/// Single-answer questions compare by exact index, multi-answer ones by set
/// membership. Either way a correct pick is worth exactly one point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CorrectAnswer {
    Single(usize),
    Multiple(BTreeSet<usize>),
}

impl CorrectAnswer {
    pub fn accepts(&self, index: usize) -> bool {
        match self {
            CorrectAnswer::Single(correct) => *correct == index,
            CorrectAnswer::Multiple(correct) => correct.contains(&index),
        }
    }

    pub fn indices(&self) -> Vec<usize> {
        match self {
            CorrectAnswer::Single(correct) => vec![*correct],
            CorrectAnswer::Multiple(correct) => correct.iter().copied().collect(),
        }
    }

    /// Builds the answer definition from the positions flagged as correct.
    ///
    /// Positions outside `0..option_count` are dropped. When nothing valid
    /// is left the first option is treated as correct, so a badly tagged
    /// record still yields a playable question.
    pub fn from_flags(flagged: impl IntoIterator<Item = usize>, option_count: usize) -> Self {
        let valid: BTreeSet<usize> = flagged
            .into_iter()
            .filter(|index| *index < option_count)
            .collect();
        match valid.len() {
            0 => CorrectAnswer::Single(0),
            1 => CorrectAnswer::Single(valid.into_iter().next().unwrap_or(0)),
            _ => CorrectAnswer::Multiple(valid),
        }
    }

    fn fits(&self, option_count: usize) -> bool {
        match self {
            CorrectAnswer::Single(correct) => *correct < option_count,
            CorrectAnswer::Multiple(correct) => {
                !correct.is_empty() && correct.iter().all(|index| *index < option_count)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidQuestion {
    #[error("question {id} has no options")]
    NoOptions { id: u32 },
    #[error("question {id} marks an option outside 0..{option_count} as correct")]
    CorrectOutOfRange { id: u32, option_count: usize },
}

/// One quiz item: a prompt, its ordered options and the correct answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: u32,
    #[serde(rename = "question")]
    pub prompt: String,
    pub options: Vec<String>,
    #[serde(rename = "correctAnswer")]
    pub correct: CorrectAnswer,
}

impl Question {
    pub fn new(
        id: u32,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct: CorrectAnswer,
    ) -> Result<Self, InvalidQuestion> {
        if options.is_empty() {
            return Err(InvalidQuestion::NoOptions { id });
        }
        if !correct.fits(options.len()) {
            return Err(InvalidQuestion::CorrectOutOfRange {
                id,
                option_count: options.len(),
            });
        }
        Ok(Self {
            id,
            prompt: prompt.into(),
            options,
            correct,
        })
    }

    /// Like [`Question::new`], but repairs a broken answer definition instead
    /// of rejecting the record. Only a question without options is refused.
    pub fn lenient(
        id: u32,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct: CorrectAnswer,
    ) -> Result<Self, InvalidQuestion> {
        let correct = if correct.fits(options.len()) {
            correct
        } else {
            log::warn!(
                "Question {} has an unusable correct answer {:?}, falling back to option 0",
                id,
                correct
            );
            CorrectAnswer::from_flags(correct.indices(), options.len())
        };
        Self::new(id, prompt, options, correct)
    }

    pub fn is_correct(&self, index: usize) -> bool {
        self.correct.accepts(index)
    }
}

#[cfg(test)]
pub(crate) fn sample_questions(count: usize) -> Vec<Question> {
    (0..count)
        .map(|i| {
            Question::new(
                i as u32 + 1,
                format!("Pytanie testowe {}", i + 1),
                vec!["A".into(), "B".into(), "C".into(), "D".into()],
                CorrectAnswer::Single(i % 4),
            )
            .expect("sample question is valid")
        })
        .collect()
}
