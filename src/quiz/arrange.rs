//! Optional shuffling of a loaded question batch.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::{CorrectAnswer, Question};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Arrangement {
    pub shuffle_questions: bool,
    pub shuffle_options: bool,
    /// Same seed, same order on every load.
    pub seed: Option<u64>,
}

impl Arrangement {
    pub fn is_noop(&self) -> bool {
        !self.shuffle_questions && !self.shuffle_options
    }

    pub fn arrange(&self, questions: Vec<Question>) -> Vec<Question> {
        if self.is_noop() {
            return questions;
        }
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.arrange_with(questions, &mut rng)
    }

    pub fn arrange_with<R: Rng + ?Sized>(
        &self,
        mut questions: Vec<Question>,
        rng: &mut R,
    ) -> Vec<Question> {
        if self.shuffle_questions {
            questions.shuffle(rng);
        }
        if self.shuffle_options {
            for question in questions.iter_mut() {
                shuffle_options(question, rng);
            }
        }
        questions
    }
}

/// Shuffles the options of one question and remaps its correct answer so the
/// same option texts stay correct.
fn shuffle_options<R: Rng + ?Sized>(question: &mut Question, rng: &mut R) {
    // order[new position] = old position
    let mut order: Vec<usize> = (0..question.options.len()).collect();
    order.shuffle(rng);

    let mut old_options: Vec<Option<String>> = question.options.drain(..).map(Some).collect();
    question.options = order
        .iter()
        .filter_map(|old| old_options[*old].take())
        .collect();

    let new_position = |old: usize| order.iter().position(|candidate| *candidate == old);
    question.correct = match &question.correct {
        CorrectAnswer::Single(old) => CorrectAnswer::Single(new_position(*old).unwrap_or(0)),
        CorrectAnswer::Multiple(old) => {
            CorrectAnswer::Multiple(old.iter().filter_map(|index| new_position(*index)).collect())
        }
    };
}
