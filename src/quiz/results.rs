//! Final score summary.

use super::Question;

/// Qualitative bucket of a finished quiz.
///
/// Thresholds: 100% perfect, at least 80% great, at least 60% good,
/// anything lower asks for another try.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    Perfect,
    Great,
    Good,
    TryAgain,
}

impl Grade {
    pub fn message(&self) -> &'static str {
        match self {
            Grade::Perfect => "Brawo! Perfekcyjny wynik! 🎉",
            Grade::Great => "Świetna robota! 👏",
            Grade::Good => "Dobry wynik! 👍",
            Grade::TryAgain => "Spróbuj jeszcze raz! 💪",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub score: usize,
    pub total: usize,
}

impl Summary {
    pub fn new(score: usize, total: usize) -> Self {
        Self { score, total }
    }

    /// "score/total", as shown on the results screen.
    pub fn ratio(&self) -> String {
        format!("{}/{}", self.score, self.total)
    }

    /// Rounded to the nearest whole percent; an empty quiz counts as 0%.
    pub fn percentage(&self) -> usize {
        if self.total == 0 {
            return 0;
        }
        (self.score * 100 + self.total / 2) / self.total
    }

    pub fn grade(&self) -> Grade {
        // compared on exact fractions so 3/5 lands on 60% and not 59.99%
        let scaled = self.score * 100;
        if self.total > 0 && self.score >= self.total {
            Grade::Perfect
        } else if self.total > 0 && scaled >= 80 * self.total {
            Grade::Great
        } else if self.total > 0 && scaled >= 60 * self.total {
            Grade::Good
        } else {
            Grade::TryAgain
        }
    }
}

/// One line of the per-question review under the score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review<'a> {
    pub number: usize,
    pub prompt: &'a str,
    pub chosen: Option<&'a str>,
    pub correct: Vec<&'a str>,
    pub was_correct: bool,
}

pub fn review<'a>(questions: &'a [Question], answers: &[usize]) -> Vec<Review<'a>> {
    questions
        .iter()
        .enumerate()
        .map(|(i, question)| {
            let chosen_index = answers.get(i).copied();
            Review {
                number: i + 1,
                prompt: &question.prompt,
                chosen: chosen_index
                    .and_then(|index| question.options.get(index))
                    .map(String::as_str),
                correct: question
                    .correct
                    .indices()
                    .into_iter()
                    .filter_map(|index| question.options.get(index))
                    .map(String::as_str)
                    .collect(),
                was_correct: chosen_index.map_or(false, |index| question.is_correct(index)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::sample_questions;

    #[test]
    fn buckets_follow_thresholds() {
        assert_eq!(Summary::new(5, 5).grade(), Grade::Perfect);
        assert_eq!(Summary::new(4, 5).grade(), Grade::Great);
        assert_eq!(Summary::new(3, 5).grade(), Grade::Good);
        assert_eq!(Summary::new(2, 5).grade(), Grade::TryAgain);
        assert_eq!(Summary::new(0, 5).grade(), Grade::TryAgain);
    }

    #[test]
    fn three_of_five_is_sixty_percent() {
        let summary = Summary::new(3, 5);
        assert_eq!(summary.ratio(), "3/5");
        assert_eq!(summary.percentage(), 60);
        assert_eq!(summary.grade().message(), "Dobry wynik! 👍");
    }

    #[test]
    fn percentage_rounds_to_nearest() {
        assert_eq!(Summary::new(2, 3).percentage(), 67);
        assert_eq!(Summary::new(1, 3).percentage(), 33);
    }

    #[test]
    fn empty_quiz_scores_zero() {
        let summary = Summary::new(0, 0);
        assert_eq!(summary.percentage(), 0);
        assert_eq!(summary.grade(), Grade::TryAgain);
    }

    #[test]
    fn review_pairs_answers_with_questions() {
        let questions = sample_questions(2);
        let lines = review(&questions, &[0, 3]);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].was_correct);
        assert_eq!(lines[0].chosen, Some("A"));
        assert!(!lines[1].was_correct);
        assert_eq!(lines[1].chosen, Some("D"));
        assert_eq!(lines[1].correct, vec!["B"]);
    }
}
