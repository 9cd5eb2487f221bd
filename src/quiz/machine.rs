//! Quiz session state machine.
//!
//! `QuizState` is the single owner of the session: which screen is shown,
//! which question is current, the score and the answers given so far.
//! Every transition checks its preconditions before touching anything, so a
//! rejected transition leaves the state exactly as it was.
//!
//! [`reduce`] exposes all of it as a pure `(state, action) -> state`
//! function for the chat handlers.

use thiserror::Error;

use super::card::QuestionCard;
use super::Question;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Start,
    Quiz,
    Results,
}

/// Banner shown on the start screen while or after loading questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Loading,
    Unavailable(String),
    NoQuestions,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Start (or retry) pressed: the caller fetches questions next.
    Begin,
    Loaded(Vec<Question>),
    LoadFailed(String),
    Select(usize),
    Confirm,
    Next,
    Restart,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("{action} is not available on the {screen:?} screen")]
    WrongScreen { action: &'static str, screen: Screen },
    #[error("questions are already being loaded")]
    AlreadyLoading,
    #[error("no question load is pending")]
    NotLoading,
    #[error("no option selected")]
    NothingSelected,
    #[error("the answer is already confirmed")]
    AlreadyConfirmed,
    #[error("question {index} is already answered")]
    AlreadyAnswered { index: usize },
    #[error("the current question has not been answered yet")]
    NotAnswered,
    #[error("option {index} does not exist, the question has {option_count}")]
    OptionOutOfRange { index: usize, option_count: usize },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuizState {
    screen: Screen,
    questions: Vec<Question>,
    index: usize,
    score: usize,
    answers: Vec<usize>,
    notice: Option<Notice>,
    card: QuestionCard,
}

impl QuizState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn answers(&self) -> &[usize] {
        &self.answers
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn card(&self) -> &QuestionCard {
        &self.card
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// The question on screen; `None` outside the quiz.
    pub fn current_question(&self) -> Option<&Question> {
        match self.screen {
            Screen::Quiz => self.questions.get(self.index),
            _ => None,
        }
    }

    pub fn is_last_question(&self) -> bool {
        self.index + 1 >= self.questions.len()
    }

    fn expect_screen(&self, screen: Screen, action: &'static str) -> Result<(), TransitionError> {
        if self.screen == screen {
            Ok(())
        } else {
            Err(TransitionError::WrongScreen {
                action,
                screen: self.screen,
            })
        }
    }

    /// First half of starting: marks the start screen as loading. Also
    /// serves as retry after a failed or empty load.
    pub fn begin(&mut self) -> Result<(), TransitionError> {
        self.expect_screen(Screen::Start, "start")?;
        if self.notice == Some(Notice::Loading) {
            return Err(TransitionError::AlreadyLoading);
        }
        self.notice = Some(Notice::Loading);
        Ok(())
    }

    /// Second half of starting. An empty batch never enters the quiz.
    pub fn load(&mut self, questions: Vec<Question>) -> Result<(), TransitionError> {
        self.expect_loading()?;
        if questions.is_empty() {
            self.notice = Some(Notice::NoQuestions);
            return Ok(());
        }
        *self = Self {
            screen: Screen::Quiz,
            questions,
            ..Self::default()
        };
        Ok(())
    }

    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), TransitionError> {
        self.expect_loading()?;
        self.notice = Some(Notice::Unavailable(reason.into()));
        Ok(())
    }

    fn expect_loading(&self) -> Result<(), TransitionError> {
        self.expect_screen(Screen::Start, "load")?;
        match self.notice {
            Some(Notice::Loading) => Ok(()),
            _ => Err(TransitionError::NotLoading),
        }
    }

    /// Scores `selected` against the current question. Returns whether it
    /// was correct. Each question takes exactly one answer.
    pub fn answer(&mut self, selected: usize) -> Result<bool, TransitionError> {
        self.expect_screen(Screen::Quiz, "answer")?;
        if self.answers.len() != self.index {
            return Err(TransitionError::AlreadyAnswered { index: self.index });
        }
        let question = &self.questions[self.index];
        if selected >= question.options.len() {
            return Err(TransitionError::OptionOutOfRange {
                index: selected,
                option_count: question.options.len(),
            });
        }
        let correct = question.is_correct(selected);
        if correct {
            self.score += 1;
        }
        self.answers.push(selected);
        Ok(correct)
    }

    /// Moves to the next question, or to the results after the last one.
    pub fn advance(&mut self) -> Result<(), TransitionError> {
        self.expect_screen(Screen::Quiz, "advance")?;
        if self.answers.len() <= self.index {
            return Err(TransitionError::NotAnswered);
        }
        if self.is_last_question() {
            self.screen = Screen::Results;
        } else {
            self.index += 1;
        }
        self.card = QuestionCard::default();
        Ok(())
    }

    /// Back to a fresh start screen, from anywhere.
    pub fn restart(&mut self) {
        *self = Self::default();
    }

    fn apply(&mut self, action: Action) -> Result<(), TransitionError> {
        match action {
            Action::Begin => self.begin(),
            Action::Loaded(questions) => self.load(questions),
            Action::LoadFailed(reason) => self.fail(reason),
            Action::Select(index) => {
                self.expect_screen(Screen::Quiz, "select")?;
                let option_count = self.questions[self.index].options.len();
                self.card.select(index, option_count)
            }
            Action::Confirm => {
                self.expect_screen(Screen::Quiz, "confirm")?;
                let selected = self.card.confirm()?;
                self.answer(selected).map(|_| ())
            }
            Action::Next => {
                self.expect_screen(Screen::Quiz, "next")?;
                if !self.card.is_confirmed() {
                    return Err(TransitionError::NotAnswered);
                }
                self.advance()
            }
            Action::Restart => {
                self.restart();
                Ok(())
            }
        }
    }
}

/// Applies `action` to a copy of `state`. On error the original state is
/// still the valid one.
pub fn reduce(state: &QuizState, action: Action) -> Result<QuizState, TransitionError> {
    let mut next = state.clone();
    next.apply(action)?;
    Ok(next)
}
