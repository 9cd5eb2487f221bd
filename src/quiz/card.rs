//! Selection state of the question currently on screen.
//!
//! A card lives exactly as long as one question: the machine replaces it
//! whenever the question index changes.

use super::machine::TransitionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionCard {
    Unanswered { selected: Option<usize> },
    Confirmed { selected: usize },
}

impl Default for QuestionCard {
    fn default() -> Self {
        QuestionCard::Unanswered { selected: None }
    }
}

impl QuestionCard {
    pub fn selected(&self) -> Option<usize> {
        match self {
            QuestionCard::Unanswered { selected } => *selected,
            QuestionCard::Confirmed { selected } => Some(*selected),
        }
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, QuestionCard::Confirmed { .. })
    }

    /// Confirm is only offered once something is picked.
    pub fn can_confirm(&self) -> bool {
        matches!(self, QuestionCard::Unanswered { selected: Some(_) })
    }

    /// Picks an option; the pick may change until it is confirmed.
    pub fn select(&mut self, index: usize, option_count: usize) -> Result<(), TransitionError> {
        if self.is_confirmed() {
            return Err(TransitionError::AlreadyConfirmed);
        }
        if index >= option_count {
            return Err(TransitionError::OptionOutOfRange {
                index,
                option_count,
            });
        }
        *self = QuestionCard::Unanswered {
            selected: Some(index),
        };
        Ok(())
    }

    /// Locks the current pick and returns it.
    pub fn confirm(&mut self) -> Result<usize, TransitionError> {
        match *self {
            QuestionCard::Unanswered { selected: None } => Err(TransitionError::NothingSelected),
            QuestionCard::Unanswered {
                selected: Some(selected),
            } => {
                *self = QuestionCard::Confirmed { selected };
                Ok(selected)
            }
            QuestionCard::Confirmed { .. } => Err(TransitionError::AlreadyConfirmed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty_and_not_confirmable() {
        let card = QuestionCard::default();
        assert_eq!(card.selected(), None);
        assert!(!card.can_confirm());
    }

    #[test]
    fn selection_can_change_before_confirming() {
        let mut card = QuestionCard::default();
        card.select(1, 4).unwrap();
        card.select(3, 4).unwrap();
        assert_eq!(card.selected(), Some(3));
        assert!(card.can_confirm());
    }

    #[test]
    fn confirm_without_selection_is_refused() {
        let mut card = QuestionCard::default();
        assert_eq!(card.confirm(), Err(TransitionError::NothingSelected));
        assert_eq!(card, QuestionCard::default());
    }

    #[test]
    fn confirmation_locks_the_pick() {
        let mut card = QuestionCard::default();
        card.select(2, 4).unwrap();
        assert_eq!(card.confirm(), Ok(2));
        assert_eq!(card.select(0, 4), Err(TransitionError::AlreadyConfirmed));
        assert_eq!(card.confirm(), Err(TransitionError::AlreadyConfirmed));
        assert_eq!(card.selected(), Some(2));
    }

    #[test]
    fn out_of_range_pick_is_refused() {
        let mut card = QuestionCard::default();
        assert_eq!(
            card.select(4, 4),
            Err(TransitionError::OptionOutOfRange {
                index: 4,
                option_count: 4
            })
        );
    }
}
