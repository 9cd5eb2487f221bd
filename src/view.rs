//! Chat rendering of the quiz screens.
//!
//! Every screen is one message: text plus an inline keyboard whose buttons
//! carry a [`Press`] as callback data. Rendering is a pure function of the
//! session state, so the handlers can simply re-render after each change.

use std::fmt;
use std::str::FromStr;

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::quiz::card::QuestionCard;
use crate::quiz::machine::{Action, Notice, QuizState, Screen};
use crate::quiz::results::{review, Summary};
use crate::quiz::Question;

pub const HELP_TEXT: &str = "Quiz o WSB Merito Gdańsk.\n\n\
/start - rozpocznij od nowa\n\
/restart - wróć do ekranu startowego\n\
/help - ta wiadomość\n\n\
Wybierz odpowiedź, zatwierdź ją i przejdź do następnego pytania.";

pub const SESSION_EXPIRED_TEXT: &str = "Sesja wygasła, wyślij /start.";

const WELCOME_TEXT: &str = "UNIWERSYTETY WSB MERITO\n\n\
Witaj na pokładzie WSB Merito!\n\
Cieszymy się, że dołączysz do naszej społeczności!\n\n\
Przygotuj się na ekscytującą podróż akademicką! \
Ten quiz pozwoli Ci poznać naszą uczelnię!";

/// A button press, as encoded in callback data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Press {
    Start,
    Retry,
    Select(usize),
    Confirm,
    Next,
    Restart,
}

impl Press {
    pub fn action(self) -> Action {
        match self {
            Press::Start | Press::Retry => Action::Begin,
            Press::Select(index) => Action::Select(index),
            Press::Confirm => Action::Confirm,
            Press::Next => Action::Next,
            Press::Restart => Action::Restart,
        }
    }

    /// Presses that have to go through the question provider.
    pub fn needs_fetch(self) -> bool {
        matches!(self, Press::Start | Press::Retry)
    }
}

impl fmt::Display for Press {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Press::Start => write!(f, "start"),
            Press::Retry => write!(f, "retry"),
            Press::Select(index) => write!(f, "select:{}", index),
            Press::Confirm => write!(f, "confirm"),
            Press::Next => write!(f, "next"),
            Press::Restart => write!(f, "restart"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown button {0:?}")]
pub struct UnknownPress(pub String);

impl FromStr for Press {
    type Err = UnknownPress;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        match data {
            "start" => Ok(Press::Start),
            "retry" => Ok(Press::Retry),
            "confirm" => Ok(Press::Confirm),
            "next" => Ok(Press::Next),
            "restart" => Ok(Press::Restart),
            other => other
                .strip_prefix("select:")
                .and_then(|index| index.parse().ok())
                .map(Press::Select)
                .ok_or_else(|| UnknownPress(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub text: String,
    pub keyboard: Option<InlineKeyboardMarkup>,
}

impl View {
    fn new(text: impl Into<String>, rows: Vec<Vec<InlineKeyboardButton>>) -> Self {
        let keyboard = if rows.is_empty() {
            None
        } else {
            Some(InlineKeyboardMarkup::new(rows))
        };
        Self {
            text: text.into(),
            keyboard,
        }
    }
}

fn button(label: impl Into<String>, press: Press) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(label, press.to_string())
}

pub fn render(state: &QuizState) -> View {
    match state.screen() {
        Screen::Start => render_start(state.notice()),
        Screen::Quiz => match state.current_question() {
            Some(question) => render_question(
                question,
                state.card(),
                state.index(),
                state.total(),
                state.is_last_question(),
            ),
            None => render_start(None),
        },
        Screen::Results => render_results(state),
    }
}

fn render_start(notice: Option<&Notice>) -> View {
    match notice {
        None => View::new(
            WELCOME_TEXT,
            vec![vec![button("Rozpocznij quiz", Press::Start)]],
        ),
        Some(Notice::Loading) => View::new("⏳ Ładowanie pytań...", Vec::new()),
        Some(Notice::Unavailable(reason)) => View::new(
            format!("Nie udało się pobrać pytań.\n{}", reason),
            vec![vec![button("Spróbuj ponownie", Press::Retry)]],
        ),
        Some(Notice::NoQuestions) => View::new(
            "Brak pytań w bazie danych.",
            vec![vec![button("Spróbuj ponownie", Press::Retry)]],
        ),
    }
}

fn render_question(
    question: &Question,
    card: &QuestionCard,
    index: usize,
    total: usize,
    is_last: bool,
) -> View {
    let mut text = format!("Pytanie {}/{}\n\n{}", index + 1, total, question.prompt);

    let mut rows: Vec<Vec<InlineKeyboardButton>> = question
        .options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let marker = option_marker(question, card, i);
            vec![button(format!("{} {}", marker, option), Press::Select(i))]
        })
        .collect();

    if card.can_confirm() {
        rows.push(vec![button("Zatwierdź", Press::Confirm)]);
    }
    if let QuestionCard::Confirmed { selected } = card {
        let feedback = if question.is_correct(*selected) {
            "✓ Poprawna odpowiedź!"
        } else {
            "✗ Niepoprawna odpowiedź!"
        };
        text.push_str("\n\n");
        text.push_str(feedback);

        let label = if is_last {
            "Zakończ quiz"
        } else {
            "Następne pytanie"
        };
        rows.push(vec![button(label, Press::Next)]);
    }

    View::new(text, rows)
}

fn option_marker(question: &Question, card: &QuestionCard, index: usize) -> &'static str {
    let picked = card.selected() == Some(index);
    match (card.is_confirmed(), picked) {
        (false, true) => "🔘",
        (false, false) => "⚪",
        (true, _) if question.is_correct(index) => "✅",
        (true, true) => "❌",
        (true, false) => "▫️",
    }
}

/// Telegram refuses message texts longer than this many UTF-16 units.
pub const MESSAGE_LIMIT: usize = 4096;

const REVIEW_CUT: &str = "\n…";

fn text_len(text: &str) -> usize {
    text.encode_utf16().count()
}

fn render_results(state: &QuizState) -> View {
    let summary = Summary::new(state.score(), state.total());
    let mut text = format!(
        "Gratulacje udało Ci się ukończyć nasz quiz!\n{}\n\nPoprawne odpowiedzi: {} ({}%)\n",
        summary.grade().message(),
        summary.ratio(),
        summary.percentage()
    );

    // the review is cut short once the message would get too long
    let budget = MESSAGE_LIMIT - text_len(REVIEW_CUT);
    let mut used = text_len(&text);
    for line in review(state.questions(), state.answers()) {
        let entry = if line.was_correct {
            format!("\n✓ {}. {}", line.number, line.prompt)
        } else {
            format!(
                "\n✗ {}. {}\n    Twoja odpowiedź: {}\n    Poprawna: {}",
                line.number,
                line.prompt,
                line.chosen.unwrap_or("-"),
                line.correct.join(", ")
            )
        };
        let len = text_len(&entry);
        if used + len > budget {
            text.push_str(REVIEW_CUT);
            break;
        }
        used += len;
        text.push_str(&entry);
    }

    View::new(
        text,
        vec![vec![button("Rozpocznij jeszcze raz", Press::Restart)]],
    )
}
