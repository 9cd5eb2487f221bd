use std::sync::Arc;

use teloxide::{
    dispatching::{dialogue, dialogue::InMemStorage, UpdateHandler},
    prelude::*,
    types::ChatId,
    utils::command::BotCommands,
    ApiError, RequestError,
};

use crate::error::HandlerResult;
use crate::provider::QuestionProvider;
use crate::quiz::arrange::Arrangement;
use crate::quiz::machine::{reduce, Action, QuizState};
use crate::view::{render, Press, HELP_TEXT, SESSION_EXPIRED_TEXT};

pub type ChatDialogue = Dialogue<ChatState, InMemStorage<ChatState>>;

/// Per-chat dialogue state. Each chat plays its own session; nothing is
/// shared between chats and nothing outlives the process.
#[derive(Clone, Default)]
pub enum ChatState {
    #[default]
    Idle,
    Playing(QuizState),
}

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Dostępne polecenia:")]
pub enum Command {
    #[command(description = "rozpocznij quiz od nowa")]
    Start,
    #[command(description = "wróć do ekranu startowego")]
    Restart,
    #[command(description = "pomoc")]
    Help,
}

pub fn schema() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    let commands = teloxide::filter_command::<Command, _>()
        .branch(dptree::case![Command::Start].endpoint(start))
        .branch(dptree::case![Command::Restart].endpoint(start))
        .branch(dptree::case![Command::Help].endpoint(help));

    let messages = Update::filter_message()
        .branch(commands)
        .branch(dptree::case![ChatState::Idle].endpoint(start))
        .branch(dptree::case![ChatState::Playing(session)].endpoint(resend));

    let callbacks = Update::filter_callback_query()
        .branch(dptree::case![ChatState::Playing(session)].endpoint(press))
        .branch(dptree::case![ChatState::Idle].endpoint(expired));

    dialogue::enter::<Update, InMemStorage<ChatState>, ChatState, _>()
        .branch(messages)
        .branch(callbacks)
}

/// Fresh start screen in a new message.
async fn start(bot: Bot, dialogue: ChatDialogue, msg: Message) -> HandlerResult {
    let session = QuizState::new();
    send_screen(&bot, msg.chat.id, &session).await?;
    dialogue.update(ChatState::Playing(session)).await?;
    log::info!("Chat {} is on the start screen", msg.chat.id);
    Ok(())
}

async fn help(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, HELP_TEXT).await?;
    Ok(())
}

/// Any other text brings the current screen back to the bottom of the chat.
async fn resend(bot: Bot, msg: Message, session: QuizState) -> HandlerResult {
    send_screen(&bot, msg.chat.id, &session).await
}

async fn expired(bot: Bot, q: CallbackQuery) -> HandlerResult {
    bot.answer_callback_query(q.id)
        .text(SESSION_EXPIRED_TEXT)
        .await?;
    Ok(())
}

async fn press(
    bot: Bot,
    dialogue: ChatDialogue,
    q: CallbackQuery,
    session: QuizState,
    provider: Arc<dyn QuestionProvider>,
    arrangement: Arrangement,
) -> HandlerResult {
    if let Err(err) = bot.answer_callback_query(q.id.clone()).await {
        log::warn!("Could not acknowledge callback {}: {}", q.id, err);
    }

    let Some(message) = q.message else {
        return Ok(());
    };
    let press = match q.data.as_deref().map(str::parse::<Press>) {
        Some(Ok(press)) => press,
        Some(Err(err)) => {
            log::warn!("Chat {}: {}", message.chat.id, err);
            return Ok(());
        }
        None => return Ok(()),
    };

    // presses that do not fit the current screen, e.g. a finished quiz
    let next = match reduce(&session, press.action()) {
        Ok(next) => next,
        Err(err) => {
            log::debug!("Chat {}: ignoring {}: {}", message.chat.id, press, err);
            return Ok(());
        }
    };

    let next = if press.needs_fetch() {
        edit_screen(&bot, &message, &next).await?;
        let outcome = fetch_outcome(provider.as_ref(), &arrangement).await;
        if let Action::Loaded(questions) = &outcome {
            log::info!(
                "Chat {} loaded {} questions from {}",
                message.chat.id,
                questions.len(),
                provider.describe()
            );
        }
        reduce(&next, outcome)?
    } else {
        next
    };

    dialogue.update(ChatState::Playing(next.clone())).await?;
    if let Err(err) = edit_screen(&bot, &message, &next).await {
        log::warn!(
            "Chat {}: could not edit the screen, sending it anew: {}",
            message.chat.id,
            err
        );
        send_screen(&bot, message.chat.id, &next).await?;
    }
    log::debug!(
        "Chat {} after {}: {:?}, question {}, score {}",
        message.chat.id,
        press,
        next.screen(),
        next.index() + 1,
        next.score()
    );
    Ok(())
}

/// Runs the provider and turns the result into the action that completes
/// a start or retry.
pub(crate) async fn fetch_outcome(
    provider: &dyn QuestionProvider,
    arrangement: &Arrangement,
) -> Action {
    match provider.fetch_questions().await {
        Ok(questions) => Action::Loaded(arrangement.arrange(questions)),
        Err(err) => {
            log::warn!("Fetching from {} failed: {}", provider.describe(), err);
            Action::LoadFailed(err.to_string())
        }
    }
}

async fn send_screen(bot: &Bot, chat_id: ChatId, session: &QuizState) -> HandlerResult {
    let view = render(session);
    let mut request = bot.send_message(chat_id, view.text);
    if let Some(keyboard) = view.keyboard {
        request = request.reply_markup(keyboard);
    }
    request.await?;
    Ok(())
}

async fn edit_screen(bot: &Bot, message: &Message, session: &QuizState) -> HandlerResult {
    let view = render(session);
    let mut request = bot.edit_message_text(message.chat.id, message.id, view.text);
    if let Some(keyboard) = view.keyboard {
        request = request.reply_markup(keyboard);
    }
    match request.await {
        Ok(_) => Ok(()),
        // pressing the already selected option again
        Err(RequestError::Api(ApiError::MessageNotModified)) => Ok(()),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderUnavailable;
    use crate::provider::FixedProvider;
    use crate::quiz::machine::{Notice, Screen};
    use crate::quiz::{sample_questions, Question};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fails the first call, then serves three questions.
    struct Flaky {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl QuestionProvider for Flaky {
        async fn fetch_questions(&self) -> Result<Vec<Question>, ProviderUnavailable> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(ProviderUnavailable::Status(
                    reqwest::StatusCode::SERVICE_UNAVAILABLE,
                ));
            }
            Ok(sample_questions(3))
        }

        fn describe(&self) -> String {
            "flaky test source".into()
        }
    }

    async fn press_start(session: &QuizState, provider: &dyn QuestionProvider) -> QuizState {
        let loading = reduce(session, Press::Start.action()).unwrap();
        let outcome = fetch_outcome(provider, &Arrangement::default()).await;
        reduce(&loading, outcome).unwrap()
    }

    #[tokio::test]
    async fn retry_after_failure_starts_the_quiz() {
        let provider = Flaky {
            calls: AtomicUsize::new(0),
        };

        let failed = press_start(&QuizState::new(), &provider).await;
        assert_eq!(failed.screen(), Screen::Start);
        assert!(matches!(failed.notice(), Some(Notice::Unavailable(_))));

        let retried = press_start(&failed, &provider).await;
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
        assert_eq!(retried.screen(), Screen::Quiz);
        assert!(render(&retried).text.starts_with("Pytanie 1/3"));
    }

    #[tokio::test]
    async fn empty_source_shows_no_questions() {
        let provider = FixedProvider::from_questions(Vec::new());
        let session = press_start(&QuizState::new(), &provider).await;
        assert_eq!(session.screen(), Screen::Start);
        assert_eq!(session.notice(), Some(&Notice::NoQuestions));
    }

    #[tokio::test]
    async fn builtin_source_plays_through() {
        let provider = FixedProvider::builtin();
        let mut session = press_start(&QuizState::new(), &provider).await;
        for pick in [0, 0, 2, 2, 3] {
            for press in [Press::Select(pick), Press::Confirm, Press::Next] {
                session = reduce(&session, press.action()).unwrap();
            }
        }
        assert_eq!(session.screen(), Screen::Results);
        assert_eq!(session.score(), 5);
        assert!(render(&session).text.contains("Brawo! Perfekcyjny wynik!"));
    }
}
