mod config;
mod error;
mod handlers;
mod provider;
mod quiz;
mod view;

use dotenv::dotenv;
use teloxide::{dispatching::dialogue::InMemStorage, prelude::*, utils::command::BotCommands};

use config::Config;
use handlers::{ChatState, Command};

#[tokio::main]
async fn main() {
    let dotenv_loaded = dotenv().is_ok();

    pretty_env_logger::init();
    log::info!("Starting quiz bot...");
    if !dotenv_loaded {
        log::debug!("No .env file found, using the process environment");
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            log::error!("Invalid configuration: {}", err);
            std::process::exit(1);
        }
    };
    let provider = match provider::from_config(&config) {
        Ok(provider) => provider,
        Err(err) => {
            log::error!("Cannot set up the question source: {}", err);
            std::process::exit(1);
        }
    };
    log::info!("Questions come from the {}", provider.describe());

    if std::env::var("TELOXIDE_TOKEN").is_err() {
        log::error!("TELOXIDE_TOKEN is not set");
        std::process::exit(1);
    }
    let bot = Bot::from_env();

    if let Err(err) = bot.set_my_commands(Command::bot_commands()).await {
        log::warn!("Could not register the command list: {}", err);
    }

    Dispatcher::builder(bot, handlers::schema())
        .dependencies(dptree::deps![
            InMemStorage::<ChatState>::new(),
            provider,
            config.arrangement
        ])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
