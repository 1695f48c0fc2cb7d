use anyhow::{Context, Result};
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hebrew_tutor_bot::analysis::{OpenAiClient, WordAnalyzer};
use hebrew_tutor_bot::bot::{self, BotContext};
use hebrew_tutor_bot::config::BotConfig;
use hebrew_tutor_bot::greeting::GreetingSender;
use hebrew_tutor_bot::localization::init_localization;
use hebrew_tutor_bot::speech::ElevenLabsClient;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    init_tracing();

    info!("Starting Hebrew tutor Telegram bot");

    let config = Arc::new(BotConfig::from_env().context("Invalid configuration")?);
    init_localization().context("Failed to load translations")?;

    info!(webapp_url = %config.webapp_url, "Mini-app URL configured");
    info!(model = %config.openai.model, "Language model configured");

    let synthesizer = ElevenLabsClient::new(config.elevenlabs.clone())
        .context("Failed to create speech synthesis client")?;
    let model =
        OpenAiClient::new(config.openai.clone()).context("Failed to create language model client")?;

    let context = Arc::new(BotContext::new(
        Arc::clone(&config),
        GreetingSender::new(Arc::new(synthesizer), config.webapp_url.clone()),
        WordAnalyzer::new(Arc::new(model)),
    ));

    let bot = Bot::new(&config.telegram_token);

    info!("Bot initialized, starting dispatcher");

    Dispatcher::builder(bot, bot::schema())
        .dependencies(dptree::deps![context])
        .default_handler(|upd| async move {
            debug!(update_id = ?upd.id, "Unhandled update");
        })
        .error_handler(LoggingErrorHandler::with_custom_text(
            "An error has occurred in the dispatcher",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
