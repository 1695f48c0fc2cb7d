//! Command Handler module for the `/start` command

use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use tracing::{debug, error};

use crate::localization::t_lang;

use super::outbox::ChatOutbox;
use super::ui_builder::create_main_menu_keyboard;
use super::BotContext;

/// Whether `text` is `/start`, `/start@BotName` or `/start <payload>`
pub fn is_start_command(text: &str) -> bool {
    text.split_whitespace()
        .next()
        .and_then(|command| command.split('@').next())
        .is_some_and(|command| command == "/start")
}

/// Dispatcher endpoint for `/start`
pub async fn start_handler(bot: Bot, msg: Message, ctx: Arc<BotContext>) -> Result<()> {
    let language_code = msg
        .from
        .as_ref()
        .and_then(|user| user.language_code.as_deref());

    debug!(user_id = %msg.chat.id, "Received /start");
    handle_start(&ctx, &bot, msg.chat.id, language_code).await
}

/// Welcome text with the main menu, followed by the voice greeting.
///
/// A failed greeting is reported to the user as a text message instead of
/// failing the update.
pub async fn handle_start(
    ctx: &BotContext,
    outbox: &dyn ChatOutbox,
    chat_id: ChatId,
    language_code: Option<&str>,
) -> Result<()> {
    outbox
        .post_text(
            chat_id,
            t_lang("welcome", language_code),
            None,
            Some(create_main_menu_keyboard(
                &ctx.config.webapp_url,
                language_code,
            )),
        )
        .await?;

    if let Err(e) = ctx.greeter.send(outbox, chat_id, language_code).await {
        error!(user_id = %chat_id, error = ?e, "Failed to send voice greeting");
        outbox
            .post_text(chat_id, t_lang("greeting-failed", language_code), None, None)
            .await?;
    }

    Ok(())
}
