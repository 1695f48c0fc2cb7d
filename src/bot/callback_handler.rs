//! Callback Handler module for processing inline keyboard callback queries

use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, CallbackQueryId, InlineKeyboardMarkup, MessageId, ParseMode};
use tracing::{debug, error};

use crate::localization::t_lang;

use super::outbox::ChatOutbox;
use super::ui_builder::{create_back_keyboard, create_main_menu_keyboard, CallbackAction};
use super::BotContext;

/// Which part of the pressed message carries its text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    /// Plain text message (the welcome message)
    Text,
    /// Media caption (the voice greeting)
    Caption,
}

impl EditTarget {
    /// Messages without text are media whose caption is edited instead
    pub fn for_message(has_text: bool) -> Self {
        if has_text {
            EditTarget::Text
        } else {
            EditTarget::Caption
        }
    }
}

/// The message an inline button was pressed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressedMessage {
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub has_text: bool,
}

impl PressedMessage {
    /// The pressed message, if the bot can still edit it
    pub fn from_query(q: &CallbackQuery) -> Option<Self> {
        let message = q.message.as_ref()?.regular_message()?;
        Some(Self {
            chat_id: message.chat.id,
            message_id: message.id,
            has_text: message.text().is_some(),
        })
    }
}

/// Handle callback queries from inline keyboards
pub async fn callback_handler(bot: Bot, q: CallbackQuery, ctx: Arc<BotContext>) -> Result<()> {
    debug!(user_id = %q.from.id, data = ?q.data, "Received callback query from user");

    handle_callback(
        &ctx,
        &bot,
        q.id.clone(),
        q.data.as_deref(),
        PressedMessage::from_query(&q),
        q.from.language_code.as_deref(),
    )
    .await
}

/// Acknowledge a button press, then act on it when the data and message allow.
///
/// Every press is answered, including unknown data and presses on messages
/// the bot can no longer edit. Edit failures are logged, not returned.
pub async fn handle_callback(
    ctx: &BotContext,
    outbox: &dyn ChatOutbox,
    query_id: CallbackQueryId,
    data: Option<&str>,
    pressed: Option<PressedMessage>,
    language_code: Option<&str>,
) -> Result<()> {
    // Answer first so the client stops showing the loading state
    outbox.answer_callback(query_id).await?;

    let Some(action) = data.and_then(CallbackAction::parse) else {
        debug!(data = ?data, "Ignoring unknown callback data");
        return Ok(());
    };

    let Some(pressed) = pressed else {
        debug!(action = ?action, "Callback message is no longer accessible");
        return Ok(());
    };

    if let Err(e) = handle_callback_action(
        ctx,
        outbox,
        action,
        pressed.chat_id,
        pressed.message_id,
        EditTarget::for_message(pressed.has_text),
        language_code,
    )
    .await
    {
        error!(user_id = %pressed.chat_id, error = ?e, "Failed to edit message for callback");
    }

    Ok(())
}

/// Edit the pressed message in place for the chosen action
pub async fn handle_callback_action(
    ctx: &BotContext,
    outbox: &dyn ChatOutbox,
    action: CallbackAction,
    chat_id: ChatId,
    message_id: MessageId,
    target: EditTarget,
    language_code: Option<&str>,
) -> Result<()> {
    let (text, parse_mode, keyboard) = match action {
        CallbackAction::Help => (
            t_lang("help-text", language_code),
            Some(ParseMode::Html),
            create_back_keyboard(language_code),
        ),
        CallbackAction::BackToMain => (
            t_lang("main-menu", language_code),
            None,
            create_main_menu_keyboard(&ctx.config.webapp_url, language_code),
        ),
    };

    edit_message(outbox, chat_id, message_id, target, text, parse_mode, keyboard).await
}

async fn edit_message(
    outbox: &dyn ChatOutbox,
    chat_id: ChatId,
    message_id: MessageId,
    target: EditTarget,
    text: String,
    parse_mode: Option<ParseMode>,
    keyboard: InlineKeyboardMarkup,
) -> Result<()> {
    match target {
        EditTarget::Text => {
            outbox
                .edit_text(chat_id, message_id, text, parse_mode, keyboard)
                .await
        }
        EditTarget::Caption => {
            outbox
                .edit_caption(chat_id, message_id, text, parse_mode, keyboard)
                .await
        }
    }
}
