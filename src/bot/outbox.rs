//! Outbox module: the outbound Telegram operations handlers rely on
//!
//! Handlers talk to a [`ChatOutbox`] instead of `Bot` directly so the flows
//! can be exercised without a Telegram connection.

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{CallbackQueryId, InlineKeyboardMarkup, InputFile, MessageId, ParseMode};

#[async_trait]
pub trait ChatOutbox: Send + Sync {
    /// Send a text message, optionally formatted and with an inline keyboard
    async fn post_text(
        &self,
        chat_id: ChatId,
        text: String,
        parse_mode: Option<ParseMode>,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<()>;

    /// Upload the audio file at `path` as a voice message
    async fn post_voice(
        &self,
        chat_id: ChatId,
        path: &Path,
        caption: String,
        keyboard: InlineKeyboardMarkup,
    ) -> Result<()>;

    /// Replace the text and keyboard of an existing message
    async fn edit_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: String,
        parse_mode: Option<ParseMode>,
        keyboard: InlineKeyboardMarkup,
    ) -> Result<()>;

    /// Replace the caption and keyboard of an existing media message
    async fn edit_caption(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        caption: String,
        parse_mode: Option<ParseMode>,
        keyboard: InlineKeyboardMarkup,
    ) -> Result<()>;

    /// Acknowledge a button press so the client stops showing its spinner
    async fn answer_callback(&self, query_id: CallbackQueryId) -> Result<()>;
}

#[async_trait]
impl ChatOutbox for Bot {
    async fn post_text(
        &self,
        chat_id: ChatId,
        text: String,
        parse_mode: Option<ParseMode>,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<()> {
        let mut request = self.send_message(chat_id, text);
        if let Some(mode) = parse_mode {
            request = request.parse_mode(mode);
        }
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(keyboard);
        }
        request.await?;
        Ok(())
    }

    async fn post_voice(
        &self,
        chat_id: ChatId,
        path: &Path,
        caption: String,
        keyboard: InlineKeyboardMarkup,
    ) -> Result<()> {
        self.send_voice(chat_id, InputFile::file(path.to_path_buf()))
            .caption(caption)
            .reply_markup(keyboard)
            .await?;
        Ok(())
    }

    async fn edit_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: String,
        parse_mode: Option<ParseMode>,
        keyboard: InlineKeyboardMarkup,
    ) -> Result<()> {
        let mut request = self
            .edit_message_text(chat_id, message_id, text)
            .reply_markup(keyboard);
        if let Some(mode) = parse_mode {
            request = request.parse_mode(mode);
        }
        request.await?;
        Ok(())
    }

    async fn edit_caption(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        caption: String,
        parse_mode: Option<ParseMode>,
        keyboard: InlineKeyboardMarkup,
    ) -> Result<()> {
        let mut request = self
            .edit_message_caption(chat_id, message_id)
            .caption(caption)
            .reply_markup(keyboard);
        if let Some(mode) = parse_mode {
            request = request.parse_mode(mode);
        }
        request.await?;
        Ok(())
    }

    async fn answer_callback(&self, query_id: CallbackQueryId) -> Result<()> {
        self.answer_callback_query(query_id).await?;
        Ok(())
    }
}
