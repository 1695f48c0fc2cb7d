//! Web App Handler module for data sent back by the word lookup mini-app

use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tracing::{debug, info, warn};

use crate::config::MissingWordPolicy;
use crate::localization::t_lang;

use super::outbox::ChatOutbox;
use super::ui_builder::format_analysis_message;
use super::BotContext;

/// Extract the looked-up word from a mini-app payload.
///
/// Returns `None` for invalid JSON, a missing or non-string `word`, or a
/// blank word.
pub fn extract_word(payload: &str) -> Option<String> {
    let parsed: serde_json::Value = serde_json::from_str(payload).ok()?;
    match parsed.get("word")? {
        serde_json::Value::String(word) => {
            let word = word.trim();
            if word.is_empty() {
                None
            } else {
                Some(word.to_string())
            }
        }
        _ => None,
    }
}

/// Dispatcher endpoint for web app data messages
pub async fn web_app_handler(bot: Bot, msg: Message, ctx: Arc<BotContext>) -> Result<()> {
    let Some(data) = msg.web_app_data() else {
        return Ok(());
    };

    let language_code = msg
        .from
        .as_ref()
        .and_then(|user| user.language_code.as_deref());

    handle_web_app_payload(&ctx, &bot, msg.chat.id, &data.data, language_code).await
}

/// Analyze the word in `payload` and reply with the formatted result
pub async fn handle_web_app_payload(
    ctx: &BotContext,
    outbox: &dyn ChatOutbox,
    chat_id: ChatId,
    payload: &str,
    language_code: Option<&str>,
) -> Result<()> {
    debug!(user_id = %chat_id, payload_length = payload.len(), "Received mini-app data");

    let Some(word) = extract_word(payload) else {
        warn!(user_id = %chat_id, "Mini-app payload has no usable word");
        if ctx.config.missing_word_policy == MissingWordPolicy::Notify {
            outbox
                .post_text(chat_id, t_lang("analysis-missing-word", language_code), None, None)
                .await?;
        }
        return Ok(());
    };

    let analysis = ctx.analyzer.analyze(&word, language_code).await;
    let reply = format_analysis_message(&word, &analysis, language_code);

    outbox
        .post_text(chat_id, reply, Some(ParseMode::Html), None)
        .await?;

    info!(user_id = %chat_id, word = %word, placeholder = analysis.is_sentinel(), "Word analysis sent");
    Ok(())
}
