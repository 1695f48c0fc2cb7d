//! # Greeting Module
//!
//! Sends the spoken Hebrew greeting as a Telegram voice message.

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::Url;
use tempfile::NamedTempFile;
use teloxide::types::ChatId;
use tracing::{debug, info};

use crate::bot::outbox::ChatOutbox;
use crate::bot::ui_builder::create_main_menu_keyboard;
use crate::localization::t_lang;
use crate::speech::SpeechSynthesizer;

/// Greeting spoken to every new user
pub const HEBREW_GREETING: &str =
    "שלום! אני הבוט שלך ללימוד עברית. שלח לי הודעת קול ואני אעזור לך.";

/// Synthesizes the greeting and uploads it as a voice message
#[derive(Clone)]
pub struct GreetingSender {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    webapp_url: Url,
}

impl GreetingSender {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>, webapp_url: Url) -> Self {
        Self {
            synthesizer,
            webapp_url,
        }
    }

    /// Deliver one voice greeting with the main menu keyboard to `chat_id`.
    ///
    /// The audio is staged in a temp file unique to this call; the file is
    /// removed when this function returns, whether the upload succeeded or not.
    pub async fn send(
        &self,
        outbox: &dyn ChatOutbox,
        chat_id: ChatId,
        language_code: Option<&str>,
    ) -> Result<()> {
        let audio = self
            .synthesizer
            .synthesize(HEBREW_GREETING)
            .await
            .context("Failed to synthesize greeting")?;

        let audio_bytes = audio.len();
        let voice_file = tokio::task::spawn_blocking(move || write_voice_file(chat_id, &audio))
            .await
            .context("Greeting staging task failed")??;
        debug!(
            user_id = %chat_id,
            temp_path = %voice_file.path().display(),
            "Greeting audio staged"
        );

        outbox
            .post_voice(
                chat_id,
                voice_file.path(),
                t_lang("greeting-caption", language_code),
                create_main_menu_keyboard(&self.webapp_url, language_code),
            )
            .await
            .context("Failed to upload greeting voice message")?;

        info!(user_id = %chat_id, audio_bytes, "Voice greeting sent");
        Ok(())
    }
}

/// Stage audio in a fresh temp file named after the chat plus a random suffix.
///
/// Blocking file IO; run it off the async workers.
fn write_voice_file(chat_id: ChatId, audio: &[u8]) -> Result<NamedTempFile> {
    let mut temp_file = tempfile::Builder::new()
        .prefix(&format!("greeting-{}-", chat_id.0))
        .suffix(".mp3")
        .tempfile()
        .context("Failed to create temporary greeting file")?;
    temp_file
        .as_file_mut()
        .write_all(audio)
        .context("Failed to write greeting audio")?;
    temp_file
        .as_file_mut()
        .flush()
        .context("Failed to flush greeting audio")?;
    Ok(temp_file)
}
