//! Shared fakes for the integration tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use teloxide::types::{CallbackQueryId, ChatId, InlineKeyboardMarkup, MessageId, ParseMode};

use hebrew_tutor_bot::analysis::{LanguageModel, WordAnalyzer};
use hebrew_tutor_bot::bot::outbox::ChatOutbox;
use hebrew_tutor_bot::bot::BotContext;
use hebrew_tutor_bot::config::BotConfig;
use hebrew_tutor_bot::errors::BotError;
use hebrew_tutor_bot::greeting::GreetingSender;
use hebrew_tutor_bot::localization::init_localization;
use hebrew_tutor_bot::speech::SpeechSynthesizer;

/// One outbound Telegram call captured by [`RecordingOutbox`]
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Text {
        chat_id: ChatId,
        text: String,
        parse_mode: Option<ParseMode>,
        keyboard: Option<InlineKeyboardMarkup>,
    },
    Voice {
        chat_id: ChatId,
        path: PathBuf,
        audio: Vec<u8>,
        caption: String,
    },
    EditText {
        chat_id: ChatId,
        message_id: MessageId,
        text: String,
        parse_mode: Option<ParseMode>,
        keyboard: InlineKeyboardMarkup,
    },
    EditCaption {
        chat_id: ChatId,
        message_id: MessageId,
        text: String,
        parse_mode: Option<ParseMode>,
        keyboard: InlineKeyboardMarkup,
    },
    Answer {
        query_id: CallbackQueryId,
    },
}

/// Outbox that records every call instead of talking to Telegram
#[derive(Default)]
pub struct RecordingOutbox {
    sent: Mutex<Vec<Sent>>,
    /// Make voice uploads fail after the file has been read
    pub fail_voice: bool,
    /// Hold each voice upload open this long before finishing
    pub upload_delay: Option<Duration>,
}

impl RecordingOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_voice() -> Self {
        Self {
            fail_voice: true,
            ..Self::default()
        }
    }

    pub fn slow_uploads(delay: Duration) -> Self {
        Self {
            upload_delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn voices(&self) -> Vec<(ChatId, PathBuf, Vec<u8>)> {
        self.sent()
            .into_iter()
            .filter_map(|sent| match sent {
                Sent::Voice {
                    chat_id,
                    path,
                    audio,
                    ..
                } => Some((chat_id, path, audio)),
                _ => None,
            })
            .collect()
    }

    /// Callback queries acknowledged so far
    pub fn answers(&self) -> Vec<CallbackQueryId> {
        self.sent()
            .into_iter()
            .filter_map(|sent| match sent {
                Sent::Answer { query_id } => Some(query_id),
                _ => None,
            })
            .collect()
    }

    fn record(&self, sent: Sent) {
        self.sent.lock().unwrap().push(sent);
    }
}

#[async_trait]
impl ChatOutbox for RecordingOutbox {
    async fn post_text(
        &self,
        chat_id: ChatId,
        text: String,
        parse_mode: Option<ParseMode>,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<()> {
        self.record(Sent::Text {
            chat_id,
            text,
            parse_mode,
            keyboard,
        });
        Ok(())
    }

    async fn post_voice(
        &self,
        chat_id: ChatId,
        path: &Path,
        caption: String,
        _keyboard: InlineKeyboardMarkup,
    ) -> Result<()> {
        let audio = std::fs::read(path)?;
        if let Some(delay) = self.upload_delay {
            tokio::time::sleep(delay).await;
            // The staged file must not change while the upload is in flight
            assert_eq!(std::fs::read(path)?, audio, "greeting file changed during upload");
        }
        self.record(Sent::Voice {
            chat_id,
            path: path.to_path_buf(),
            audio,
            caption,
        });
        if self.fail_voice {
            anyhow::bail!("simulated upload failure");
        }
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
        self.record(Sent::EditText {
            chat_id,
            message_id,
            text,
            parse_mode,
            keyboard,
        });
        Ok(())
    }

    async fn edit_caption(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: String,
        parse_mode: Option<ParseMode>,
        keyboard: InlineKeyboardMarkup,
    ) -> Result<()> {
        self.record(Sent::EditCaption {
            chat_id,
            message_id,
            text,
            parse_mode,
            keyboard,
        });
        Ok(())
    }

    async fn answer_callback(&self, query_id: CallbackQueryId) -> Result<()> {
        self.record(Sent::Answer { query_id });
        Ok(())
    }
}

/// Synthesizer returning distinct audio on every call
#[derive(Default)]
pub struct FakeSynthesizer {
    calls: AtomicUsize,
    pub fail: bool,
}

impl FakeSynthesizer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechSynthesizer for FakeSynthesizer {
    async fn synthesize(&self, _text: &str) -> Result<Vec<u8>, BotError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(5)).await;
        if self.fail {
            return Err(BotError::Timeout(Duration::from_secs(30)));
        }
        Ok(format!("ID3-audio-{call}").into_bytes())
    }
}

/// Language model answering every prompt with the same canned reply
pub struct FakeModel {
    reply: Result<String, BotError>,
    prompts: Mutex<Vec<String>>,
}

impl FakeModel {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(err: BotError) -> Self {
        Self {
            reply: Err(err),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for FakeModel {
    async fn complete(&self, prompt: &str) -> Result<String, BotError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone()
    }
}

pub const SHALOM_REPLY: &str =
    r#"{"transcription":"shalom","translation":"hello","explanation":"a greeting"}"#;

pub fn test_config(extra: &[(&str, &str)]) -> BotConfig {
    let mut env: HashMap<String, String> = [
        ("TELEGRAM_BOT_TOKEN", "123:abc"),
        ("OPENAI_API_KEY", "sk-test"),
        ("ELEVENLABS_API_KEY", "xi-test"),
        ("WEBAPP_URL", "https://example.org/webapp"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    for (k, v) in extra {
        env.insert(k.to_string(), v.to_string());
    }
    BotConfig::from_lookup(|key| env.get(key).cloned()).expect("test config is valid")
}

pub fn test_context(
    config: BotConfig,
    synthesizer: Arc<FakeSynthesizer>,
    model: Arc<FakeModel>,
) -> BotContext {
    init_localization().expect("translations load");
    let webapp_url = config.webapp_url.clone();
    BotContext::new(
        Arc::new(config),
        GreetingSender::new(synthesizer, webapp_url),
        WordAnalyzer::new(model),
    )
}
