//! # Word Analysis Module
//!
//! Asks a chat-completion model for the transcription, translation and
//! explanation of a Hebrew word. The model reply is parsed strictly as JSON;
//! any failure degrades to a placeholder result so callers always have
//! something to show.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::config::OpenAiConfig;
use crate::errors::BotError;
use crate::localization::t_args_lang;

/// Placeholder for any field the model did not provide
pub const NOT_AVAILABLE: &str = "N/A";

/// Sampling temperature for analysis requests
pub const ANALYSIS_TEMPERATURE: f32 = 0.3;

const FORMAT_INSTRUCTION: &str = "Reply with exactly one JSON object and nothing else, \
using double-quoted keys \"transcription\", \"translation\" and \"explanation\", \
each with a string value.";

/// Structured analysis of a single word
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WordAnalysis {
    #[serde(default = "not_available")]
    pub transcription: String,
    #[serde(default = "not_available")]
    pub translation: String,
    #[serde(default = "not_available")]
    pub explanation: String,
}

fn not_available() -> String {
    NOT_AVAILABLE.to_string()
}

impl WordAnalysis {
    /// Result used whenever analysis fails
    pub fn sentinel() -> Self {
        Self {
            transcription: not_available(),
            translation: not_available(),
            explanation: not_available(),
        }
    }

    pub fn is_sentinel(&self) -> bool {
        *self == Self::sentinel()
    }
}

/// Parse a model reply into a [`WordAnalysis`].
///
/// The first JSON object in the reply is read and anything after it is
/// ignored, so prose or code fences around the object are tolerated. Absent
/// keys fall back to [`NOT_AVAILABLE`] individually; anything that is not an
/// object of strings is an error.
pub fn parse_analysis(reply: &str) -> Result<WordAnalysis, BotError> {
    let start = reply
        .find('{')
        .ok_or_else(|| BotError::Parse("reply contains no JSON object".to_string()))?;

    serde_json::Deserializer::from_str(&reply[start..])
        .into_iter::<WordAnalysis>()
        .next()
        .ok_or_else(|| BotError::Parse("reply contains no JSON object".to_string()))?
        .map_err(|e| BotError::Parse(e.to_string()))
}

/// Prompt sent to the model for `word`, localized to the user's language
pub fn build_prompt(word: &str, language_code: Option<&str>) -> String {
    format!(
        "{}\n{}",
        t_args_lang("analysis-prompt", &[("word", word)], language_code),
        FORMAT_INSTRUCTION
    )
}

/// A chat-completion backend answering a single user prompt
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, BotError>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

/// OpenAI-compatible chat completion client
pub struct OpenAiClient {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Result<Self, BotError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BotError::Configuration(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl LanguageModel for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String, BotError> {
        let url = format!("{}/chat/completions", self.config.base_url);
        debug!(url = %url, model = %self.config.model, "Sending completion request");

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: ANALYSIS_TEMPERATURE,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| BotError::from_reqwest(e, self.config.timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BotError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| BotError::from_reqwest(e, self.config.timeout))?;
        let chat_response: ChatResponse = serde_json::from_slice(&body)
            .map_err(|e| BotError::Parse(format!("unexpected completion body: {e}")))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| BotError::Parse("completion has no content".to_string()))
    }
}

/// Word analysis adapter: never fails outward
#[derive(Clone)]
pub struct WordAnalyzer {
    model: Arc<dyn LanguageModel>,
}

impl WordAnalyzer {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Analyze `word`, returning the sentinel result on any failure
    pub async fn analyze(&self, word: &str, language_code: Option<&str>) -> WordAnalysis {
        let prompt = build_prompt(word, language_code);

        let result = match self.model.complete(&prompt).await {
            Ok(reply) => parse_analysis(&reply),
            Err(e) => Err(e),
        };

        match result {
            Ok(analysis) => {
                info!(word = %word, "Word analysis completed");
                analysis
            }
            Err(e) => {
                error!(word = %word, error = %e, "Word analysis failed, using placeholder result");
                WordAnalysis::sentinel()
            }
        }
    }
}
