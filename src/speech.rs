//! # Speech Synthesis Module
//!
//! Turns text into spoken audio through the ElevenLabs text-to-speech API.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::ElevenLabsConfig;
use crate::errors::BotError;

// Voice tuning sent with every request
pub const VOICE_STABILITY: f32 = 0.5;
pub const VOICE_SIMILARITY_BOOST: f32 = 0.8;

/// Anything that can turn text into audio bytes
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text`, returning the encoded audio (MP3 for ElevenLabs)
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, BotError>;
}

#[derive(Debug, Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
}

#[derive(Debug, Serialize)]
struct SynthesisRequest<'a> {
    text: &'a str,
    voice_settings: VoiceSettings,
}

/// ElevenLabs text-to-speech client
pub struct ElevenLabsClient {
    client: reqwest::Client,
    config: ElevenLabsConfig,
}

impl ElevenLabsClient {
    pub fn new(config: ElevenLabsConfig) -> Result<Self, BotError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BotError::Configuration(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/text-to-speech/{}",
            self.config.base_url, self.config.voice_id
        )
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsClient {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, BotError> {
        let url = self.endpoint();
        debug!(url = %url, text_length = text.len(), "Sending speech synthesis request");

        let request = SynthesisRequest {
            text,
            voice_settings: VoiceSettings {
                stability: VOICE_STABILITY,
                similarity_boost: VOICE_SIMILARITY_BOOST,
            },
        };

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", &self.config.api_key)
            .header("Accept", "audio/mpeg")
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

        let audio = response
            .bytes()
            .await
            .map_err(|e| BotError::from_reqwest(e, self.config.timeout))?;
        if audio.is_empty() {
            return Err(BotError::EmptyAudio);
        }

        info!(audio_bytes = audio.len(), "Speech synthesis completed");
        Ok(audio.to_vec())
    }
}
