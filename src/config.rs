//! # Configuration Module
//!
//! Loads credentials and tunables from the process environment. Every
//! required variable is checked at startup so a bad deployment fails before
//! the dispatcher starts polling.

use std::time::Duration;

use reqwest::Url;

use crate::errors::BotError;

// Constants for configuration defaults
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_ELEVENLABS_VOICE_ID: &str = "21m00Tcm4TlvDq8ikWAM";
pub const DEFAULT_ELEVENLABS_BASE_URL: &str = "https://api.elevenlabs.io/v1";
pub const DEFAULT_ELEVENLABS_TIMEOUT_SECS: u64 = 30;

const REQUIRED_VARS: [&str; 4] = [
    "TELEGRAM_BOT_TOKEN",
    "OPENAI_API_KEY",
    "ELEVENLABS_API_KEY",
    "WEBAPP_URL",
];

/// What to do when a mini-app payload carries no usable word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingWordPolicy {
    /// Drop the payload without replying
    #[default]
    Ignore,
    /// Tell the user the word could not be read
    Notify,
}

impl std::str::FromStr for MissingWordPolicy {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(MissingWordPolicy::Ignore),
            "notify" => Ok(MissingWordPolicy::Notify),
            other => Err(BotError::Configuration(format!(
                "MISSING_WORD_POLICY must be 'ignore' or 'notify', got '{other}'"
            ))),
        }
    }
}

/// Language model endpoint settings
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

/// Speech synthesis endpoint settings
#[derive(Debug, Clone)]
pub struct ElevenLabsConfig {
    pub api_key: String,
    pub voice_id: String,
    pub base_url: String,
    pub timeout: Duration,
}

/// Complete bot configuration
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub telegram_token: String,
    /// Mini-app launched by the word lookup button
    pub webapp_url: Url,
    pub openai: OpenAiConfig,
    pub elevenlabs: ElevenLabsConfig,
    pub missing_word_policy: MissingWordPolicy,
}

impl BotConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self, BotError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Blank values count as missing. All missing required keys are reported
    /// in a single error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BotError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let missing: Vec<&str> = REQUIRED_VARS
            .iter()
            .copied()
            .filter(|key| get(*key).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(BotError::Configuration(format!(
                "missing required environment variables: {}",
                missing.join(", ")
            )));
        }
        let required = |key: &str| get(key).unwrap_or_default();

        let webapp_url = parse_webapp_url(&required("WEBAPP_URL"))?;

        let missing_word_policy = match get("MISSING_WORD_POLICY") {
            Some(value) => value.parse()?,
            None => MissingWordPolicy::default(),
        };

        Ok(Self {
            telegram_token: required("TELEGRAM_BOT_TOKEN"),
            webapp_url,
            openai: OpenAiConfig {
                api_key: required("OPENAI_API_KEY"),
                model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
                base_url: trim_base_url(
                    get("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
                ),
                timeout: parse_timeout(
                    "OPENAI_TIMEOUT_SECS",
                    get("OPENAI_TIMEOUT_SECS"),
                    DEFAULT_OPENAI_TIMEOUT_SECS,
                )?,
            },
            elevenlabs: ElevenLabsConfig {
                api_key: required("ELEVENLABS_API_KEY"),
                voice_id: get("ELEVENLABS_VOICE_ID")
                    .unwrap_or_else(|| DEFAULT_ELEVENLABS_VOICE_ID.to_string()),
                base_url: trim_base_url(
                    get("ELEVENLABS_BASE_URL")
                        .unwrap_or_else(|| DEFAULT_ELEVENLABS_BASE_URL.to_string()),
                ),
                timeout: parse_timeout(
                    "ELEVENLABS_TIMEOUT_SECS",
                    get("ELEVENLABS_TIMEOUT_SECS"),
                    DEFAULT_ELEVENLABS_TIMEOUT_SECS,
                )?,
            },
            missing_word_policy,
        })
    }
}

fn parse_webapp_url(raw: &str) -> Result<Url, BotError> {
    let url = Url::parse(raw)
        .map_err(|e| BotError::Configuration(format!("WEBAPP_URL is not a valid URL: {e}")))?;
    // Telegram only opens mini-apps over HTTPS
    if url.scheme() != "https" {
        return Err(BotError::Configuration(format!(
            "WEBAPP_URL must use https, got '{}'",
            url.scheme()
        )));
    }
    Ok(url)
}

fn parse_timeout(key: &str, value: Option<String>, default_secs: u64) -> Result<Duration, BotError> {
    let secs = match value {
        Some(raw) => raw.parse::<u64>().map_err(|_| {
            BotError::Configuration(format!("{key} must be a whole number of seconds, got '{raw}'"))
        })?,
        None => default_secs,
    };
    if secs == 0 {
        return Err(BotError::Configuration(format!("{key} must be greater than zero")));
    }
    Ok(Duration::from_secs(secs))
}

fn trim_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
