//! # Bot Error Types Module
//!
//! Structured errors for configuration loading and the two third-party
//! APIs the bot talks to (speech synthesis and the language model).

use std::time::Duration;

/// Custom error types for bot operations
#[derive(Debug, Clone, PartialEq)]
pub enum BotError {
    /// Missing or invalid configuration, fatal at startup
    Configuration(String),
    /// Network failure talking to a third-party API
    Transport(String),
    /// The outbound call did not complete within its timeout
    Timeout(Duration),
    /// The API answered with a non-success HTTP status
    Status { status: u16, body: String },
    /// The API answered but the payload could not be understood
    Parse(String),
    /// Speech synthesis returned a success status with no audio
    EmptyAudio,
}

impl std::fmt::Display for BotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BotError::Configuration(msg) => write!(f, "Configuration error: {msg}"),
            BotError::Transport(msg) => write!(f, "Transport error: {msg}"),
            BotError::Timeout(after) => {
                write!(f, "Timeout error: no response after {}s", after.as_secs_f32())
            }
            BotError::Status { status, body } => {
                write!(f, "API error (HTTP {status}): {body}")
            }
            BotError::Parse(msg) => write!(f, "Parse error: {msg}"),
            BotError::EmptyAudio => write!(f, "Speech synthesis returned no audio"),
        }
    }
}

impl std::error::Error for BotError {}

impl BotError {
    /// Classify a reqwest failure, keeping timeouts distinct from other transport errors
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            BotError::Timeout(timeout)
        } else {
            BotError::Transport(err.to_string())
        }
    }

    /// Whether the failure happened on the wire rather than in the payload
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            BotError::Transport(_) | BotError::Timeout(_) | BotError::Status { .. }
        )
    }
}
