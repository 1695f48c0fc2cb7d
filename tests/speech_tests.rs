mod common;

use std::io::Write;
use std::time::Duration;

use mockito::Matcher;
use serde_json::json;

use hebrew_tutor_bot::config::ElevenLabsConfig;
use hebrew_tutor_bot::errors::BotError;
use hebrew_tutor_bot::speech::{ElevenLabsClient, SpeechSynthesizer};

const SYNTHESIS_PATH: &str = "/text-to-speech/voice-123";

fn client_for(base_url: &str, timeout: Duration) -> ElevenLabsClient {
    ElevenLabsClient::new(ElevenLabsConfig {
        api_key: "xi-test".to_string(),
        voice_id: "voice-123".to_string(),
        base_url: base_url.to_string(),
        timeout,
    })
    .expect("client builds")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_synthesize_returns_audio_bytes() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", SYNTHESIS_PATH)
            .match_header("xi-api-key", "xi-test")
            .match_header("accept", "audio/mpeg")
            .match_body(Matcher::PartialJson(json!({
                "text": "שלום",
                "voice_settings": { "stability": 0.5, "similarity_boost": 0.8 }
            })))
            .with_status(200)
            .with_header("content-type", "audio/mpeg")
            .with_body(b"ID3\x03fake-mp3")
            .expect(1)
            .create_async()
            .await;
        let client = client_for(&server.url(), Duration::from_secs(5));

        let audio = client.synthesize("שלום").await.unwrap();

        assert_eq!(audio, b"ID3\x03fake-mp3");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_is_not_audio() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", SYNTHESIS_PATH)
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"detail":"invalid api key"}"#)
            .create_async()
            .await;
        let client = client_for(&server.url(), Duration::from_secs(5));

        let err = client.synthesize("שלום").await.unwrap_err();
        match err {
            BotError::Status { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("invalid api key"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_audio_rejected() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", SYNTHESIS_PATH)
            .with_status(200)
            .with_header("content-type", "audio/mpeg")
            .with_body("")
            .create_async()
            .await;
        let client = client_for(&server.url(), Duration::from_secs(5));

        assert_eq!(client.synthesize("שלום").await, Err(BotError::EmptyAudio));
    }

    #[tokio::test]
    async fn test_slow_backend_times_out() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", SYNTHESIS_PATH)
            .with_status(200)
            .with_header("content-type", "audio/mpeg")
            .with_chunked_body(|w| {
                std::thread::sleep(Duration::from_secs(2));
                w.write_all(b"ID3")
            })
            .create_async()
            .await;
        let timeout = Duration::from_millis(200);
        let client = client_for(&server.url(), timeout);

        let started = std::time::Instant::now();
        let err = client.synthesize("שלום").await.unwrap_err();
        assert_eq!(err, BotError::Timeout(timeout));
        assert!(err.is_transport());
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        // Bind and drop to get a port nothing listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(&format!("http://{addr}"), Duration::from_secs(5));
        let err = client.synthesize("שלום").await.unwrap_err();
        assert!(matches!(err, BotError::Transport(_)));
    }
}
