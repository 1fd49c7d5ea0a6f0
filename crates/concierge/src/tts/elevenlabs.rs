use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

use super::base::{Audio, SpeechProvider, SpeechRequest};
use super::configs::{ElevenLabsConfig, VoiceCredential};
use crate::errors::TtsError;

pub struct ElevenLabsProvider {
    client: Client,
    config: ElevenLabsConfig,
}

impl ElevenLabsProvider {
    pub fn new(config: ElevenLabsConfig) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(60)).build()?;

        Ok(Self { client, config })
    }

    async fn post(
        &self,
        credential: &VoiceCredential,
        voice_id: &str,
        text: &str,
    ) -> Result<Audio, TtsError> {
        let url = format!(
            "{}/v1/text-to-speech/{}",
            self.config.host.trim_end_matches('/'),
            voice_id
        );

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", &credential.api_key)
            .header("Accept", "audio/mpeg")
            .json(&json!({
                "text": text,
                "model_id": self.config.model_id,
            }))
            .send()
            .await?;

        Audio::from_response(response).await
    }
}

#[async_trait]
impl SpeechProvider for ElevenLabsProvider {
    fn name(&self) -> &'static str {
        "elevenlabs"
    }

    async fn synthesize(&self, request: &SpeechRequest) -> Result<Audio, TtsError> {
        request.validate()?;

        let primary = &self.config.primary;
        let voice_id = request.voice.as_deref().unwrap_or(&primary.voice_id);
        let err = match self.post(primary, voice_id, &request.text).await {
            Ok(audio) => return Ok(audio),
            Err(err) => err,
        };

        // Only a rejected credential is worth a second attempt
        match &self.config.fallback {
            Some(fallback) if err.is_auth_rejection() => {
                tracing::warn!(error = %err, "Primary ElevenLabs credential rejected, trying fallback");
                self.post(fallback, &fallback.voice_id, &request.text).await
            }
            _ => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const AUDIO: &[u8] = b"ID3\x04fake-mp3";

    fn config(server: &MockServer, fallback: bool) -> ElevenLabsConfig {
        ElevenLabsConfig::new(VoiceCredential::new("primary_key", "voice-a"))
            .with_host(server.uri())
            .with_fallback(fallback.then(|| VoiceCredential::new("fallback_key", "voice-b")))
    }

    fn audio_response() -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_raw(AUDIO, "audio/mpeg")
    }

    #[tokio::test]
    async fn test_synthesize_with_primary() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/text-to-speech/voice-a"))
            .and(header("xi-api-key", "primary_key"))
            .and(body_json(json!({
                "text": "Welcome!",
                "model_id": ElevenLabsConfig::DEFAULT_MODEL,
            })))
            .respond_with(audio_response())
            .expect(1)
            .mount(&server)
            .await;

        let provider = ElevenLabsProvider::new(config(&server, true))?;
        let audio = provider.synthesize(&SpeechRequest::new("Welcome!")).await?;
        assert_eq!(audio.bytes.as_ref(), AUDIO);
        assert_eq!(audio.content_type, "audio/mpeg");
        Ok(())
    }

    #[tokio::test]
    async fn test_requested_voice_overrides_primary() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/text-to-speech/voice-z"))
            .respond_with(audio_response())
            .expect(1)
            .mount(&server)
            .await;

        let provider = ElevenLabsProvider::new(config(&server, false))?;
        provider
            .synthesize(&SpeechRequest::new("Hi").with_voice("voice-z"))
            .await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_rejected_credential_falls_back_once() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/text-to-speech/voice-a"))
            .and(header("xi-api-key", "primary_key"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/text-to-speech/voice-b"))
            .and(header("xi-api-key", "fallback_key"))
            .respond_with(audio_response())
            .expect(1)
            .mount(&server)
            .await;

        let provider = ElevenLabsProvider::new(config(&server, true))?;
        let audio = provider.synthesize(&SpeechRequest::new("Welcome!")).await?;
        assert_eq!(audio.bytes.as_ref(), AUDIO);
        Ok(())
    }

    #[tokio::test]
    async fn test_fallback_rejection_is_returned() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403))
            .expect(2)
            .mount(&server)
            .await;

        let provider = ElevenLabsProvider::new(config(&server, true))?;
        let result = provider.synthesize(&SpeechRequest::new("Welcome!")).await;
        assert!(matches!(result, Err(TtsError::Unauthorized(403))));
        Ok(())
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let provider = ElevenLabsProvider::new(config(&server, true))?;
        let result = provider.synthesize(&SpeechRequest::new("Welcome!")).await;
        assert!(matches!(result, Err(TtsError::Status(500))));
        Ok(())
    }

    #[tokio::test]
    async fn test_rejection_without_fallback() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let provider = ElevenLabsProvider::new(config(&server, false))?;
        let result = provider.synthesize(&SpeechRequest::new("Welcome!")).await;
        assert!(matches!(result, Err(TtsError::Unauthorized(401))));
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_text_never_reaches_provider() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(audio_response())
            .expect(0)
            .mount(&server)
            .await;

        let provider = ElevenLabsProvider::new(config(&server, true))?;
        let result = provider.synthesize(&SpeechRequest::new("")).await;
        assert!(matches!(result, Err(TtsError::InvalidInput(_))));
        Ok(())
    }
}
