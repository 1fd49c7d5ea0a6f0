use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

use super::base::{Audio, SpeechProvider, SpeechRequest};
use super::configs::OpenAiSpeechConfig;
use crate::errors::TtsError;

pub struct OpenAiSpeechProvider {
    client: Client,
    config: OpenAiSpeechConfig,
}

impl OpenAiSpeechProvider {
    pub fn new(config: OpenAiSpeechConfig) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(60)).build()?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl SpeechProvider for OpenAiSpeechProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn synthesize(&self, request: &SpeechRequest) -> Result<Audio, TtsError> {
        request.validate()?;

        let url = format!(
            "{}/v1/audio/speech",
            self.config.host.trim_end_matches('/')
        );
        let voice = request.voice.as_deref().unwrap_or(&self.config.voice);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&json!({
                "model": self.config.model,
                "input": request.text,
                "voice": voice,
            }))
            .send()
            .await?;

        Audio::from_response(response).await
    }
}
