use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header::CONTENT_TYPE, Response, StatusCode};
use serde::{Deserialize, Serialize};

use crate::errors::TtsError;

/// Longest text accepted for a single synthesis
pub const MAX_SPEECH_CHARS: usize = 5000;

const DEFAULT_CONTENT_TYPE: &str = "audio/mpeg";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechRequest {
    pub text: String,
    /// Provider voice to use instead of the configured one
    #[serde(default)]
    pub voice: Option<String>,
}

impl SpeechRequest {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            voice: None,
        }
    }

    pub fn with_voice<S: Into<String>>(mut self, voice: S) -> Self {
        self.voice = Some(voice.into());
        self
    }

    pub fn validate(&self) -> Result<(), TtsError> {
        if self.text.trim().is_empty() {
            return Err(TtsError::InvalidInput("text must not be empty".to_string()));
        }
        let len = self.text.chars().count();
        if len > MAX_SPEECH_CHARS {
            return Err(TtsError::InvalidInput(format!(
                "text is {} characters, the limit is {}",
                len, MAX_SPEECH_CHARS
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Audio {
    pub bytes: Bytes,
    pub content_type: String,
}

impl Audio {
    /// Read a successful response, or classify the failure
    pub(crate) async fn from_response(response: Response) -> Result<Self, TtsError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(TtsError::Unauthorized(status.as_u16()));
        }
        if !status.is_success() {
            return Err(TtsError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let bytes = response.bytes().await?;
        Ok(Self {
            bytes,
            content_type,
        })
    }
}

/// Base trait for text-to-speech backends
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn synthesize(&self, request: &SpeechRequest) -> Result<Audio, TtsError>;
}
