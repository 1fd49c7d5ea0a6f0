use anyhow::Result;
use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use super::base::{ByteStream, ChatBackend, ChatRequest};
use super::configs::DifyProviderConfig;
use crate::errors::BackendError;

pub struct DifyProvider {
    client: Client,
    config: DifyProviderConfig,
}

impl DifyProvider {
    pub fn new(config: DifyProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self { client, config })
    }

    fn payload(request: &ChatRequest) -> Value {
        json!({
            "inputs": {},
            "query": request.query,
            "response_mode": "streaming",
            // The backend expects an empty string to start a new conversation
            "conversation_id": request.conversation_id.as_deref().unwrap_or_default(),
            "user": request.user,
        })
    }
}

#[async_trait]
impl ChatBackend for DifyProvider {
    async fn stream_chat(&self, request: &ChatRequest) -> Result<ByteStream, BackendError> {
        let response = self
            .client
            .post(self.config.chat_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Accept", "text/event-stream")
            .json(&Self::payload(request))
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                Ok(response.bytes_stream().map_err(BackendError::from).boxed())
            }
            StatusCode::NOT_FOUND => {
                tracing::debug!(
                    conversation_id = ?request.conversation_id,
                    "Backend does not know this conversation"
                );
                Err(BackendError::SessionNotFound)
            }
            status => {
                tracing::warn!(%status, "Backend rejected chat request");
                Err(BackendError::Status(status.as_u16()))
            }
        }
    }
}
