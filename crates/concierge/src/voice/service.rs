use anyhow::Result;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use uuid::Uuid;

use super::configs::VoiceProviderConfig;
use crate::errors::VoiceError;

/// Credentials for the visitor to join a voice room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceSession {
    pub token: String,
    pub room_name: String,
    pub server_url: String,
    pub participant_identity: String,
    #[serde(default)]
    pub mock: bool,
}

/// Acknowledgement that the agent was dispatched to a room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentJoin {
    pub agent_id: String,
    pub room_name: String,
    pub status: String,
    #[serde(default)]
    pub mock: bool,
}

/// Voice session client. Without a provider configured it answers with mock
/// payloads so the rest of the UI can be exercised.
pub struct VoiceService {
    client: Client,
    config: Option<VoiceProviderConfig>,
}

impl VoiceService {
    pub fn new(config: Option<VoiceProviderConfig>) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        if config.is_none() {
            tracing::info!("No voice provider configured, voice endpoints will return mock data");
        }
        Ok(Self { client, config })
    }

    pub fn is_mock(&self) -> bool {
        self.config.is_none()
    }

    pub async fn create_session(&self, agent_id: &str) -> Result<VoiceSession, VoiceError> {
        let agent_id = require("agent_id", agent_id)?;

        let Some(config) = &self.config else {
            return Ok(mock_session(agent_id));
        };
        self.post(config, "/v1/sessions", json!({ "agent_id": agent_id }))
            .await
    }

    pub async fn join_agent(
        &self,
        agent_id: &str,
        room_name: &str,
    ) -> Result<AgentJoin, VoiceError> {
        let agent_id = require("agent_id", agent_id)?;
        let room_name = require("room_name", room_name)?;

        let Some(config) = &self.config else {
            return Ok(AgentJoin {
                agent_id: agent_id.to_string(),
                room_name: room_name.to_string(),
                status: "mock-joined".to_string(),
                mock: true,
            });
        };
        self.post(
            config,
            "/v1/agents/join",
            json!({ "agent_id": agent_id, "room_name": room_name }),
        )
        .await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        config: &VoiceProviderConfig,
        path: &str,
        payload: Value,
    ) -> Result<T, VoiceError> {
        let response = self
            .client
            .post(config.url(path))
            .header("Authorization", format!("Bearer {}", config.api_key))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, path, "Voice provider rejected request");
            return Err(VoiceError::Status(status.as_u16()));
        }
        Ok(response.json().await?)
    }
}

fn require<'a>(field: &str, value: &'a str) -> Result<&'a str, VoiceError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(VoiceError::InvalidRequest(format!("{} must not be empty", field)));
    }
    Ok(value)
}

fn mock_session(agent_id: &str) -> VoiceSession {
    let id = Uuid::new_v4().simple().to_string();
    VoiceSession {
        token: format!("mock-token-{}", id),
        room_name: format!("mock-room-{}-{}", agent_id, &id[..8]),
        server_url: "wss://mock.invalid".to_string(),
        participant_identity: format!("mock-visitor-{}", &id[..8]),
        mock: true,
    }
}
