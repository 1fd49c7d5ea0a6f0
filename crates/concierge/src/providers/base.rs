use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::errors::BackendError;

/// Raw body of a streaming answer, chunked however the network delivers it
pub type ByteStream = BoxStream<'static, Result<Bytes, BackendError>>;

/// One user message addressed to the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub query: String,
    /// Continuation token from an earlier answer, if the conversation has one
    #[serde(default)]
    pub conversation_id: Option<String>,
    /// Opaque visitor identifier
    #[serde(default)]
    pub user: String,
}

impl ChatRequest {
    pub fn new<Q: Into<String>, U: Into<String>>(query: Q, user: U) -> Self {
        Self {
            query: query.into(),
            conversation_id: None,
            user: user.into(),
        }
    }

    pub fn with_conversation_id(mut self, conversation_id: Option<String>) -> Self {
        self.conversation_id = conversation_id;
        self
    }
}

/// Base trait for conversational backends that answer with an event stream
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Submit a message and hand back the undecoded answer stream
    async fn stream_chat(&self, request: &ChatRequest) -> Result<ByteStream, BackendError>;
}
