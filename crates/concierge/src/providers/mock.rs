use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::base::{ByteStream, ChatBackend, ChatRequest};
use crate::errors::BackendError;

/// What the mock answers with for one request
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Stream these chunks, then end
    Chunks(Vec<String>),
    /// Stream these chunks, then stall until dropped
    Stall(Vec<String>),
    /// Fail the request itself
    Error(BackendError),
}

impl MockReply {
    /// A complete answer delivered in one chunk
    pub fn answer(text: &str, conversation_id: &str) -> Self {
        MockReply::Chunks(vec![format!(
            "data: {}\n\ndata: {}\n\n",
            serde_json::json!({
                "event": "agent_message",
                "answer": text,
                "conversation_id": conversation_id,
            }),
            serde_json::json!({
                "event": "message_end",
                "conversation_id": conversation_id,
            }),
        )])
    }
}

/// A mock backend that replays pre-configured replies and records requests
#[derive(Clone, Default)]
pub struct MockBackend {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
}

impl MockBackend {
    pub fn new(replies: Vec<MockReply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn chunk_stream(chunks: Vec<String>) -> impl futures::Stream<Item = Result<Bytes, BackendError>> {
    stream::iter(chunks.into_iter().map(|c| Ok(Bytes::from(c))))
}

#[async_trait]
impl ChatBackend for MockBackend {
    async fn stream_chat(&self, request: &ChatRequest) -> Result<ByteStream, BackendError> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            // Nothing configured: an empty stream
            None => Ok(stream::empty::<Result<Bytes, BackendError>>().boxed()),
            Some(MockReply::Chunks(chunks)) => Ok(chunk_stream(chunks).boxed()),
            Some(MockReply::Stall(chunks)) => Ok(chunk_stream(chunks)
                .chain(stream::once(async {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(Bytes::new())
                }))
                .boxed()),
            Some(MockReply::Error(err)) => Err(err),
        }
    }
}
