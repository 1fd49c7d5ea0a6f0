use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::{sleep_until, Instant};

use crate::errors::{BackendError, StreamError};
use crate::extractor::Extractor;
use crate::models::service::ExtractedService;
use crate::models::turn::{ChatTurn, Transcript};
use crate::platform::{AudioIo, NoopAudio};
use crate::providers::base::{ByteStream, ChatBackend, ChatRequest};
use crate::stream::{CancelSignal, StreamConsumer, StreamObserver, StreamOutcome, TurnControl};

/// How long one turn may take, request and stream together
pub const DEFAULT_TURN_TIMEOUT: Duration = Duration::from_secs(30);

/// Continuation state for one conversation with the backend
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationSession {
    conversation_id: Option<String>,
}

impl ConversationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the latest token the backend handed out; the last write wins
    pub fn set_conversation_id(&mut self, id: &str) {
        if self.conversation_id.as_deref() != Some(id) {
            tracing::debug!(conversation_id = id, "Conversation id updated");
            self.conversation_id = Some(id.to_string());
        }
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    pub fn clear(&mut self) {
        self.conversation_id = None;
    }
}

/// A finished answer, ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantReply {
    /// The answer exactly as streamed
    pub text: String,
    pub services: Vec<ExtractedService>,
    /// Narrative left after the services were lifted out
    pub remaining_text: String,
    /// False when the stream ended without an end-of-message record
    pub complete: bool,
}

impl AssistantReply {
    /// Text for the chat bubble; the untouched answer when no services were found
    pub fn display_text(&self) -> &str {
        if self.services.is_empty() {
            &self.text
        } else {
            &self.remaining_text
        }
    }
}

/// What became of a turn. Failures carry no detail; the UI only offers a retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Reply(AssistantReply),
    Cancelled,
    TimedOut,
    Failed,
}

/// Cancels the active turn from outside the task driving it
#[derive(Debug, Clone)]
pub struct Interrupter {
    control: TurnControl,
}

impl Interrupter {
    pub fn interrupt(&self) {
        self.control.cancel();
    }
}

/// Drives conversation turns against a backend
pub struct ChatSession {
    backend: Box<dyn ChatBackend>,
    session: ConversationSession,
    transcript: Transcript,
    extractor: Extractor,
    consumer: StreamConsumer,
    control: TurnControl,
    audio: Box<dyn AudioIo>,
    speak_replies: bool,
    timeout: Duration,
    user: String,
}

impl ChatSession {
    pub fn new<U: Into<String>>(backend: Box<dyn ChatBackend>, user: U) -> Self {
        Self {
            backend,
            session: ConversationSession::new(),
            transcript: Transcript::new(),
            extractor: Extractor::default(),
            consumer: StreamConsumer::new(),
            control: TurnControl::new(),
            audio: Box::new(NoopAudio),
            speak_replies: false,
            timeout: DEFAULT_TURN_TIMEOUT,
            user: user.into(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_extractor(mut self, extractor: Extractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Attach audio; with `speak_replies` each answer is read aloud
    pub fn with_audio(mut self, audio: Box<dyn AudioIo>, speak_replies: bool) -> Self {
        self.audio = audio;
        self.speak_replies = speak_replies;
        self
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.session.conversation_id()
    }

    pub fn is_streaming(&self) -> bool {
        self.consumer.state().is_active
    }

    pub fn interrupter(&self) -> Interrupter {
        Interrupter {
            control: self.control.clone(),
        }
    }

    /// Forget the conversation, locally and with the backend
    pub fn reset(&mut self) {
        self.control.cancel();
        self.audio.stop();
        self.transcript.clear();
        self.session.clear();
    }

    /// Send one message and stream the answer through `observer`
    pub async fn send<O>(&mut self, text: &str, observer: &mut O) -> TurnOutcome
    where
        O: StreamObserver + ?Sized,
    {
        let mut cancel = self.control.begin();
        let deadline = Instant::now() + self.timeout;
        self.audio.stop();
        self.transcript.push(ChatTurn::user(text));

        let stream = match self.open_stream(text, &mut cancel, deadline).await {
            Ok(stream) => stream,
            Err(outcome) => return outcome,
        };

        let result = self
            .consumer
            .consume(stream, &mut self.session, observer, &mut cancel, deadline)
            .await;

        match result {
            Ok(outcome) => self.complete_turn(outcome),
            Err(StreamError::Cancelled) => {
                tracing::debug!("Turn cancelled");
                TurnOutcome::Cancelled
            }
            Err(StreamError::Timeout) => {
                tracing::warn!(timeout = ?self.timeout, "Turn timed out while streaming");
                TurnOutcome::TimedOut
            }
            Err(err) => {
                tracing::warn!(error = %err, "Turn failed while streaming");
                TurnOutcome::Failed
            }
        }
    }

    /// Submit the request, retrying once without the conversation id if the
    /// backend no longer knows it
    async fn open_stream(
        &mut self,
        query: &str,
        cancel: &mut CancelSignal,
        deadline: Instant,
    ) -> Result<ByteStream, TurnOutcome> {
        let mut retried = false;
        loop {
            let request = ChatRequest::new(query, self.user.as_str())
                .with_conversation_id(self.session.conversation_id().map(str::to_string));

            let attempt = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(TurnOutcome::Cancelled),
                _ = sleep_until(deadline) => {
                    tracing::warn!(timeout = ?self.timeout, "Turn timed out waiting for the backend");
                    return Err(TurnOutcome::TimedOut);
                }
                attempt = self.backend.stream_chat(&request) => attempt,
            };

            match attempt {
                Ok(stream) => return Ok(stream),
                Err(BackendError::SessionNotFound) if !retried => {
                    tracing::info!("Conversation expired, starting a new one");
                    self.session.clear();
                    retried = true;
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Chat request failed");
                    return Err(TurnOutcome::Failed);
                }
            }
        }
    }

    fn complete_turn(&mut self, outcome: StreamOutcome) -> TurnOutcome {
        let complete = outcome.is_finished();
        let text = outcome.into_text();
        if !complete && text.is_empty() {
            tracing::warn!("Stream ended before any answer arrived");
            return TurnOutcome::Failed;
        }

        let extraction = self.extractor.extract(&text);
        let reply = AssistantReply {
            services: extraction.services,
            remaining_text: extraction.remaining_text,
            text,
            complete,
        };

        self.transcript.push(ChatTurn::assistant(reply.text.as_str()));
        if self.speak_replies && !reply.display_text().is_empty() {
            self.audio.speak(reply.display_text());
        }
        TurnOutcome::Reply(reply)
    }
}
