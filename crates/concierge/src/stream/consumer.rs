use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::fmt::Display;
use tokio::time::{sleep_until, Instant};

use super::cancel::CancelSignal;
use super::decoder::LineDecoder;
use super::event::{EventKind, StreamEvent};
use crate::errors::StreamError;
use crate::session::ConversationSession;

/// Callbacks into the UI layer. Both run inline with the read loop, so keep
/// them cheap.
pub trait StreamObserver {
    /// The accumulated answer changed
    fn on_update(&mut self, buffer: &str);

    /// The backend signalled the end of the message
    fn on_finalize(&mut self, buffer: &str);
}

/// Observer for callers that only care about the final outcome
impl StreamObserver for () {
    fn on_update(&mut self, _buffer: &str) {}
    fn on_finalize(&mut self, _buffer: &str) {}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamState {
    pub buffer: String,
    pub is_active: bool,
}

/// How a stream that did not fail came to a stop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamOutcome {
    /// A terminal record was observed
    Finished(String),
    /// The source ran dry first; this is the last known buffer
    Exhausted(String),
}

impl StreamOutcome {
    pub fn text(&self) -> &str {
        match self {
            StreamOutcome::Finished(text) | StreamOutcome::Exhausted(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            StreamOutcome::Finished(text) | StreamOutcome::Exhausted(text) => text,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, StreamOutcome::Finished(_))
    }
}

/// Folds one turn's event stream into an answer buffer
#[derive(Debug, Default)]
pub struct StreamConsumer {
    state: StreamState,
    decoder: LineDecoder,
}

enum Step {
    Continue,
    Finished,
}

impl StreamConsumer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &StreamState {
        &self.state
    }

    /// Read `source` until a terminal record, exhaustion, failure, cancellation or
    /// `deadline`, whichever comes first.
    pub async fn consume<S, E, O>(
        &mut self,
        mut source: S,
        session: &mut ConversationSession,
        observer: &mut O,
        cancel: &mut CancelSignal,
        deadline: Instant,
    ) -> Result<StreamOutcome, StreamError>
    where
        S: Stream<Item = Result<Bytes, E>> + Unpin,
        E: Display,
        O: StreamObserver + ?Sized,
    {
        self.state = StreamState {
            buffer: String::new(),
            is_active: true,
        };
        self.decoder = LineDecoder::new();

        let result = loop {
            let chunk = tokio::select! {
                biased;
                _ = cancel.cancelled() => break Err(StreamError::Cancelled),
                _ = sleep_until(deadline) => break Err(StreamError::Timeout),
                chunk = source.next() => chunk,
            };

            match chunk {
                Some(Ok(bytes)) => {
                    let lines = self.decoder.push(&bytes);
                    match self.dispatch_lines(lines, session, observer, cancel) {
                        Ok(Step::Continue) => continue,
                        Ok(Step::Finished) => {
                            break Ok(StreamOutcome::Finished(self.state.buffer.clone()))
                        }
                        Err(e) => break Err(e),
                    }
                }
                Some(Err(e)) => break Err(StreamError::Transport(e.to_string())),
                None => {
                    let tail: Vec<String> = self.decoder.finish().into_iter().collect();
                    match self.dispatch_lines(tail, session, observer, cancel) {
                        Ok(Step::Finished) => {
                            break Ok(StreamOutcome::Finished(self.state.buffer.clone()))
                        }
                        Ok(Step::Continue) => {
                            tracing::debug!(
                                "Stream ended without a terminal record after {} bytes",
                                self.state.buffer.len()
                            );
                            break Ok(StreamOutcome::Exhausted(self.state.buffer.clone()));
                        }
                        Err(e) => break Err(e),
                    }
                }
            }
        };

        self.state.is_active = false;
        result
    }

    fn dispatch_lines<O>(
        &mut self,
        lines: Vec<String>,
        session: &mut ConversationSession,
        observer: &mut O,
        cancel: &CancelSignal,
    ) -> Result<Step, StreamError>
    where
        O: StreamObserver + ?Sized,
    {
        for line in lines {
            // A record already in hand must not surface once the turn is cancelled
            if cancel.is_cancelled() {
                return Err(StreamError::Cancelled);
            }

            let Some(event) = StreamEvent::parse_line(&line) else {
                continue;
            };

            if let Some(id) = event.session_token() {
                session.set_conversation_id(id);
            }

            match event.event {
                EventKind::AgentMessage | EventKind::Message => {
                    if let Some(fragment) = event.fragment() {
                        self.state.buffer.push_str(fragment);
                        observer.on_update(&self.state.buffer);
                    }
                }
                EventKind::MessageEnd => {
                    observer.on_finalize(&self.state.buffer);
                    self.state.is_active = false;
                    return Ok(Step::Finished);
                }
                EventKind::Error => {
                    let detail = event.message.unwrap_or_else(|| "unknown error".to_string());
                    return Err(StreamError::Transport(detail));
                }
                EventKind::Other => {}
            }
        }
        Ok(Step::Continue)
    }
}
