use serde::Deserialize;

/// Tag of a decoded stream record
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Incremental answer fragment from an agent app
    AgentMessage,
    /// Incremental answer fragment from a plain chat app
    Message,
    /// Terminal record for the turn
    MessageEnd,
    /// In-band failure reported by the backend
    Error,
    #[default]
    #[serde(other)]
    Other,
}

/// One record decoded from one line of the response stream
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct StreamEvent {
    #[serde(default)]
    pub event: EventKind,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl StreamEvent {
    /// Decode a single line. Blank lines and anything that is not a JSON record
    /// (keep-alives, `event:` lines, comments, fragments) yield `None`.
    pub fn parse_line(line: &str) -> Option<Self> {
        let payload = strip_transport_prefix(line.trim());
        if payload.is_empty() {
            return None;
        }
        match serde_json::from_str::<StreamEvent>(payload) {
            Ok(event) => Some(event),
            Err(e) => {
                tracing::trace!("Skipping undecodable stream line: {}", e);
                None
            }
        }
    }

    pub fn is_incremental(&self) -> bool {
        matches!(self.event, EventKind::AgentMessage | EventKind::Message)
    }

    pub fn is_terminal(&self) -> bool {
        self.event == EventKind::MessageEnd
    }

    /// The answer fragment, if present and non-empty
    pub fn fragment(&self) -> Option<&str> {
        self.answer.as_deref().filter(|a| !a.is_empty())
    }

    /// The session token, if present and non-empty
    pub fn session_token(&self) -> Option<&str> {
        self.conversation_id.as_deref().filter(|id| !id.is_empty())
    }
}

fn strip_transport_prefix(line: &str) -> &str {
    match line.strip_prefix("data:") {
        Some(rest) => rest.trim_start(),
        None => line,
    }
}
