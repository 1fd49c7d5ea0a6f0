use super::role::Role;
use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// One completed message in the conversation
pub struct ChatTurn {
    pub role: Role,
    pub text: String,
    pub created: i64,
}

impl ChatTurn {
    /// Create a new user turn with the current timestamp
    pub fn user<S: Into<String>>(text: S) -> Self {
        ChatTurn {
            role: Role::User,
            text: text.into(),
            created: Utc::now().timestamp(),
        }
    }

    /// Create a new assistant turn with the current timestamp
    pub fn assistant<S: Into<String>>(text: S) -> Self {
        ChatTurn {
            role: Role::Assistant,
            text: text.into(),
            created: Utc::now().timestamp(),
        }
    }
}

/// Append-only record of the conversation, in display order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<ChatTurn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&ChatTurn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Drop every turn; used when the conversation session resets
    pub fn clear(&mut self) {
        self.turns.clear();
    }
}
